mod auth;
pub mod page_cache;
pub mod pages;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::FromRef;
use axum::handler::HandlerWithoutStateExt;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::error;
use crate::feed::{FeedComposer, FollowGraph};

pub use page_cache::{CacheKey, PageCache};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    /// Rendered global feed pages.
    pub cache: Arc<PageCache>,
    pub composer: FeedComposer,
    pub follows: FollowGraph,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, db: Database) -> Self {
        let pool = db.pool().clone();
        Self {
            cache: Arc::new(PageCache::new(config.index_cache_ttl)),
            composer: FeedComposer::new(pool.clone(), config.posts_per_page),
            follows: FollowGraph::new(pool),
            config: Arc::new(config),
            db,
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.db.pool().clone()
    }
}

/// Start the web server and run until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(
    config: Config,
    db: Database,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(AppState::new(config, db));

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    let static_dir = find_static_dir();
    info!(static_dir = ?static_dir, media_dir = ?state.config.media_dir, "Serving files");

    Router::new()
        .merge(routes::router())
        .merge(auth::router())
        .nest_service("/static", ServeDir::new(&static_dir))
        .nest_service(
            "/media",
            ServeDir::new(&state.config.media_dir)
                .not_found_service(fallback.into_service()),
        )
        .fallback(fallback)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback() -> axum::response::Response {
    error::not_found()
}

/// Find the static files directory.
///
/// Checks in order:
/// 1. ./static (development)
/// 2. /usr/share/yatube/static (installed)
/// 3. Falls back to ./static
fn find_static_dir() -> PathBuf {
    let candidates = [
        PathBuf::from("./static"),
        PathBuf::from("/usr/share/yatube/static"),
    ];

    for path in &candidates {
        if path.exists() && path.is_dir() {
            return path.clone();
        }
    }

    PathBuf::from("./static")
}
