//! SQLite store for accounts, groups, posts, comments and the follow graph.

mod migrations;
mod models;
mod queries;

pub use migrations::SCHEMA_VERSION;
pub use models::*;
pub use queries::*;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

const MAX_CONNECTIONS: u32 = 5;

/// Handle to the blog database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database at `path` and bring its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or opened, or a
    /// migration fails.
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(connect_options(path))
            .await
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        let db = Self { pool };
        migrations::run(&db.pool).await?;
        info!(
            path = %path.display(),
            schema_version = db.schema_version().await?,
            "Database ready"
        );

        Ok(db)
    }

    /// Schema version recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the version table cannot be read.
    pub async fn schema_version(&self) -> Result<i32> {
        migrations::get_schema_version(&self.pool).await
    }

    /// Wait for in-flight queries and close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn connect_options(path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        // Feed reads run alongside post and follow writes.
        .journal_mode(SqliteJournalMode::Wal)
        // Deleting a user or post cascades to comments and follows; deleting a
        // group nulls posts.group_id. Both need enforcement on every connection.
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
}
