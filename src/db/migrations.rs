use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::debug;

/// Latest schema version: v1 accounts, v2 groups/posts/comments, v3 follows.
pub const SCHEMA_VERSION: i32 = 3;

/// Run all pending migrations.
pub async fn run(pool: &SqlitePool) -> Result<()> {
    create_migration_table(pool).await?;
    let current_version = get_schema_version(pool).await?;

    if current_version < 1 {
        debug!("Running migration v1");
        run_migration_v1(pool).await?;
        set_schema_version(pool, 1).await?;
    }

    if current_version < 2 {
        debug!("Running migration v2");
        run_migration_v2(pool).await?;
        set_schema_version(pool, 2).await?;
    }

    if current_version < 3 {
        debug!("Running migration v3");
        run_migration_v3(pool).await?;
        set_schema_version(pool, 3).await?;
    }

    Ok(())
}

async fn create_migration_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS _schema_version (
            version INTEGER PRIMARY KEY
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create schema version table")?;

    Ok(())
}

pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT version FROM _schema_version LIMIT 1")
        .fetch_optional(pool)
        .await
        .context("Failed to get schema version")?;

    Ok(row.map_or(0, |(v,)| v))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("DELETE FROM _schema_version")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO _schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Accounts and login sessions.
async fn run_migration_v1(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v1: users and sessions");

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            token TEXT UNIQUE NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            expires_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create sessions table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)")
        .execute(pool)
        .await
        .context("Failed to create sessions index")?;

    Ok(())
}

/// Groups, posts and comments.
async fn run_migration_v2(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v2: groups, posts and comments");

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            slug TEXT UNIQUE NOT NULL,
            description TEXT NOT NULL DEFAULT ''
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create groups table")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            pub_date TEXT NOT NULL DEFAULT (datetime('now')),
            author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            group_id INTEGER REFERENCES groups(id) ON DELETE SET NULL,
            image TEXT
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create posts table")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            author_id INTEGER REFERENCES users(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            created TEXT NOT NULL DEFAULT (datetime('now'))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create comments table")?;

    for (name, sql) in [
        (
            "idx_posts_pub_date",
            "CREATE INDEX IF NOT EXISTS idx_posts_pub_date ON posts(pub_date DESC, id DESC)",
        ),
        (
            "idx_posts_author",
            "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id)",
        ),
        (
            "idx_posts_group",
            "CREATE INDEX IF NOT EXISTS idx_posts_group ON posts(group_id)",
        ),
        (
            "idx_comments_post",
            "CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id, created)",
        ),
    ] {
        sqlx::query(sql)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create index {name}"))?;
    }

    Ok(())
}

/// Follow edges.
async fn run_migration_v3(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v3: follows");

    // The UNIQUE pair is what keeps concurrent follow requests from producing
    // parallel edges; the CHECK rules out self-loops at the storage level.
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS follows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            UNIQUE(user_id, author_id),
            CHECK(user_id != author_id)
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create follows table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_follows_author ON follows(author_id)")
        .execute(pool)
        .await
        .context("Failed to create follows index")?;

    Ok(())
}
