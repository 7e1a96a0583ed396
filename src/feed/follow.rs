//! Directed follow edges between users.
//!
//! The edge set is a simple directed graph: no self-loops and at most one
//! edge per `(user, author)` pair. Rejected follows and redundant unfollows
//! are silent no-ops, never errors.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db;

/// Follow/unfollow operations over the store.
#[derive(Debug, Clone)]
pub struct FollowGraph {
    pool: SqlitePool,
}

impl FollowGraph {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Make `user_id` follow `author_id`.
    ///
    /// Returns `true` only when a new edge was created. Self-follows and
    /// existing edges return `false` without touching the store's state; the
    /// uniqueness constraint covers concurrent duplicate requests.
    pub async fn follow(&self, user_id: i64, author_id: i64) -> Result<bool> {
        if user_id == author_id {
            debug!(user_id, "Ignoring self-follow");
            return Ok(false);
        }

        let created = db::insert_follow(&self.pool, user_id, author_id).await?;
        debug!(user_id, author_id, created, "Follow");
        Ok(created)
    }

    /// Remove the `user_id -> author_id` edge if present.
    pub async fn unfollow(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let removed = db::delete_follow(&self.pool, user_id, author_id).await?;
        debug!(user_id, author_id, removed, "Unfollow");
        Ok(removed)
    }

    pub async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool> {
        if user_id == author_id {
            return Ok(false);
        }
        db::follow_exists(&self.pool, user_id, author_id).await
    }

    /// `(following, followers)` counts for a profile.
    pub async fn counts(&self, user_id: i64) -> Result<(i64, i64)> {
        let following = db::count_following(&self.pool, user_id).await?;
        let followers = db::count_followers(&self.pool, user_id).await?;
        Ok((following, followers))
    }
}
