use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::error::{AppError, AppResult};

/// Attach a comment to a post, returning the comment's ID.
///
/// The comment is stamped with the current time and so sorts after every
/// existing comment on the post.
pub async fn add_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: i64,
    text: &str,
) -> AppResult<i64> {
    if db::get_post(pool, post_id).await?.is_none() {
        return Err(AppError::NotFound("post"));
    }

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::validation("text", "This field is required."));
    }

    let id = db::insert_comment(pool, post_id, Some(author_id), text).await?;
    info!(comment_id = id, post_id, author_id, "Comment added");
    Ok(id)
}
