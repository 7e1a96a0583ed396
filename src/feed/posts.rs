//! Creating, editing and deleting posts.

use sqlx::SqlitePool;
use tracing::info;

use crate::db::{self, NewPost, Post, PostChanges};
use crate::error::{AppError, AppResult};

/// Validated-on-write post fields as submitted by a form.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub text: String,
    /// Raw value of the group `<select>`; empty means "no group".
    pub group: Option<String>,
    /// Stored path of a freshly uploaded image, if any.
    pub image: Option<String>,
}

impl PostInput {
    /// Check field rules and resolve the group reference.
    ///
    /// Returns the trimmed text and the group id.
    pub async fn validate(&self, pool: &SqlitePool) -> AppResult<(String, Option<i64>)> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(AppError::validation("text", "This field is required."));
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let id: i64 = raw
                    .parse()
                    .map_err(|_| AppError::validation("group", "Select a valid choice."))?;
                if db::get_group(pool, id).await?.is_none() {
                    return Err(AppError::validation("group", "Select a valid choice."));
                }
                Some(id)
            }
        };

        Ok((text.to_string(), group_id))
    }
}

/// Create a post owned by `author_id`, returning its ID.
pub async fn create_post(pool: &SqlitePool, author_id: i64, input: &PostInput) -> AppResult<i64> {
    let (text, group_id) = input.validate(pool).await?;

    let id = db::insert_post(
        pool,
        &NewPost {
            text,
            author_id,
            group_id,
            image: input.image.clone(),
        },
    )
    .await?;

    info!(post_id = id, author_id, ?group_id, "Post created");
    Ok(id)
}

/// Fetch a post and check that `user_id` wrote it.
pub async fn ensure_author(pool: &SqlitePool, post_id: i64, user_id: i64) -> AppResult<Post> {
    let post = db::get_post(pool, post_id)
        .await?
        .ok_or(AppError::NotFound("post"))?;

    if post.author_id != user_id {
        return Err(AppError::PermissionDenied);
    }
    Ok(post)
}

/// Replace the editable fields of a post. Only its author may do this.
pub async fn edit_post(
    pool: &SqlitePool,
    post_id: i64,
    editor_id: i64,
    input: &PostInput,
) -> AppResult<()> {
    ensure_author(pool, post_id, editor_id).await?;
    let (text, group_id) = input.validate(pool).await?;

    db::update_post(
        pool,
        post_id,
        &PostChanges {
            text,
            group_id,
            image: input.image.clone(),
        },
    )
    .await?;

    info!(post_id, editor_id, "Post edited");
    Ok(())
}

/// Delete a post and its comments. Only its author may do this.
pub async fn delete_post(pool: &SqlitePool, post_id: i64, editor_id: i64) -> AppResult<()> {
    ensure_author(pool, post_id, editor_id).await?;
    db::delete_post(pool, post_id).await?;
    info!(post_id, editor_id, "Post deleted");
    Ok(())
}
