use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{
    CommentView, Group, NewGroup, NewPost, Post, PostChanges, PostView, Session, User,
};

// ========== Post Filter Helpers ==========

/// Which subset of posts a listing query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts in the given group.
    Group(i64),
    /// Posts written by the given user.
    Author(i64),
    /// Posts written by anyone the given user follows.
    FollowedBy(i64),
}

impl PostFilter {
    /// SQL WHERE fragment (against alias `p`) and its single bind value.
    fn clause(self) -> (&'static str, Option<i64>) {
        match self {
            Self::All => ("1 = 1", None),
            Self::Group(id) => ("p.group_id = ?", Some(id)),
            Self::Author(id) => ("p.author_id = ?", Some(id)),
            Self::FollowedBy(id) => (
                "p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = ?)",
                Some(id),
            ),
        }
    }
}

const POST_VIEW_SELECT: &str = r"
    SELECT
        p.id, p.text, p.pub_date, p.image, p.author_id,
        u.username AS author_username,
        p.group_id, g.title AS group_title, g.slug AS group_slug
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
";

// ========== Users ==========

/// Get a user by ID.
pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by id")
}

/// Get a user by username.
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by username")
}

/// Check if a username already exists.
pub async fn username_exists(pool: &SqlitePool, username: &str) -> Result<bool> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .context("Failed to check username existence")?;
    Ok(row.0 > 0)
}

/// Create a new user, returning its ID.
pub async fn create_user(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<i64> {
    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await
        .context("Failed to create user")?;

    Ok(result.last_insert_rowid())
}

/// Delete a user. Their posts, comments, follow edges and sessions cascade.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete user")?;
    Ok(result.rows_affected() > 0)
}

// ========== Sessions ==========

/// Create a new session.
pub async fn create_session(
    pool: &SqlitePool,
    user_id: i64,
    token: &str,
    expires_at: &str,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO sessions (user_id, token, expires_at) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(pool)
        .await
        .context("Failed to create session")?;

    Ok(result.last_insert_rowid())
}

/// Get a session by token.
pub async fn get_session_by_token(pool: &SqlitePool, token: &str) -> Result<Option<Session>> {
    sqlx::query_as("SELECT * FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch session by token")
}

/// Delete a session.
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await
        .context("Failed to delete session")?;
    Ok(())
}

/// Delete every session whose expiry (RFC 3339) is before `now`.
pub async fn delete_expired_sessions(pool: &SqlitePool, now: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to delete expired sessions")?;
    Ok(result.rows_affected())
}

// ========== Groups ==========

/// Insert a new group, returning its ID.
pub async fn create_group(pool: &SqlitePool, group: &NewGroup) -> Result<i64> {
    let result = sqlx::query("INSERT INTO groups (title, slug, description) VALUES (?, ?, ?)")
        .bind(&group.title)
        .bind(&group.slug)
        .bind(&group.description)
        .execute(pool)
        .await
        .context("Failed to create group")?;

    Ok(result.last_insert_rowid())
}

/// Get a group by ID.
pub async fn get_group(pool: &SqlitePool, id: i64) -> Result<Option<Group>> {
    sqlx::query_as("SELECT * FROM groups WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch group")
}

/// Get a group by its slug.
pub async fn get_group_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Group>> {
    sqlx::query_as("SELECT * FROM groups WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch group by slug")
}

/// All groups, ordered by title.
pub async fn get_all_groups(pool: &SqlitePool) -> Result<Vec<Group>> {
    sqlx::query_as("SELECT * FROM groups ORDER BY title, id")
        .fetch_all(pool)
        .await
        .context("Failed to list groups")
}

/// Delete a group. Its posts stay, with `group_id` set to NULL.
pub async fn delete_group(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM groups WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete group")?;
    Ok(result.rows_affected() > 0)
}

// ========== Posts ==========

/// Insert a new post, returning its ID.
pub async fn insert_post(pool: &SqlitePool, post: &NewPost) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO posts (text, author_id, group_id, image)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(&post.text)
    .bind(post.author_id)
    .bind(post.group_id)
    .bind(&post.image)
    .execute(pool)
    .await
    .context("Failed to insert post")?;

    Ok(result.last_insert_rowid())
}

/// Get a post row by ID.
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    sqlx::query_as("SELECT * FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch post")
}

/// Get a post joined with author and group.
pub async fn get_post_view(pool: &SqlitePool, id: i64) -> Result<Option<PostView>> {
    let sql = format!("{POST_VIEW_SELECT} WHERE p.id = ?");
    sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch post view")
}

/// Replace a post's editable fields. `pub_date` and author never change.
pub async fn update_post(pool: &SqlitePool, id: i64, changes: &PostChanges) -> Result<()> {
    sqlx::query(
        r"
        UPDATE posts
        SET text = ?, group_id = ?, image = COALESCE(?, image)
        WHERE id = ?
        ",
    )
    .bind(&changes.text)
    .bind(changes.group_id)
    .bind(&changes.image)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    Ok(())
}

/// Delete a post. Its comments cascade.
pub async fn delete_post(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;
    Ok(result.rows_affected() > 0)
}

/// Count posts matching a filter.
pub async fn count_post_views(pool: &SqlitePool, filter: PostFilter) -> Result<i64> {
    let (clause, value) = filter.clause();
    let sql = format!("SELECT COUNT(*) FROM posts p WHERE {clause}");

    let mut query = sqlx::query_as::<_, (i64,)>(&sql);
    if let Some(v) = value {
        query = query.bind(v);
    }

    let row = query
        .fetch_one(pool)
        .await
        .context("Failed to count posts")?;
    Ok(row.0)
}

/// List posts matching a filter, newest first.
pub async fn get_post_views(
    pool: &SqlitePool,
    filter: PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostView>> {
    let (clause, value) = filter.clause();
    let sql = format!(
        "{POST_VIEW_SELECT} WHERE {clause} ORDER BY p.pub_date DESC, p.id DESC LIMIT ? OFFSET ?"
    );

    let mut query = sqlx::query_as::<_, PostView>(&sql);
    if let Some(v) = value {
        query = query.bind(v);
    }

    query
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list posts")
}

// ========== Comments ==========

/// Insert a comment stamped with the current time, returning its ID.
pub async fn insert_comment(
    pool: &SqlitePool,
    post_id: i64,
    author_id: Option<i64>,
    text: &str,
) -> Result<i64> {
    let result = sqlx::query("INSERT INTO comments (post_id, author_id, text) VALUES (?, ?, ?)")
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .execute(pool)
        .await
        .context("Failed to insert comment")?;

    Ok(result.last_insert_rowid())
}

/// Comments on a post, oldest first.
pub async fn get_comments_for_post(pool: &SqlitePool, post_id: i64) -> Result<Vec<CommentView>> {
    sqlx::query_as(
        r"
        SELECT c.id, c.post_id, c.author_id, u.username AS author_username, c.text, c.created
        FROM comments c
        LEFT JOIN users u ON u.id = c.author_id
        WHERE c.post_id = ?
        ORDER BY c.created ASC, c.id ASC
        ",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch comments for post")
}

/// Count all comments.
pub async fn count_comments(pool: &SqlitePool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
        .fetch_one(pool)
        .await
        .context("Failed to count comments")?;
    Ok(row.0)
}

// ========== Follows ==========

/// Insert a follow edge unless it already exists (or would be a self-loop).
///
/// Returns `true` if a new edge was created.
pub async fn insert_follow(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool> {
    let result = sqlx::query("INSERT OR IGNORE INTO follows (user_id, author_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await
        .context("Failed to insert follow")?;
    Ok(result.rows_affected() > 0)
}

/// Delete a follow edge. Returns `true` if one was removed.
pub async fn delete_follow(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await
        .context("Failed to delete follow")?;
    Ok(result.rows_affected() > 0)
}

/// Check whether `user_id` follows `author_id`.
pub async fn follow_exists(pool: &SqlitePool, user_id: i64, author_id: i64) -> Result<bool> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .fetch_one(pool)
            .await
            .context("Failed to check follow existence")?;
    Ok(row.0 > 0)
}

/// Number of authors `user_id` follows.
pub async fn count_following(pool: &SqlitePool, user_id: i64) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
        .context("Failed to count following")?;
    Ok(row.0)
}

/// Number of users following `author_id`.
pub async fn count_followers(pool: &SqlitePool, author_id: i64) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await
        .context("Failed to count followers")?;
    Ok(row.0)
}

/// Count every follow edge.
pub async fn count_follows(pool: &SqlitePool) -> Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows")
        .fetch_one(pool)
        .await
        .context("Failed to count follows")?;
    Ok(row.0)
}
