use serde::{Deserialize, Serialize};

/// Number of characters of a post or comment shown in titles and listings.
pub const SUMMARY_CHARS: usize = 15;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

/// A login session bound to a cookie token.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub created_at: String,
    pub expires_at: String,
}

/// A topical community that posts may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Data for creating a group.
#[derive(Debug, Clone)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// A post row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

impl Post {
    /// Short form of the text, used as a page title.
    #[must_use]
    pub fn summary(&self) -> String {
        truncate_chars(&self.text, SUMMARY_CHARS)
    }
}

/// Data for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// Editable fields of a post. `image: None` keeps the existing image.
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

/// A post joined with its author and group, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub pub_date: String,
    pub image: Option<String>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
}

impl PostView {
    #[must_use]
    pub fn summary(&self) -> String {
        truncate_chars(&self.text, SUMMARY_CHARS)
    }
}

/// A comment row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: Option<i64>,
    pub text: String,
    pub created: String,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentView {
    pub id: i64,
    pub post_id: i64,
    pub author_id: Option<i64>,
    pub author_username: Option<String>,
    pub text: String,
    pub created: String,
}

/// A directed follow edge: `user_id` receives `author_id`'s posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
}

/// Truncate to at most `max` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_summary_truncates() {
        let post = Post {
            id: 1,
            text: "A rather long first post about nothing".to_string(),
            pub_date: "2024-01-01 00:00:00".to_string(),
            author_id: 1,
            group_id: None,
            image: None,
        };
        assert_eq!(post.summary(), "A rather long f");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("Тестовый пост", 4), "Тест");
        assert_eq!(truncate_chars("short", 15), "short");
    }
}
