//! Builds paginated post listings for each feed scope.

use sqlx::SqlitePool;

use super::paginator::{FeedPage, Paginator};
use crate::db::{self, CommentView, Group, PostFilter, PostView, User};
use crate::error::{AppError, AppResult};

/// A single post with everything its detail page shows.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: PostView,
    pub comments: Vec<CommentView>,
    /// Total posts written by the post's author.
    pub author_post_count: i64,
}

/// Composes feeds from the store with a fixed page length.
#[derive(Debug, Clone)]
pub struct FeedComposer {
    pool: SqlitePool,
    page_size: usize,
}

impl FeedComposer {
    #[must_use]
    pub fn new(pool: SqlitePool, page_size: usize) -> Self {
        Self { pool, page_size }
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// All posts, newest first.
    pub async fn global_feed(&self, page: i64) -> AppResult<FeedPage<PostView>> {
        self.page(PostFilter::All, page).await
    }

    /// Posts in the group identified by `slug`.
    pub async fn group_feed(&self, slug: &str, page: i64) -> AppResult<(Group, FeedPage<PostView>)> {
        let group = db::get_group_by_slug(&self.pool, slug)
            .await?
            .ok_or(AppError::NotFound("group"))?;
        let posts = self.page(PostFilter::Group(group.id), page).await?;
        Ok((group, posts))
    }

    /// Posts written by `username`.
    pub async fn author_feed(
        &self,
        username: &str,
        page: i64,
    ) -> AppResult<(User, FeedPage<PostView>)> {
        let author = db::get_user_by_username(&self.pool, username)
            .await?
            .ok_or(AppError::NotFound("user"))?;
        let posts = self.page(PostFilter::Author(author.id), page).await?;
        Ok((author, posts))
    }

    /// Posts written by anyone `user_id` follows.
    pub async fn following_feed(&self, user_id: i64, page: i64) -> AppResult<FeedPage<PostView>> {
        self.page(PostFilter::FollowedBy(user_id), page).await
    }

    /// A post with its comments in ascending order.
    pub async fn post_detail(&self, post_id: i64) -> AppResult<PostDetail> {
        let post = db::get_post_view(&self.pool, post_id)
            .await?
            .ok_or(AppError::NotFound("post"))?;
        let comments = db::get_comments_for_post(&self.pool, post_id).await?;
        let author_post_count =
            db::count_post_views(&self.pool, PostFilter::Author(post.author_id)).await?;

        Ok(PostDetail {
            post,
            comments,
            author_post_count,
        })
    }

    async fn page(&self, filter: PostFilter, requested: i64) -> AppResult<FeedPage<PostView>> {
        let total = db::count_post_views(&self.pool, filter).await?;
        let paginator = Paginator::new(self.page_size, total);
        let number = paginator.clamp(requested);
        let (limit, offset) = paginator.limit_offset(number);

        let items = if total == 0 {
            Vec::new()
        } else {
            db::get_post_views(&self.pool, filter, limit, offset).await?
        };

        tracing::debug!(?filter, requested, number, total, "Composed feed page");
        Ok(FeedPage::new(items, &paginator, number))
    }
}
