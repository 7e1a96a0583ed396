//! Post and comment cards used by every feed page.

use maud::{html, Markup, Render};

use crate::db::{CommentView, PostView};

/// A post in a feed listing.
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    pub post: &'a PostView,
    /// Show the group link (off on the group's own page).
    pub show_group: bool,
    /// Show the author link (off on the author's own profile).
    pub show_author: bool,
}

impl<'a> PostCard<'a> {
    #[must_use]
    pub const fn new(post: &'a PostView) -> Self {
        Self {
            post,
            show_group: true,
            show_author: true,
        }
    }

    #[must_use]
    pub const fn hide_group(mut self) -> Self {
        self.show_group = false;
        self
    }

    #[must_use]
    pub const fn hide_author(mut self) -> Self {
        self.show_author = false;
        self
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        html! {
            article class="post-card" data-post-id=(post.id) {
                header {
                    ul class="post-meta" {
                        @if self.show_author {
                            li {
                                "Author: "
                                a href={ "/profile/" (post.author_username) "/" } { (post.author_username) }
                            }
                        }
                        li { "Published: " time { (post.pub_date) } }
                    }
                }
                @if let Some(ref image) = post.image {
                    img class="post-image" src={ "/media/" (image) } alt="";
                }
                p class="post-text" { (post.text) }
                footer {
                    a href={ "/posts/" (post.id) "/" } { "Details" }
                    @if self.show_group {
                        @if let (Some(slug), Some(title)) = (&post.group_slug, &post.group_title) {
                            " | "
                            a class="post-group" href={ "/group/" (slug) "/" } { "#" (title) }
                        }
                    }
                }
            }
        }
    }
}

/// A list of post cards, or an empty-state message.
#[derive(Debug, Clone)]
pub struct PostList<'a> {
    pub posts: &'a [PostView],
    pub show_group: bool,
    pub show_author: bool,
    pub empty_message: &'a str,
}

impl<'a> PostList<'a> {
    #[must_use]
    pub const fn new(posts: &'a [PostView]) -> Self {
        Self {
            posts,
            show_group: true,
            show_author: true,
            empty_message: "No posts yet.",
        }
    }

    #[must_use]
    pub const fn hide_group(mut self) -> Self {
        self.show_group = false;
        self
    }

    #[must_use]
    pub const fn hide_author(mut self) -> Self {
        self.show_author = false;
        self
    }

    #[must_use]
    pub const fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }
}

impl Render for PostList<'_> {
    fn render(&self) -> Markup {
        if self.posts.is_empty() {
            return EmptyState::new(self.empty_message).render();
        }

        html! {
            div class="post-list" {
                @for post in self.posts {
                    @let card = PostCard {
                        post,
                        show_group: self.show_group,
                        show_author: self.show_author,
                    };
                    (card)
                    hr;
                }
            }
        }
    }
}

/// A single comment under a post.
#[derive(Debug, Clone)]
pub struct CommentItem<'a> {
    pub comment: &'a CommentView,
}

impl Render for CommentItem<'_> {
    fn render(&self) -> Markup {
        let c = self.comment;
        html! {
            div class="comment" data-comment-id=(c.id) {
                h5 {
                    @if let Some(ref username) = c.author_username {
                        a href={ "/profile/" (username) "/" } { (username) }
                    } @else {
                        "Anonymous"
                    }
                    " "
                    small { (c.created) }
                }
                p { (c.text) }
            }
        }
    }
}

/// Empty state message.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(group: bool) -> PostView {
        PostView {
            id: 7,
            text: "test_post".to_string(),
            pub_date: "2024-01-15 12:00:00".to_string(),
            image: Some("posts/abc.gif".to_string()),
            author_id: 1,
            author_username: "NoName".to_string(),
            group_id: group.then_some(3),
            group_title: group.then(|| "test_title".to_string()),
            group_slug: group.then(|| "test_slug".to_string()),
        }
    }

    #[test]
    fn test_post_card_links() {
        let post = sample_post(true);
        let html = PostCard::new(&post).render().into_string();

        assert!(html.contains(r#"href="/profile/NoName/""#));
        assert!(html.contains(r#"href="/posts/7/""#));
        assert!(html.contains(r#"href="/group/test_slug/""#));
        assert!(html.contains(r#"src="/media/posts/abc.gif""#));
        assert!(html.contains("test_post"));
    }

    #[test]
    fn test_post_card_hidden_parts() {
        let post = sample_post(true);
        let html = PostCard::new(&post)
            .hide_group()
            .hide_author()
            .render()
            .into_string();

        assert!(!html.contains("/group/"));
        assert!(!html.contains("/profile/"));
    }

    #[test]
    fn test_post_card_without_group() {
        let post = sample_post(false);
        let html = PostCard::new(&post).render().into_string();
        assert!(!html.contains("/group/"));
    }

    #[test]
    fn test_post_list_empty() {
        let html = PostList::new(&[])
            .empty_message("Nothing here.")
            .render()
            .into_string();
        assert_eq!(html, r#"<p class="empty-state">Nothing here.</p>"#);
    }

    #[test]
    fn test_comment_item_anonymous() {
        let comment = CommentView {
            id: 1,
            post_id: 7,
            author_id: None,
            author_username: None,
            text: "hi".to_string(),
            created: "2024-01-15 12:00:00".to_string(),
        };
        let html = CommentItem { comment: &comment }.render().into_string();
        assert!(html.contains("Anonymous"));
        assert!(html.contains("<p>hi</p>"));
    }
}
