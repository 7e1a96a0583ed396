//! Feed page templates: the index, group, profile and following feeds.

use maud::{html, Markup};

use crate::components::{BaseLayout, Pagination, PostList};
use crate::db::{Group, PostView, User};
use crate::feed::FeedPage;

/// Render the global feed at `/`.
#[must_use]
pub fn render_index_page(page: &FeedPage<PostView>, user: Option<&User>) -> Markup {
    let content = html! {
        h1 { "Latest updates" }
        (PostList::new(&page.items))
        (Pagination::for_page(page, "/"))
    };

    BaseLayout::new("Latest updates", user).render(content)
}

/// Render a group's feed at `/group/<slug>/`.
#[must_use]
pub fn render_group_page(group: &Group, page: &FeedPage<PostView>, user: Option<&User>) -> Markup {
    let base_url = format!("/group/{}/", group.slug);

    let content = html! {
        h1 { (group.title) }
        @if !group.description.is_empty() {
            p class="group-description" { (group.description) }
        }
        (PostList::new(&page.items)
            .hide_group()
            .empty_message("No posts in this group yet."))
        (Pagination::for_page(page, &base_url))
    };

    BaseLayout::new(&group.title, user).render(content)
}

/// Parameters for an author's profile page.
#[derive(Debug, Clone)]
pub struct ProfilePageParams<'a> {
    pub author: &'a User,
    pub page: &'a FeedPage<PostView>,
    pub viewer: Option<&'a User>,
    /// Whether the viewer follows the author.
    pub following: bool,
    pub following_count: i64,
    pub follower_count: i64,
}

/// Render an author's feed at `/profile/<username>/`.
#[must_use]
pub fn render_profile_page(params: &ProfilePageParams<'_>) -> Markup {
    let author = params.author;
    let base_url = format!("/profile/{}/", author.username);
    let is_self = params.viewer.is_some_and(|v| v.id == author.id);

    let content = html! {
        section class="profile-header" {
            h1 { "All posts by " (author.username) }
            ul class="profile-stats" {
                li { "Posts: " strong class="post-count" { (params.page.total_count) } }
                li { "Following: " strong { (params.following_count) } }
                li { "Followers: " strong class="follower-count" { (params.follower_count) } }
            }
            @if params.viewer.is_some() && !is_self {
                @if params.following {
                    a class="button secondary" href={ (base_url) "unfollow/" } role="button" { "Unfollow" }
                } @else {
                    a class="button" href={ (base_url) "follow/" } role="button" { "Follow" }
                }
            }
        }
        (PostList::new(&params.page.items)
            .hide_author()
            .empty_message("This author has not posted yet."))
        (Pagination::for_page(params.page, &base_url))
    };

    BaseLayout::new(&author.username, params.viewer).render(content)
}

/// Render the viewer's following feed at `/follow/`.
#[must_use]
pub fn render_follow_page(page: &FeedPage<PostView>, user: &User) -> Markup {
    let content = html! {
        h1 { "Posts by authors you follow" }
        (PostList::new(&page.items)
            .empty_message("You are not following anyone yet, or they have not posted."))
        (Pagination::for_page(page, "/follow/"))
    };

    BaseLayout::new("Following", Some(user)).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Paginator;

    fn user(id: i64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            password_hash: String::new(),
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    fn empty_page() -> FeedPage<PostView> {
        FeedPage::new(Vec::new(), &Paginator::new(10, 0), 1)
    }

    #[test]
    fn test_profile_follow_button_for_other_user() {
        let author = user(1, "author");
        let viewer = user(2, "reader");
        let page = empty_page();
        let html = render_profile_page(&ProfilePageParams {
            author: &author,
            page: &page,
            viewer: Some(&viewer),
            following: false,
            following_count: 0,
            follower_count: 3,
        })
        .into_string();

        assert!(html.contains(r#"href="/profile/author/follow/""#));
        assert!(html.contains(r#"<strong class="follower-count">3</strong>"#));
    }

    #[test]
    fn test_profile_unfollow_button_when_following() {
        let author = user(1, "author");
        let viewer = user(2, "reader");
        let page = empty_page();
        let html = render_profile_page(&ProfilePageParams {
            author: &author,
            page: &page,
            viewer: Some(&viewer),
            following: true,
            following_count: 0,
            follower_count: 1,
        })
        .into_string();

        assert!(html.contains(r#"href="/profile/author/unfollow/""#));
    }

    #[test]
    fn test_profile_has_no_follow_button_for_self_or_anonymous() {
        let author = user(1, "author");
        let page = empty_page();
        for viewer in [None, Some(&author)] {
            let html = render_profile_page(&ProfilePageParams {
                author: &author,
                page: &page,
                viewer,
                following: false,
                following_count: 0,
                follower_count: 0,
            })
            .into_string();
            assert!(!html.contains("/profile/author/follow/"));
            assert!(!html.contains("/profile/author/unfollow/"));
        }
    }

    #[test]
    fn test_group_page_shows_description() {
        let group = Group {
            id: 1,
            title: "Cats".to_string(),
            slug: "cats".to_string(),
            description: "All about cats".to_string(),
        };
        let html = render_group_page(&group, &empty_page(), None).into_string();
        assert!(html.contains("<h1>Cats</h1>"));
        assert!(html.contains("All about cats"));
        assert!(html.contains("No posts in this group yet."));
    }
}
