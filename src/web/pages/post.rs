//! Post page templates using maud.
//!
//! - Post detail page with comments and the comment form
//! - Create/edit post form

use maud::{html, Markup, Render};

use super::FieldError;
use crate::components::{
    Alert, BaseLayout, CommentItem, EmptyState, Form, FormGroup, Input, Select, TextArea,
};
use crate::db::{Group, User};
use crate::feed::PostDetail;

/// Parameters for the post detail page.
#[derive(Debug, Clone)]
pub struct PostDetailParams<'a> {
    pub detail: &'a PostDetail,
    pub user: Option<&'a User>,
    /// Error from a rejected comment submission.
    pub comment_error: Option<&'a str>,
}

/// Render the post detail page at `/posts/<id>/`.
#[must_use]
pub fn render_post_detail_page(params: &PostDetailParams<'_>) -> Markup {
    let post = &params.detail.post;
    let is_author = params.user.is_some_and(|u| u.id == post.author_id);
    let title = post.summary();

    let content = html! {
        div class="post-detail" {
            aside class="post-sidebar" {
                ul {
                    li { "Published: " time { (post.pub_date) } }
                    @if let (Some(slug), Some(group_title)) = (&post.group_slug, &post.group_title) {
                        li {
                            "Group: "
                            a href={ "/group/" (slug) "/" } { (group_title) }
                        }
                    }
                    li {
                        "Author: "
                        a href={ "/profile/" (post.author_username) "/" } { (post.author_username) }
                    }
                    li {
                        "Posts by this author: "
                        span class="author-post-count" { (params.detail.author_post_count) }
                    }
                }
            }

            article {
                @if let Some(ref image) = post.image {
                    img class="post-image" src={ "/media/" (image) } alt="";
                }
                p class="post-text" { (post.text) }
                @if is_author {
                    footer class="post-actions" {
                        a href={ "/posts/" (post.id) "/edit/" } role="button" { "Edit" }
                        (Form::post(&format!("/posts/{}/delete/", post.id), html! {
                            button type="submit" class="secondary" { "Delete" }
                        }))
                    }
                }
            }
        }

        section class="comments" {
            h2 { "Comments" }
            @if params.user.is_some() {
                (Form::post(&format!("/posts/{}/comment/", post.id), html! {
                    (FormGroup::new(
                        "Add a comment",
                        "id_comment_text",
                        TextArea::new("text").id("id_comment_text").rows(3).required().render(),
                    ).error(params.comment_error))
                    button type="submit" { "Send" }
                }))
            }
            @if params.detail.comments.is_empty() {
                (EmptyState::new("No comments yet."))
            } @else {
                @for comment in &params.detail.comments {
                    (CommentItem { comment })
                }
            }
        }
    };

    BaseLayout::new(&title, params.user).render(content)
}

/// Parameters for the create/edit post form.
#[derive(Debug, Clone)]
pub struct PostFormParams<'a> {
    pub user: &'a User,
    /// Post being edited; `None` when creating.
    pub post_id: Option<i64>,
    pub text: &'a str,
    /// Currently selected group id as submitted.
    pub group: Option<&'a str>,
    pub groups: &'a [Group],
    /// Image already attached to the post being edited.
    pub current_image: Option<&'a str>,
    pub error: Option<FieldError<'a>>,
}

/// Render the post form at `/create/` or `/posts/<id>/edit/`.
#[must_use]
pub fn render_post_form_page(params: &PostFormParams<'_>) -> Markup {
    let (title, action, submit) = match params.post_id {
        Some(id) => ("Edit post", format!("/posts/{id}/edit/"), "Save"),
        None => ("New post", "/create/".to_string(), "Publish"),
    };

    let group_ids: Vec<String> = params.groups.iter().map(|g| g.id.to_string()).collect();
    let mut select = Select::new("group").id("id_group").option("", "---------");
    for (group, id) in params.groups.iter().zip(&group_ids) {
        select = select.option(id, &group.title);
    }
    let select = select.selected_opt(params.group);

    let error_for = |field: &str| {
        params
            .error
            .as_ref()
            .filter(|e| e.field == field)
            .map(|e| e.message)
    };

    let content = html! {
        h1 { (title) }
        @if params.error.is_some() {
            (Alert::error("Please correct the errors below."))
        }
        (Form::post(&action, html! {
            (FormGroup::new(
                "Text",
                "id_text",
                TextArea::new("text")
                    .id("id_text")
                    .rows(8)
                    .required()
                    .value(params.text)
                    .render(),
            )
            .help("Text of the new post")
            .error(error_for("text")))
            (FormGroup::new("Group", "id_group", select.render())
                .help("Group the post will belong to")
                .error(error_for("group")))
            @if let Some(image) = params.current_image {
                p class="current-image" {
                    "Current image: "
                    a href={ "/media/" (image) } { (image) }
                }
            }
            (FormGroup::new(
                "Image",
                "id_image",
                Input::file("image")
                    .id("id_image")
                    .accept("image/*")
                    .render(),
            )
            .error(error_for("image")))
            button type="submit" { (submit) }
        }).multipart())
    };

    BaseLayout::new(title, Some(params.user)).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CommentView, PostView};

    fn user(id: i64) -> User {
        User {
            id,
            username: format!("user{id}"),
            password_hash: String::new(),
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    fn detail() -> PostDetail {
        PostDetail {
            post: PostView {
                id: 5,
                text: "A rather long post body".to_string(),
                pub_date: "2024-01-15 12:00:00".to_string(),
                image: None,
                author_id: 1,
                author_username: "user1".to_string(),
                group_id: None,
                group_title: None,
                group_slug: None,
            },
            comments: vec![CommentView {
                id: 1,
                post_id: 5,
                author_id: Some(2),
                author_username: Some("user2".to_string()),
                text: "Nice".to_string(),
                created: "2024-01-15 13:00:00".to_string(),
            }],
            author_post_count: 4,
        }
    }

    #[test]
    fn test_detail_shows_author_actions_only_to_author() {
        let detail = detail();
        let author = user(1);
        let other = user(2);

        let html = render_post_detail_page(&PostDetailParams {
            detail: &detail,
            user: Some(&author),
            comment_error: None,
        })
        .into_string();
        assert!(html.contains(r#"href="/posts/5/edit/""#));
        assert!(html.contains(r#"action="/posts/5/delete/""#));

        let html = render_post_detail_page(&PostDetailParams {
            detail: &detail,
            user: Some(&other),
            comment_error: None,
        })
        .into_string();
        assert!(!html.contains("/posts/5/edit/"));
        assert!(html.contains(r#"action="/posts/5/comment/""#));
    }

    #[test]
    fn test_detail_title_and_counts() {
        let detail = detail();
        let html = render_post_detail_page(&PostDetailParams {
            detail: &detail,
            user: None,
            comment_error: None,
        })
        .into_string();

        assert!(html.contains("<title>A rather long p - Yatube</title>"));
        assert!(html.contains(r#"<span class="author-post-count">4</span>"#));
        assert!(html.contains("Nice"));
        assert!(!html.contains("/comment/"));
    }

    #[test]
    fn test_form_keeps_values_and_errors() {
        let author = user(1);
        let groups = vec![Group {
            id: 3,
            title: "Cats".to_string(),
            slug: "cats".to_string(),
            description: String::new(),
        }];
        let html = render_post_form_page(&PostFormParams {
            user: &author,
            post_id: None,
            text: "",
            group: Some("3"),
            groups: &groups,
            current_image: None,
            error: Some(FieldError {
                field: "text",
                message: "This field is required.",
            }),
        })
        .into_string();

        assert!(html.contains(r#"action="/create/""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"<option value="3" selected>Cats</option>"#));
        assert!(html.contains("This field is required."));
    }

    #[test]
    fn test_edit_form_action() {
        let author = user(1);
        let html = render_post_form_page(&PostFormParams {
            user: &author,
            post_id: Some(9),
            text: "old text",
            group: None,
            groups: &[],
            current_image: Some("posts/x.gif"),
            error: None,
        })
        .into_string();

        assert!(html.contains(r#"action="/posts/9/edit/""#));
        assert!(html.contains("old text"));
        assert!(html.contains(r#"href="/media/posts/x.gif""#));
    }
}
