//! Base layout components for the web UI.
//!
//! This module provides the main page layout structure including
//! the HTML skeleton, navigation, and footer.

use maud::{html, Markup, DOCTYPE};

use crate::db::User;

/// Site name shown in the header and page titles.
pub const SITE_NAME: &str = "Yatube";

/// Base page layout builder.
///
/// The user parameter is required so authentication state is always handled
/// explicitly: pass `None` for anonymous visitors.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page", user.as_ref()).render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    user: Option<&'a User>,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title and user.
    #[must_use]
    pub fn new(title: &'a str, user: Option<&'a User>) -> Self {
        Self { title, user }
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " - " (SITE_NAME) }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    (self.render_header())
                    main class="container" {
                        (content)
                    }
                    (Self::render_footer())
                }
            }
        }
    }

    /// Render the page header with navigation.
    fn render_header(&self) -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li {
                            a href="/" {
                                strong class="site-logo" { (SITE_NAME) }
                            }
                        }
                    }
                    ul {
                        li { a href="/about/author/" { "About" } }
                        li { a href="/about/tech/" { "Tech" } }
                        (self.render_auth_nav())
                    }
                }
            }
        }
    }

    /// Render authentication-related navigation items.
    fn render_auth_nav(&self) -> Markup {
        match self.user {
            Some(u) => html! {
                li { a href="/create/" { "New post" } }
                li { a href="/follow/" { "Following" } }
                li { a href={ "/profile/" (u.username) "/" } { (u.username) } }
                li { a href="/auth/logout/" { "Log out" } }
            },
            None => html! {
                li { a href="/auth/login/" { "Log in" } }
                li { a href="/auth/signup/" { "Sign up" } }
            },
        }
    }

    /// Render the page footer.
    fn render_footer() -> Markup {
        html! {
            footer class="container" {
                small { "© " (SITE_NAME) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: 1,
            username: "testuser".to_string(),
            password_hash: "hash".to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_base_layout_basic_structure() {
        let content = html! { h1 { "Test Content" } };
        let html = BaseLayout::new("Test Page", None).render(content).into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Page - Yatube</title>"));
        assert!(html.contains(r#"<main class="container">"#));
        assert!(html.contains("<h1>Test Content</h1>"));
    }

    #[test]
    fn test_base_layout_anonymous_user() {
        let html = BaseLayout::new("Anon", None)
            .render(html! {})
            .into_string();

        assert!(html.contains(r#"<a href="/auth/login/">Log in</a>"#));
        assert!(html.contains(r#"<a href="/auth/signup/">Sign up</a>"#));
        assert!(!html.contains("/follow/"));
    }

    #[test]
    fn test_base_layout_authenticated_user() {
        let user = test_user();
        let html = BaseLayout::new("Auth", Some(&user))
            .render(html! {})
            .into_string();

        assert!(html.contains(r#"<a href="/profile/testuser/">testuser</a>"#));
        assert!(html.contains(r#"<a href="/create/">New post</a>"#));
        assert!(html.contains(r#"<a href="/follow/">Following</a>"#));
        assert!(!html.contains("/auth/login/"));
    }
}
