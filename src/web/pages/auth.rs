//! Authentication pages for the web UI.
//!
//! This module provides maud-based templates for signup, login and logout.

use maud::{html, Markup, Render};

use super::FieldError;
use crate::components::{Alert, BaseLayout, Form, FormGroup, Input};
use crate::db::User;

/// Render the login page.
///
/// # Arguments
///
/// * `error` - Optional error message to display
/// * `username` - Previously submitted username to keep in the form
/// * `next` - Local path to return to after logging in
#[must_use]
pub fn render_login_page(error: Option<&str>, username: &str, next: Option<&str>) -> Markup {
    let content = html! {
        div class="auth-container" {
            h1 { "Log in" }

            @if let Some(e) = error {
                (Alert::error(e))
            }

            (Form::post("/auth/login/", html! {
                @if let Some(next) = next {
                    (Input::hidden("next", next))
                }
                (FormGroup::new(
                    "Username",
                    "id_username",
                    Input::text("username")
                        .id("id_username")
                        .value(username)
                        .required()
                        .autocomplete("username")
                        .render(),
                ))
                (FormGroup::new(
                    "Password",
                    "id_password",
                    Input::password("password")
                        .id("id_password")
                        .required()
                        .autocomplete("current-password")
                        .render(),
                ))
                button type="submit" { "Log in" }
            }))

            p {
                "Don't have an account? "
                a href="/auth/signup/" { "Sign up" }
            }
        }
    };

    BaseLayout::new("Log in", None).render(content)
}

/// Render the signup page, keeping the submitted username on error.
#[must_use]
pub fn render_signup_page(error: Option<FieldError<'_>>, username: &str) -> Markup {
    let error_for = |field: &str| error.filter(|e| e.field == field).map(|e| e.message);

    let content = html! {
        div class="auth-container" {
            h1 { "Sign up" }

            @if error.is_some() {
                (Alert::error("Please correct the errors below."))
            }

            (Form::post("/auth/signup/", html! {
                (FormGroup::new(
                    "Username",
                    "id_username",
                    Input::text("username")
                        .id("id_username")
                        .value(username)
                        .required()
                        .autocomplete("username")
                        .render(),
                )
                .help("Required. 150 characters or fewer. Letters, digits and @/./+/-/_ only.")
                .error(error_for("username")))
                (FormGroup::new(
                    "Password",
                    "id_password1",
                    Input::password("password1")
                        .id("id_password1")
                        .required()
                        .autocomplete("new-password")
                        .render(),
                )
                .help("At least 8 characters, not entirely numeric.")
                .error(error_for("password1")))
                (FormGroup::new(
                    "Password confirmation",
                    "id_password2",
                    Input::password("password2")
                        .id("id_password2")
                        .required()
                        .autocomplete("new-password")
                        .render(),
                )
                .error(error_for("password2")))
                button type="submit" { "Sign up" }
            }))

            p {
                "Already have an account? "
                a href="/auth/login/" { "Log in" }
            }
        }
    };

    BaseLayout::new("Sign up", None).render(content)
}

/// Render the page shown after logging out.
#[must_use]
pub fn render_logged_out_page(user: Option<&User>) -> Markup {
    let content = html! {
        div class="auth-container" {
            (Alert::info("Thanks for spending some time on the site today.")
                .with_title("You have been logged out."))
            p {
                a href="/auth/login/" { "Log in again" }
            }
        }
    };

    BaseLayout::new("Logged out", user).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page_carries_next() {
        let html = render_login_page(None, "", Some("/create/")).into_string();
        assert!(html.contains(r#"name="next" value="/create/""#));
        assert!(html.contains(r#"action="/auth/login/""#));
    }

    #[test]
    fn test_login_page_error() {
        let html = render_login_page(Some("Invalid username or password"), "bob", None).into_string();
        assert!(html.contains("Invalid username or password"));
        assert!(html.contains(r#"value="bob""#));
        assert!(!html.contains(r#"name="next""#));
    }

    #[test]
    fn test_signup_page_field_error() {
        let html = render_signup_page(
            Some(FieldError {
                field: "password2",
                message: "The two password fields didn't match.",
            }),
            "alice",
        )
        .into_string();
        assert!(html.contains("The two password fields didn't match."));
        assert!(html.contains(r#"value="alice""#));
    }
}
