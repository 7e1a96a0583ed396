//! Maud-based page templates for the web UI.
//!
//! This module contains full page implementations using maud templates.
//! Each page module exports a render function that produces the complete HTML.

pub mod auth;
pub mod feed;
pub mod post;
pub mod site;

pub use auth::{render_logged_out_page, render_login_page, render_signup_page};
pub use feed::{
    render_follow_page, render_group_page, render_index_page, render_profile_page,
    ProfilePageParams,
};
pub use post::{render_post_detail_page, render_post_form_page, PostDetailParams, PostFormParams};
pub use site::{render_about_author_page, render_about_tech_page, render_not_found_page};

/// A validation message attached to one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError<'a> {
    pub field: &'a str,
    pub message: &'a str,
}

impl<'a> FieldError<'a> {
    #[must_use]
    pub const fn new(field: &'a str, message: &'a str) -> Self {
        Self { field, message }
    }
}
