//! Maud HTML template components for the web UI.
//!
//! Components are organized into submodules by functionality:
//!
//! - `layout`: Base page layout and navigation
//! - `alert`: Alert messages
//! - `card`: Post cards, post lists and comments
//! - `form`: Form elements and input components
//! - `pagination`: Page navigation controls
//!
//! # Example
//!
//! ```ignore
//! use maud::{html, Markup};
//! use crate::components::{Alert, BaseLayout, PostList};
//!
//! fn my_page(posts: &[PostView]) -> Markup {
//!     let content = html! {
//!         h1 { "Latest posts" }
//!         (Alert::success("Post published."))
//!         (PostList::new(posts))
//!     };
//!     BaseLayout::new("Home", None).render(content)
//! }
//! ```

pub mod alert;
pub mod card;
pub mod form;
pub mod layout;
pub mod pagination;

pub use alert::{Alert, AlertVariant};
pub use card::{CommentItem, EmptyState, PostCard, PostList};
pub use form::{Form, FormGroup, Input, Select, SelectOption, TextArea};
pub use layout::{BaseLayout, SITE_NAME};
pub use pagination::Pagination;

/// Re-export maud for convenience
pub use maud::{html, Markup, PreEscaped, DOCTYPE};
