//! Feed composition, the follow graph and post/comment authoring.
//!
//! Every operation takes the acting user's id explicitly; nothing here looks
//! up the current user from request or process state.

pub mod comments;
pub mod composer;
pub mod follow;
pub mod paginator;
pub mod posts;

pub use comments::add_comment;
pub use composer::{FeedComposer, PostDetail};
pub use follow::FollowGraph;
pub use paginator::{parse_page_number, FeedPage, Paginator};
pub use posts::{create_post, delete_post, edit_post, ensure_author, PostInput};
