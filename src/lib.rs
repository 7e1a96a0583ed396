//! Yatube blog library.
//!
//! A small blogging service: authors publish posts, optionally filed into
//! groups, readers follow authors and comment, and the server renders every
//! page as HTML.

pub mod auth;
pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod media;
pub mod web;
