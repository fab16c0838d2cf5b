//! Blog plugin for the WX website builder.
//!
//! Posts, categories and settings live in one blob in the host's key-value
//! store under [`NAMESPACE`]. Every post also gets a hidden builder page at
//! `blog/<slug>`, and a public listing page lives at `blogs`.
//!
//! [`BlogService`] is the entry point for hosts. The view modules
//! ([`dashboard`], [`listing`], [`post_view`]) produce serializable view
//! models that the host renders with its own templates.

pub mod blog;
pub mod comments;
pub mod components;
pub mod dashboard;
pub mod defaults;
pub mod editor;
pub mod error;
pub mod form;
pub mod listing;
pub mod model;
pub mod post_view;
pub mod service;
pub mod slug;

pub use blog::{Blog, Confirmation, NewPost};
pub use error::{BlogError, BlogResult, ValidationError};
pub use model::{BlogCategory, BlogPost, BlogSettings, BlogState, BlogStats, PostStatus};
pub use service::BlogService;
pub use slug::create_slug;

/// Store namespace holding `{posts, categories, blogSettings}`.
pub const NAMESPACE: &str = "Blog";

/// Name the plugin's components are registered under.
pub const PLUGIN_NAME: &str = "Blog";

/// Plugin the blog waits for on mount.
pub const AUTH_PLUGIN: &str = "wx-auth";
