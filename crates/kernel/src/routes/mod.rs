//! HTTP route handlers.

pub mod admin_blog;
pub mod files;
pub mod front;
pub mod health;
pub mod helpers;
