//! Content processing shared by the public pages.

pub mod filter;

pub use filter::sanitize_post_html;
