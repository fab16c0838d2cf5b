//! Theme engine and template rendering.
//!
//! Tera-based rendering with template suggestion resolution, so a single
//! post can be given its own template without touching route code.

mod engine;

pub use engine::ThemeEngine;
