//! WX development host library.
//!
//! Runs the blog plugin against file-backed host services and serves its
//! dashboard and public pages. The `wx` binary is the entry point; the
//! library is exposed for integration testing.

pub mod config;
pub mod content;
pub mod error;
pub mod host;
pub mod routes;
pub mod state;
pub mod theme;

use axum::Router;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;

/// Build the application router with every route module merged in.
///
/// Middleware that depends on deployment (CORS, tracing) is added by the
/// binary.
pub fn app(state: AppState) -> Router {
    let files_url = state.config().files_url.clone();
    Router::new()
        .merge(routes::front::router())
        .merge(routes::admin_blog::router())
        .merge(routes::health::router())
        .merge(routes::files::router(&files_url))
        .with_state(state)
}
