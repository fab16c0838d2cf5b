//! Shared route helpers for page rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use wx_blog::BlogError;
use wx_sdk::AuthProvider;

use crate::error::AppError;
use crate::state::AppState;

/// Inject site-wide context variables into a Tera context.
///
/// Adds: `site_url`, `editor_enabled`, `user_name`
pub fn inject_site_context(state: &AppState, context: &mut tera::Context) {
    context.insert("site_url", &state.config().site_url);
    context.insert("editor_enabled", &state.config().editor_enabled);
    let user_name = state
        .host()
        .auth
        .current_user()
        .map(|u| u.display_name())
        .unwrap_or_default();
    context.insert("user_name", &user_name);
}

/// Render a template with the site context, answering `status`.
pub fn render_template_with_status(
    state: &AppState,
    status: StatusCode,
    template: &str,
    mut context: tera::Context,
) -> Response {
    inject_site_context(state, &mut context);
    match state.theme().render(template, &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => AppError::Internal(e).into_response(),
    }
}

/// Render a template with the site context.
pub fn render_template(state: &AppState, template: &str, context: tera::Context) -> Response {
    render_template_with_status(state, StatusCode::OK, template, context)
}

/// Render a plain error page.
pub fn render_error(status: StatusCode, message: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html><head><title>Error</title></head>
<body>
<div style="max-width: 600px; margin: 100px auto; text-align: center;">
<h1>Error</h1>
<p>{}</p>
<p><a href="/admin/blog">Return to the blog dashboard</a></p>
</div>
</body></html>"#,
        html_escape(message)
    );

    (status, Html(html)).into_response()
}

/// Render a 404 page.
pub fn render_not_found() -> Response {
    let html = r#"<!DOCTYPE html>
<html><head><title>Not Found</title></head>
<body>
<div style="max-width: 600px; margin: 100px auto; text-align: center;">
<h1>Not Found</h1>
<p>The requested page could not be found.</p>
<p><a href="/blogs">Return to the blog</a></p>
</div>
</body></html>"#;

    (StatusCode::NOT_FOUND, Html(html)).into_response()
}

/// Page for a failed blog command. Host faults are logged and hidden.
pub fn render_blog_error(err: BlogError) -> Response {
    if !err.is_user_facing() {
        return AppError::from(err).into_response();
    }
    let err = AppError::from(err);
    render_error(err.status(), &err.to_string())
}

/// HTML-escape a string for safe output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
