//! Admin routes for the blog dashboard.
//!
//! Posts, categories and settings are edited through plain HTML forms.
//! Rejected forms are rendered again with the alert and the values the
//! author typed; successful submissions redirect back to the dashboard tab.

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use base64::Engine;
use serde::Deserialize;
use wx_blog::dashboard::Tab;
use wx_blog::form::{CategoryForm, EditPostForm, ImageUpload, PostForm};
use wx_blog::{BlogError, BlogSettings, Confirmation, PostStatus, ValidationError};

use crate::host::media::MAX_FILE_SIZE;
use crate::state::AppState;

use super::helpers::{render_blog_error, render_error, render_template_with_status};

const DASHBOARD: &str = "/admin/blog";

// =============================================================================
// Form data
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct DashboardQuery {
    tab: Option<String>,
    q: Option<String>,
}

/// Answer to a delete prompt. Only the confirm button carries `confirm`.
#[derive(Debug, Deserialize)]
struct ConfirmFormData {
    confirm: Option<String>,
}

/// Settings tab. Unchecked checkboxes are simply absent.
#[derive(Debug, Deserialize)]
struct SettingsFormData {
    enable_comments: Option<String>,
    moderate_comments: Option<String>,
    show_author: Option<String>,
    show_date: Option<String>,
    allow_ratings: Option<String>,
    posts_per_page: String,
    default_category: String,
}

impl SettingsFormData {
    fn into_settings(self) -> Result<BlogSettings, ValidationError> {
        let posts_per_page = self
            .posts_per_page
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidPostsPerPage)?;
        Ok(BlogSettings {
            enable_comments: self.enable_comments.is_some(),
            moderate_comments: self.moderate_comments.is_some(),
            posts_per_page,
            show_author: self.show_author.is_some(),
            show_date: self.show_date.is_some(),
            allow_ratings: self.allow_ratings.is_some(),
            default_category: self.default_category.trim().to_string(),
        })
    }
}

fn tab_url(tab: Tab) -> String {
    format!("{DASHBOARD}?tab={tab}")
}

fn statuses() -> serde_json::Value {
    PostStatus::ALL
        .iter()
        .map(|s| serde_json::json!({"value": s.as_str(), "label": s.label()}))
        .collect()
}

fn category_names(state: &AppState) -> Result<Vec<String>, BlogError> {
    Ok(state
        .blog()
        .load()?
        .categories()
        .iter()
        .map(|c| c.name.clone())
        .collect())
}

// =============================================================================
// Dashboard
// =============================================================================

/// Render the dashboard, optionally with alerts from a rejected form.
fn render_dashboard(state: &AppState, tab: Tab, search: &str, errors: &[String]) -> Response {
    let dashboard = match state.blog().dashboard(tab, search) {
        Ok(dashboard) => dashboard,
        Err(e) => return render_blog_error(e),
    };

    let tabs: Vec<_> = Tab::ALL
        .iter()
        .map(|t| serde_json::json!({"id": t.as_str(), "label": t.label()}))
        .collect();

    let mut context = tera::Context::new();
    context.insert("dashboard", &dashboard);
    context.insert("tabs", &tabs);
    context.insert("errors", errors);
    context.insert("path", &tab_url(tab));

    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    render_template_with_status(state, status, "admin/dashboard.html", context)
}

/// GET /admin/blog?tab=&q=
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let tab = query
        .tab
        .as_deref()
        .and_then(|t| t.parse().ok())
        .unwrap_or_default();
    render_dashboard(&state, tab, query.q.as_deref().unwrap_or_default(), &[])
}

// =============================================================================
// Post handlers
// =============================================================================

fn render_post_form(
    state: &AppState,
    action: &str,
    editing: bool,
    values: serde_json::Value,
    errors: &[String],
) -> Response {
    let categories = match category_names(state) {
        Ok(categories) => categories,
        Err(e) => return render_blog_error(e),
    };

    let mut context = tera::Context::new();
    context.insert("action", action);
    context.insert("editing", &editing);
    context.insert("values", &values);
    context.insert("errors", errors);
    context.insert("categories", &categories);
    context.insert("statuses", &statuses());
    context.insert("path", action);

    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    render_template_with_status(state, status, "admin/post-form.html", context)
}

/// Show add post form.
///
/// GET /admin/blog/posts/add
async fn add_post_form(State(state): State<AppState>) -> Response {
    render_post_form(
        &state,
        "/admin/blog/posts/add",
        false,
        serde_json::json!({"status": PostStatus::default().as_str()}),
        &[],
    )
}

/// Read the multipart Add-Post form.
///
/// The featured image arrives as a file part and is turned into a `data:`
/// URL for the media library. An empty file part means no image was picked.
async fn read_post_form(
    multipart: &mut Multipart,
) -> Result<(PostForm, Option<ImageUpload>), String> {
    let mut form = PostForm::default();
    let mut image = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read post form");
                return Err("Failed to read form data".to_string());
            }
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == "featured_image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let mime = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| {
                tracing::warn!(error = %e, "failed to read upload data");
                "Failed to read file data".to_string()
            })?;
            if bytes.len() > MAX_FILE_SIZE {
                return Err(format!(
                    "File too large: {} bytes (max {MAX_FILE_SIZE} bytes)",
                    bytes.len()
                ));
            }
            if !bytes.is_empty() {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
                image = Some(ImageUpload {
                    file_name,
                    data_url: format!("data:{mime};base64,{encoded}"),
                    mime,
                });
            }
            continue;
        }

        let value = field.text().await.map_err(|e| {
            tracing::warn!(error = %e, field = %name, "failed to read form field");
            "Failed to read form data".to_string()
        })?;
        match name.as_str() {
            "title" => form.title = value,
            "content" => form.content = value,
            "excerpt" => form.excerpt = value,
            "category" => form.category = value,
            "tags" => form.tags = value,
            "status" => form.status = value.parse().unwrap_or_default(),
            _ => {}
        }
    }

    Ok((form, image))
}

/// Handle add post form submission.
///
/// POST /admin/blog/posts/add
async fn add_post_submit(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let action = "/admin/blog/posts/add";
    let (form, image) = match read_post_form(&mut multipart).await {
        Ok(parsed) => parsed,
        Err(message) => return render_error(StatusCode::BAD_REQUEST, &message),
    };

    let values = serde_json::json!({
        "title": form.title,
        "content": form.content,
        "excerpt": form.excerpt,
        "category": form.category,
        "tags": form.tags,
        "status": form.status.as_str(),
    });

    match state.blog().create_post(form, image).await {
        Ok(_) => Redirect::to(&tab_url(Tab::Posts)).into_response(),
        Err(BlogError::Validation(e)) => {
            render_post_form(&state, action, false, values, &[e.to_string()])
        }
        Err(e) => render_blog_error(e),
    }
}

/// Show edit post form.
///
/// GET /admin/blog/posts/{id}/edit
async fn edit_post_form(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let blog = match state.blog().load() {
        Ok(blog) => blog,
        Err(e) => return render_blog_error(e),
    };
    let Some(post) = blog.post(&id) else {
        return render_blog_error(BlogError::PostNotFound(id));
    };

    let values = serde_json::json!({
        "id": post.id,
        "title": post.title,
        "excerpt": post.excerpt,
        "category": post.category,
        "tags": post.tags.join(", "),
        "status": post.status.as_str(),
        "featured_image": post.featured_image,
        "slug": post.slug,
    });
    render_post_form(
        &state,
        &format!("/admin/blog/posts/{id}/edit"),
        true,
        values,
        &[],
    )
}

/// Handle edit post form submission.
///
/// POST /admin/blog/posts/{id}/edit
async fn edit_post_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<EditPostForm>,
) -> Response {
    match state.blog().update_post(&id, &form) {
        Ok(_) => Redirect::to(&tab_url(Tab::Posts)).into_response(),
        Err(BlogError::Validation(e)) => {
            let values = serde_json::json!({
                "id": id,
                "title": form.title,
                "excerpt": form.excerpt,
                "category": form.category,
                "tags": form.tags,
                "status": form.status.as_str(),
                "featured_image": form.featured_image,
            });
            render_post_form(
                &state,
                &format!("/admin/blog/posts/{id}/edit"),
                true,
                values,
                &[e.to_string()],
            )
        }
        Err(e) => render_blog_error(e),
    }
}

fn render_confirm(
    state: &AppState,
    title: &str,
    message: &str,
    action: &str,
    cancel: &str,
) -> Response {
    let mut context = tera::Context::new();
    context.insert("title", title);
    context.insert("message", message);
    context.insert("action", action);
    context.insert("cancel", cancel);
    context.insert("path", action);
    render_template_with_status(state, StatusCode::OK, "admin/confirm.html", context)
}

/// Ask before deleting a post.
///
/// GET /admin/blog/posts/{id}/delete
async fn delete_post_confirm(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let blog = match state.blog().load() {
        Ok(blog) => blog,
        Err(e) => return render_blog_error(e),
    };
    let Some(post) = blog.post(&id) else {
        return render_blog_error(BlogError::PostNotFound(id));
    };
    render_confirm(
        &state,
        "Delete post",
        &format!("Are you sure you want to delete \"{}\"?", post.title),
        &format!("/admin/blog/posts/{id}/delete"),
        &tab_url(Tab::Posts),
    )
}

/// POST /admin/blog/posts/{id}/delete
async fn delete_post_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ConfirmFormData>,
) -> Response {
    let confirmation = Confirmation::from(form.confirm.is_some());
    match state.blog().delete_post(&id, confirmation) {
        Ok(_) => Redirect::to(&tab_url(Tab::Posts)).into_response(),
        Err(e) => render_blog_error(e),
    }
}

// =============================================================================
// Category handlers
// =============================================================================

fn render_category_form(
    state: &AppState,
    action: &str,
    editing: bool,
    values: serde_json::Value,
    errors: &[String],
) -> Response {
    let mut context = tera::Context::new();
    context.insert("action", action);
    context.insert("editing", &editing);
    context.insert("values", &values);
    context.insert("errors", errors);
    context.insert("path", action);

    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    render_template_with_status(state, status, "admin/category-form.html", context)
}

/// Show add category form.
///
/// GET /admin/blog/categories/add
async fn add_category_form(State(state): State<AppState>) -> Response {
    render_category_form(
        &state,
        "/admin/blog/categories/add",
        false,
        serde_json::json!({}),
        &[],
    )
}

/// Handle add category form submission.
///
/// POST /admin/blog/categories/add
async fn add_category_submit(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Response {
    match state.blog().create_category(&form) {
        Ok(_) => Redirect::to(&tab_url(Tab::Categories)).into_response(),
        Err(BlogError::Validation(e)) => render_category_form(
            &state,
            "/admin/blog/categories/add",
            false,
            serde_json::json!({"name": form.name, "description": form.description}),
            &[e.to_string()],
        ),
        Err(e) => render_blog_error(e),
    }
}

/// Show edit category form.
///
/// GET /admin/blog/categories/{id}/edit
async fn edit_category_form(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let blog = match state.blog().load() {
        Ok(blog) => blog,
        Err(e) => return render_blog_error(e),
    };
    let Some(category) = blog.category(&id) else {
        return render_blog_error(BlogError::CategoryNotFound(id));
    };
    render_category_form(
        &state,
        &format!("/admin/blog/categories/{id}/edit"),
        true,
        serde_json::json!({
            "id": category.id,
            "name": category.name,
            "slug": category.slug,
            "description": category.description,
        }),
        &[],
    )
}

/// Handle edit category form submission.
///
/// POST /admin/blog/categories/{id}/edit
async fn edit_category_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Response {
    match state.blog().update_category(&id, &form) {
        Ok(_) => Redirect::to(&tab_url(Tab::Categories)).into_response(),
        Err(BlogError::Validation(e)) => render_category_form(
            &state,
            &format!("/admin/blog/categories/{id}/edit"),
            true,
            serde_json::json!({"id": id, "name": form.name, "description": form.description}),
            &[e.to_string()],
        ),
        Err(e) => render_blog_error(e),
    }
}

/// Ask before deleting a category.
///
/// GET /admin/blog/categories/{id}/delete
async fn delete_category_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let blog = match state.blog().load() {
        Ok(blog) => blog,
        Err(e) => return render_blog_error(e),
    };
    let Some(category) = blog.category(&id) else {
        return render_blog_error(BlogError::CategoryNotFound(id));
    };
    render_confirm(
        &state,
        "Delete category",
        &format!(
            "Are you sure you want to delete \"{}\"? Its posts will be moved to {}.",
            category.name,
            blog.uncategorized_name()
        ),
        &format!("/admin/blog/categories/{id}/delete"),
        &tab_url(Tab::Categories),
    )
}

/// POST /admin/blog/categories/{id}/delete
async fn delete_category_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ConfirmFormData>,
) -> Response {
    let confirmation = Confirmation::from(form.confirm.is_some());
    match state.blog().delete_category(&id, confirmation) {
        Ok(_) => Redirect::to(&tab_url(Tab::Categories)).into_response(),
        Err(e) => render_blog_error(e),
    }
}

// =============================================================================
// Settings and maintenance
// =============================================================================

/// POST /admin/blog/settings
async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsFormData>,
) -> Response {
    let result = form
        .into_settings()
        .map_err(BlogError::from)
        .and_then(|settings| state.blog().save_settings(settings));

    match result {
        Ok(_) => Redirect::to(&tab_url(Tab::Settings)).into_response(),
        Err(BlogError::Validation(e)) => {
            render_dashboard(&state, Tab::Settings, "", &[e.to_string()])
        }
        Err(e) => render_blog_error(e),
    }
}

/// Register every post page again.
///
/// POST /admin/blog/pages/regenerate
async fn regenerate_pages(State(state): State<AppState>) -> Response {
    match state.blog().regenerate_pages() {
        Ok(_) => Redirect::to(&tab_url(Tab::Overview)).into_response(),
        Err(e) => render_blog_error(e),
    }
}

/// Create the blog admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/blog", get(dashboard))
        .route(
            "/admin/blog/posts/add",
            get(add_post_form).post(add_post_submit),
        )
        .route(
            "/admin/blog/posts/{id}/edit",
            get(edit_post_form).post(edit_post_submit),
        )
        .route(
            "/admin/blog/posts/{id}/delete",
            get(delete_post_confirm).post(delete_post_submit),
        )
        .route(
            "/admin/blog/categories/add",
            get(add_category_form).post(add_category_submit),
        )
        .route(
            "/admin/blog/categories/{id}/edit",
            get(edit_category_form).post(edit_category_submit),
        )
        .route(
            "/admin/blog/categories/{id}/delete",
            get(delete_category_confirm).post(delete_category_submit),
        )
        .route("/admin/blog/settings", post(save_settings))
        .route("/admin/blog/pages/regenerate", post(regenerate_pages))
        // Multipart overhead on top of the largest accepted image.
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn settings_form(posts_per_page: &str) -> SettingsFormData {
        SettingsFormData {
            enable_comments: Some("on".into()),
            moderate_comments: None,
            show_author: Some("on".into()),
            show_date: None,
            allow_ratings: None,
            posts_per_page: posts_per_page.into(),
            default_category: " uncategorized ".into(),
        }
    }

    #[test]
    fn checkboxes_map_to_booleans() {
        let settings = settings_form("12").into_settings().unwrap();
        assert!(settings.enable_comments);
        assert!(!settings.moderate_comments);
        assert!(settings.show_author);
        assert!(!settings.show_date);
        assert_eq!(settings.posts_per_page, 12);
        assert_eq!(settings.default_category, "uncategorized");
    }

    #[test]
    fn non_numeric_posts_per_page_is_rejected() {
        assert_eq!(
            settings_form("ten").into_settings().unwrap_err(),
            ValidationError::InvalidPostsPerPage
        );
    }

    #[test]
    fn tab_urls_use_lowercase_ids() {
        assert_eq!(tab_url(Tab::Categories), "/admin/blog?tab=categories");
    }
}
