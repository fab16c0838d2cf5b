//! Public blog pages: the post listing, single posts, comments and the
//! inline editor.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use wx_blog::components::{
    LISTING_PAGE_PATH, LISTING_RENDERER, POST_RENDERER, listing_filter, post_view_options,
};
use wx_blog::editor::SnippetKind;
use wx_blog::PLUGIN_NAME;
use wx_blog::post_view::{BLOCKED_PLACEHOLDER, PostPage, PostView, PostViewOptions};
use wx_sdk::types::BuilderComponent;

use crate::state::AppState;
use crate::theme::ThemeEngine;

use super::helpers::{
    render_blog_error, render_error, render_not_found, render_template,
    render_template_with_status,
};

#[derive(Debug, Default, Deserialize)]
struct ListingQuery {
    q: Option<String>,
    category: Option<String>,
    clear: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentFormData {
    #[serde(default)]
    text: String,
}

/// Inline editor actions. `content` is the source view's current text.
/// Snippet buttons only send `kind`, which implies a drop.
#[derive(Debug, Deserialize)]
struct EditorFormData {
    action: Option<String>,
    kind: Option<String>,
    content: Option<String>,
}

/// First blog component with the given renderer on the page at `url`.
fn placed_component(state: &AppState, url: &str, renderer: &str) -> Option<BuilderComponent> {
    state
        .host()
        .pages
        .find_by_url(url)?
        .components
        .into_iter()
        .find(|c| c.plugin_name == PLUGIN_NAME && c.plugin == renderer)
}

fn post_path(slug: &str) -> String {
    format!("blog/{slug}")
}

/// Resolve the published post shown at `/blog/{slug}`.
fn resolve_post(state: &AppState, slug: &str) -> Result<PostView, Response> {
    let path = post_path(slug);
    let options = placed_component(state, &path, POST_RENDERER)
        .map(|c| post_view_options(&c))
        .unwrap_or_else(PostViewOptions::default);
    state
        .blog()
        .post_view(&format!("/{path}"), &options)
        .map_err(render_blog_error)
}

/// GET /
async fn front_page() -> Redirect {
    Redirect::to(&format!("/{LISTING_PAGE_PATH}"))
}

/// Post listing with search and category filter.
///
/// GET /blogs?q=&category=&clear=
async fn listing(State(state): State<AppState>, Query(query): Query<ListingQuery>) -> Response {
    let mut filter = placed_component(&state, LISTING_PAGE_PATH, LISTING_RENDERER)
        .map(|c| listing_filter(&c))
        .unwrap_or_default();

    if query.clear.is_some() {
        filter.clear();
    } else {
        if let Some(q) = query.q {
            filter.search = q;
        }
        if let Some(category) = query.category.filter(|c| !c.trim().is_empty()) {
            filter.category = category;
        }
    }

    let view = match state.blog().listing(filter) {
        Ok(view) => view,
        Err(e) => return render_blog_error(e),
    };

    let mut context = tera::Context::new();
    context.insert("view", &view);
    context.insert("match_count", &view.match_count());
    context.insert("path", &format!("/{LISTING_PAGE_PATH}"));
    render_template(&state, "blog/listing.html", context)
}

fn editor_context(state: &AppState, page: &PostPage) -> serde_json::Value {
    let session = state.editor(&page.post.id);
    let snippets: Vec<_> = SnippetKind::ALL
        .iter()
        .map(|k| serde_json::json!({"id": k.as_str(), "label": k.label()}))
        .collect();
    serde_json::json!({
        "open": session.is_some(),
        "content": session
            .as_ref()
            .map(|s| s.content().to_string())
            .unwrap_or_else(|| page.post.content.clone()),
        "snippets": snippets,
    })
}

/// A single post.
///
/// GET /blog/{slug}
async fn show_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let page = match resolve_post(&state, &slug) {
        Ok(PostView::Found(page)) => page,
        Ok(PostView::NotFound) => {
            let mut context = tera::Context::new();
            context.insert("slug", &slug);
            context.insert("path", &format!("/{}", post_path(&slug)));
            return render_template_with_status(
                &state,
                StatusCode::NOT_FOUND,
                "blog/not-found.html",
                context,
            );
        }
        Err(response) => return response,
    };

    let mut context = tera::Context::new();
    if page.show_comments {
        context.insert("comments", &state.comments(&page.post.id));
    }
    if state.config().editor_enabled {
        context.insert("editor", &editor_context(&state, &page));
    }
    context.insert("post_page", &page);
    context.insert("blocked_placeholder", BLOCKED_PLACEHOLDER);
    context.insert("path", &format!("/{}", post_path(&slug)));

    let suggestions = ThemeEngine::post_suggestions(&slug);
    let refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
    let template = state
        .theme()
        .resolve_template(&refs)
        .unwrap_or_else(|| "blog/post.html".to_string());
    render_template(&state, &template, context)
}

/// Add a comment under a post.
///
/// POST /blog/{slug}/comments
async fn submit_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<CommentFormData>,
) -> Response {
    let page = match resolve_post(&state, &slug) {
        Ok(PostView::Found(page)) => page,
        Ok(PostView::NotFound) => return render_not_found(),
        Err(response) => return response,
    };
    if !page.show_comments {
        return render_error(StatusCode::FORBIDDEN, "Comments are disabled.");
    }

    match state.submit_comment(&page.post.id, &form.text) {
        Some(comment) => {
            tracing::info!(post_id = %page.post.id, comment_id = comment.id, "comment added");
        }
        None => tracing::debug!(post_id = %page.post.id, "blank comment ignored"),
    }
    Redirect::to(&format!("/{}#comments", post_path(&slug))).into_response()
}

/// Inline editor: drop a snippet, save or discard the buffer.
///
/// POST /blog/{slug}/editor
async fn editor_action(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<EditorFormData>,
) -> Response {
    if !state.config().editor_enabled {
        return render_not_found();
    }
    let page = match resolve_post(&state, &slug) {
        Ok(PostView::Found(page)) => page,
        Ok(PostView::NotFound) => return render_not_found(),
        Err(response) => return response,
    };
    let post_id = page.post.id.as_str();
    let back = format!("/{}#editor", post_path(&slug));

    let action = match (&form.action, &form.kind) {
        (Some(action), _) => action.clone(),
        (None, Some(_)) => "drop".to_string(),
        (None, None) => String::new(),
    };

    match action.as_str() {
        "drop" => {
            let kind: SnippetKind = match form.kind.as_deref().unwrap_or_default().parse() {
                Ok(kind) => kind,
                Err(message) => return render_error(StatusCode::BAD_REQUEST, &message),
            };
            state.with_editor(post_id, &page.post.content, |session| {
                if let Some(content) = form.content {
                    session.set_content(content);
                }
                session.drop_snippet(kind);
            });
            tracing::debug!(post_id, snippet = %kind, "snippet dropped");
        }
        "save" => {
            let content = state.with_editor(post_id, &page.post.content, |session| {
                if let Some(content) = form.content {
                    session.set_content(content);
                }
                session.content().to_string()
            });
            if let Err(e) = state.blog().save_post_content(post_id, &content) {
                return render_blog_error(e);
            }
            state.close_editor(post_id);
        }
        "discard" => {
            state.close_editor(post_id);
        }
        other => {
            return render_error(
                StatusCode::BAD_REQUEST,
                &format!("Unknown editor action '{other}'."),
            );
        }
    }

    Redirect::to(&back).into_response()
}

/// Create the public blog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(front_page))
        .route("/blogs", get(listing))
        .route("/blog/{slug}", get(show_post))
        .route("/blog/{slug}/comments", post(submit_comment))
        .route("/blog/{slug}/editor", post(editor_action))
}
