//! Serves uploaded media from the uploads directory.

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{Response, StatusCode, header},
    routing::get,
};
use tokio::fs;
use tracing::warn;

use crate::state::AppState;

/// Create the uploaded files router, mounted at the configured files URL.
pub fn router(files_url: &str) -> Router<AppState> {
    let base = files_url.trim_end_matches('/');
    Router::new().route(&format!("{base}/{{*path}}"), get(serve_file))
}

/// Serve an uploaded file.
async fn serve_file(State(state): State<AppState>, Path(path): Path<String>) -> Response<Body> {
    let path = path.trim_start_matches('/');
    if path.contains("..") || path.contains('\0') || path.contains('\\') {
        return not_found();
    }

    let file_path = state.config().uploads_dir.join(path);
    let content = match fs::read(&file_path).await {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %file_path.display(), error = %e, "failed to read uploaded file");
            }
            return not_found();
        }
    };

    // Uploads are named by the media library, so trust the bytes first.
    let content_type = infer::get(&content)
        .map(|t| t.mime_type())
        .unwrap_or_else(|| mime_from_path(&file_path));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(content))
        .unwrap_or_else(|e| {
            warn!(error = %e, "failed to build file response");
            not_found()
        })
}

fn not_found() -> Response<Body> {
    let mut response = Response::new(Body::from("Not found"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

fn mime_from_path(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_falls_back_to_octet_stream() {
        assert_eq!(mime_from_path(std::path::Path::new("a.png")), "image/png");
        assert_eq!(
            mime_from_path(std::path::Path::new("a.exe")),
            "application/octet-stream"
        );
    }
}
