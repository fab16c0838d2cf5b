//! Application error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use wx_blog::BlogError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error(transparent)]
    Blog(#[from] BlogError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Blog(e) => match e {
                BlogError::Validation(_) => StatusCode::BAD_REQUEST,
                BlogError::PostNotFound(_) | BlogError::CategoryNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                BlogError::DefaultCategoryProtected | BlogError::UncategorizedProtected => {
                    StatusCode::CONFLICT
                }
                BlogError::Host(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = format!("{e:#}"), "internal server error");
                "internal server error".to_string()
            }
            AppError::Blog(e) if !e.is_user_facing() => {
                tracing::error!(error = %e, "host error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (status, body).into_response()
    }
}
