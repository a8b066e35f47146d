// src/error.rs

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{
    backend::BackendError,
    compose::ComposeError,
    grade_import::{ImportError, ParseError},
};

const BACKEND_UNAVAILABLE: &str = "The learning platform is unavailable, please try again later.";

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., an import already running)
    Conflict(String),

    // 502 Bad Gateway (backend unreachable or answered nonsense)
    BadGateway(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::BadGateway(msg) => {
                tracing::error!("Backend failure: {}", msg);
                (StatusCode::BAD_GATEWAY, BACKEND_UNAVAILABLE.to_string())
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized => AppError::AuthError(err.to_string()),
            BackendError::NotFound(msg) if msg.trim().is_empty() => {
                AppError::NotFound("Resource not found".to_string())
            }
            BackendError::NotFound(msg) => AppError::NotFound(msg),
            BackendError::Rejected { message, .. } => AppError::BadRequest(message),
            BackendError::Url(e) => AppError::InternalServerError(e.to_string()),
            other => AppError::BadGateway(other.to_string()),
        }
    }
}

impl From<ComposeError> for AppError {
    fn from(err: ComposeError) -> Self {
        tracing::warn!("Rejected draft: {}", err);
        AppError::BadRequest(err.to_string())
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::from(ImportError::from(err))
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Busy => AppError::Conflict(err.to_string()),
            ImportError::Rejected { message, source } => match source {
                BackendError::Unauthorized => AppError::AuthError(source.to_string()),
                BackendError::Transport(_) | BackendError::Status { .. } | BackendError::Decode(_) => {
                    AppError::BadGateway(source.to_string())
                }
                _ => AppError::BadRequest(message),
            },
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn backend_errors_map_to_statuses() {
        assert_eq!(status_of(BackendError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(BackendError::NotFound("quiz missing".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(BackendError::Rejected {
                code: -1,
                message: "duplicate title".to_string(),
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(BackendError::Status {
                endpoint: "/quizzes".to_string(),
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            }),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn local_failures_are_bad_requests() {
        assert_eq!(status_of(ComposeError::EmptyTitle), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ImportError::MissingFile), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ImportError::Busy), StatusCode::CONFLICT);
    }
}
