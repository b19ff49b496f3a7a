use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use bizcard_core::CoreError;
use bizcard_types::api::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or invalid bearer token")]
    Unauthorized,

    #[error(transparent)]
    Core(#[from] CoreError),
}

// Malformed bodies and path segments get the same JSON shape as core validation.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Core(err) => match err {
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
                CoreError::Permission => (StatusCode::FORBIDDEN, "permission"),
                CoreError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
                CoreError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
                CoreError::Transient(_) => (StatusCode::SERVICE_UNAVAILABLE, "transient"),
                CoreError::ReorderIncomplete { .. } => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "reorder_incomplete")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        let message = match &self {
            // Backend detail stays in the logs.
            ApiError::Core(CoreError::Transient(detail)) => {
                error!("Directory unavailable: {}", detail);
                "service temporarily unavailable, please retry".to_string()
            }
            other => {
                if status.is_server_error() {
                    error!("{}", other);
                }
                other.to_string()
            }
        };

        let mut response = (
            status,
            Json(ErrorBody {
                error: kind.to_string(),
                message,
            }),
        )
            .into_response();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}
