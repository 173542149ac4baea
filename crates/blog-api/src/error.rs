//! Error types for the REST API server.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the shape `{"message": ..., "detail": ...}`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use blog_core::{Resource, ServiceError};
use blog_types::ErrorResponse;
use tracing::{error, warn};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("{resource} not found: {detail}")]
    NotFound {
        /// Which kind of resource was missing.
        resource: Resource,
        /// Which one, in words.
        detail: String,
    },

    /// The request could not be understood (bad path id, malformed body,
    /// missing query parameter).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An internal error occurred. The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            Self::NotFound { resource, detail } => ErrorResponse {
                message: match resource {
                    Resource::Post => String::from("Post not found"),
                    Resource::Comment => String::from("Comment not found"),
                },
                detail: detail.clone(),
            },
            Self::BadRequest(detail) => ErrorResponse {
                message: String::from("Bad request"),
                detail: detail.clone(),
            },
            Self::Internal(_) => ErrorResponse {
                message: String::from("Internal server error"),
                detail: String::from("the request could not be completed"),
            },
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { resource, detail } => Self::NotFound { resource, detail },
            ServiceError::Store(source) => Self::Internal(source.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(detail) => error!(status = status.as_u16(), %detail, "Request failed"),
            Self::NotFound { .. } | Self::BadRequest(_) => {
                warn!(status = status.as_u16(), error = %self, "Request rejected");
            }
        }

        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use blog_core::StoreError;
    use blog_types::PostId;

    use super::*;

    #[test]
    fn service_not_found_maps_to_404() {
        let err = ApiError::from(ServiceError::post_not_found(PostId(3)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let body = err.body();
        assert_eq!(body.message, "Post not found");
        assert_eq!(body.detail, "no post with id 3");
    }

    #[test]
    fn store_failure_hides_its_detail() {
        let err = ApiError::from(ServiceError::Store(StoreError::message("connection reset")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.message, "Internal server error");
        assert!(!body.detail.contains("connection reset"));
    }
}
