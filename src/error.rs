//! # error
//!
//! Centralised HTTP error type.
//!
//! Every handler returns `Result<_, AppError>`. Axum's `IntoResponse` impl
//! turns these into `{"error": "..."}` bodies so callers always get a
//! machine-readable response, even on failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing prompt, unreadable body, or parameters that failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Catch-all for unexpected failures.
    #[error("Error generating strategy: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::MissingPrompt | ServiceError::InvalidParameters => {
                AppError::BadRequest(err.to_string())
            }
            ServiceError::Internal(inner) => AppError::Internal(inner),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(err) => {
                error!(error = %err, "❌ Strategy generation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_internal_failure_is_500_with_single_prefix() {
        let err = AppError::from(ServiceError::Internal(anyhow!("boom")));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Error generating strategy: boom" }));
    }

    #[tokio::test]
    async fn test_user_errors_are_400() {
        let (status, body) = render(ServiceError::InvalidParameters.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Could not extract valid parameters from prompt");
    }
}
