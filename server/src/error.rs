//! # API Error Types
//!
//! `AppError` implements `axum::response::IntoResponse`. Every error body is
//! `{"message": ...}`. Storage failures pass the engine's text through
//! verbatim with a 500, so callers see exactly what the database said.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use todo_core::{MessageBody, ValidationError};

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Empty table, unknown id or unknown route (404).
    #[error("{0}")]
    NotFound(String),

    /// Body is not JSON or not sent as JSON (400).
    #[error("{0}")]
    BadRequest(String),

    /// Body is JSON but breaks the todo input schema (422).
    #[error("{0}")]
    Validation(String),

    /// Origin not on the allow-list (403).
    #[error("{0}")]
    Forbidden(String),

    /// Raw storage engine error (500).
    #[error("{0}")]
    Storage(String),

    /// Any other server-side failure (500).
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(MessageBody::new(self.to_string()))).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.message())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => Self::Validation(err.body_text()),
            other => Self::BadRequest(other.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    async fn response_parts(err: AppError) -> (StatusCode, MessageBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_renders_message() {
        let (status, body) = response_parts(AppError::NotFound("Todo not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Todo not found");
    }

    #[tokio::test]
    async fn storage_error_passes_text_through() {
        let err = AppError::from(StoreError::Backend("Column 'task' cannot be null".into()));
        let (status, body) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Column 'task' cannot be null");
    }

    #[tokio::test]
    async fn validation_error_is_422() {
        let (status, body) = response_parts(AppError::from(ValidationError::MissingTask)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.message, "task is required");
    }

    #[test]
    fn status_codes() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden("x".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
