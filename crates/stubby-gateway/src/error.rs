use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use stubby_core::{CreateError, LookupError, StorageError};
use thiserror::Error;
use tracing::error;

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Create(CreateError::InvalidUrl(_)) => (StatusCode::BAD_REQUEST, "invalid_url"),
            AppError::Create(CreateError::InvalidValidity(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_validity")
            }
            AppError::Create(CreateError::InvalidCodeFormat(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_code_format")
            }
            AppError::Create(CreateError::CodeTaken(_)) => (StatusCode::CONFLICT, "code_taken"),
            AppError::Create(CreateError::GenerationExhausted { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_exhausted")
            }
            AppError::Lookup(LookupError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Lookup(LookupError::Expired(_)) => (StatusCode::GONE, "expired"),
            AppError::Create(CreateError::Storage(_))
            | AppError::Lookup(LookupError::Storage(_))
            | AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: kind,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
