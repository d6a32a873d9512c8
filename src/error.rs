use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid URL. Include http:// or https:// prefix.")]
    InvalidUrl,
    #[error("Invalid custom alias. Use 3-64 characters: letters, numbers, - or _.")]
    InvalidAlias,
    #[error("Custom alias already in use")]
    AliasConflict,
    #[error("Could not generate a unique short id. Try again.")]
    GenerationExhausted,
    #[error("Not found")]
    NotFound,
    #[error("Invalid short id or URL")]
    InvalidInput,
    #[error("Admin token not configured")]
    AdminNotConfigured,
    #[error("Unauthorized")]
    Unauthorized,
    /// Store failures surface a generic message; detail stays in the server log
    #[error("Database error")]
    Store(#[source] anyhow::Error),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidUrl | ServiceError::InvalidAlias | ServiceError::InvalidInput => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::AliasConflict => StatusCode::CONFLICT,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::AdminNotConfigured => StatusCode::FORBIDDEN,
            ServiceError::GenerationExhausted | ServiceError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict => ServiceError::AliasConflict,
            StorageError::Other(err) => ServiceError::Store(err),
        }
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        ServiceError::Store(err)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let ServiceError::Store(ref err) = self {
            tracing::error!(error = %err, "storage failure");
        }
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
