// src/errors.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    // Persistence errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Auth errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid token")]
    InvalidToken,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    // Business logic errors
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable discriminator; 409 is shared by two kinds.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "internal_error",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Unauthorized(_) | AppError::InvalidToken => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Validation(_) => "validation_error",
            AppError::InvalidState(_) => "invalid_state",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = json!({
            "error": {
                "code": status.as_u16(),
                "kind": self.kind(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

/// Maps a Postgres unique violation to `Conflict`, anything else to `Database`.
pub fn unique_violation(err: sqlx::Error, message: impl Into<String>) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.into())
        }
        _ => AppError::Database(err),
    }
}

// Convenience alias
pub type AppResult<T> = Result<T, AppError>;
