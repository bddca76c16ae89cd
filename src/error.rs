use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Column protected by a uniqueness constraint on `links`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    ShortCode,
    TargetUrl,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::ShortCode => f.write_str("short_code"),
            UniqueField::TargetUrl => f.write_str("target_url"),
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Short link not found: {0}")]
    LinkNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Raised by a store when an insert violates a unique column. Services
    /// recover from it; it never reaches a client.
    #[error("Uniqueness conflict on {0}")]
    UniquenessConflict(UniqueField),

    #[error("Click failed fraud validation: {0}")]
    ValidationFailed(String),

    #[error("Short code generation failed")]
    ShortCodeGenerationFailed,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment variable missing: {0}")]
    MissingEnvVar(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, error_code) = match &self {
            AppError::LinkNotFound(_) => (StatusCode::NOT_FOUND, self.to_string(), "NOT_FOUND"),
            AppError::InvalidUrl(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                self.to_string(),
                "INVALID_URL",
            ),
            AppError::ValidationFailed(_) => {
                (StatusCode::FORBIDDEN, self.to_string(), "VALIDATION_FAILED")
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    "DATABASE_ERROR",
                )
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Migration error occurred".to_string(),
                    "MIGRATION_ERROR",
                )
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = json!({
            "error": error_code,
            "message": error_message,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;
