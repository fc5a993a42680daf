//! Error types for Roster Core.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message shared by unknown routes and rejected credentials, so the two
/// produce byte-identical responses.
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

/// Unified error type for Roster Core operations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Constraint violation: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RosterError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        RosterError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// The opaque 404 used for unknown routes and failed authentication.
    pub fn resource_not_found() -> Self {
        RosterError::NotFound(RESOURCE_NOT_FOUND.to_string())
    }
}

impl From<sqlx::Error> for RosterError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_foreign_key_violation() {
                return RosterError::Conflict(db.message().to_string());
            }
        }
        RosterError::Database(e)
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            RosterError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            RosterError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                message.clone(),
                Some(field.clone()),
            ),
            RosterError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "CONSTRAINT_VIOLATION",
                msg.clone(),
                None,
            ),
            RosterError::Database(e) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            RosterError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for Roster operations.
pub type RosterResult<T> = Result<T, RosterError>;
