//! Unified error type for the medbay service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// The main error type for the service.
///
/// Covers configuration, database, validation, and upstream-model failures.
/// Implements `IntoResponse` so handlers can return `Result<_, ServiceError>`
/// directly.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or invalid configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database read or write failure.
    #[error("database error: {0}")]
    Database(String),

    /// Requested row does not exist (or is soft-deleted).
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Request validation failure.
    #[error("invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// Uniqueness or state conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Language-model call failure.
    #[error("language model error: {0}")]
    Llm(String),

    /// JSON encode/decode failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Prompt template failure.
    #[error("template error: {0}")]
    Template(String),

    /// Bugs and unexpected states.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Type alias for Results using ServiceError.
pub type Result<T> = std::result::Result<T, ServiceError>;

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Serialization(err.to_string())
    }
}

impl From<handlebars::RenderError> for ServiceError {
    fn from(err: handlebars::RenderError) -> Self {
        ServiceError::Template(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            ServiceError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ServiceError::Serialization(_) => (StatusCode::BAD_REQUEST, "serialization_error"),
            ServiceError::Llm(_) => (StatusCode::BAD_GATEWAY, "llm_error"),
            ServiceError::Config(_)
            | ServiceError::Database(_)
            | ServiceError::Template(_)
            | ServiceError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(serde_json::json!({
            "error": error_type,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl ServiceError {
    /// Determines if this error is a client error (4xx-equivalent).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::NotFound { .. }
                | ServiceError::InvalidInput { .. }
                | ServiceError::Conflict(_)
                | ServiceError::Serialization(_)
        )
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        ServiceError::Config(msg.into())
    }

    /// Creates a database error.
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        ServiceError::Database(msg.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ServiceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(msg: impl Into<String>) -> Self {
        ServiceError::Conflict(msg.into())
    }

    /// Creates a language-model error.
    #[must_use]
    pub fn llm(msg: impl Into<String>) -> Self {
        ServiceError::Llm(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        ServiceError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_implements_std_error() {
        let err = ServiceError::internal("test");
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<ServiceError>();
        assert_sync::<ServiceError>();
    }

    #[test]
    fn test_client_errors() {
        assert!(ServiceError::not_found("supply", "12").is_client_error());
        assert!(ServiceError::invalid_input("question", "missing").is_client_error());
        assert!(!ServiceError::database("connection refused").is_client_error());
        assert!(!ServiceError::llm("upstream stalled").is_client_error());
    }

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("supply", "42");
        assert_eq!(err.to_string(), "supply not found: 42");
    }

    #[test]
    fn test_result_alias() {
        fn returns_result() -> Result<i32> {
            Ok(7)
        }
        assert!(returns_result().is_ok());
    }
}
