/// Error types for Social Graph Service
///
/// Every service operation returns [`Result`]. Handlers surface the error
/// directly; nothing is retried or recovered internally.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type for social-graph-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced user, post or group does not exist
    #[error("{0}")]
    NotFound(String),

    /// Caller is not the owner of the resource being mutated
    #[error("{0}")]
    Forbidden(String),

    /// Request input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unique resource already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn user_not_found() -> Self {
        AppError::NotFound("User not found".to_string())
    }

    pub fn post_not_found() -> Self {
        AppError::NotFound("Post not found".to_string())
    }

    pub fn group_not_found() -> Self {
        AppError::NotFound("Group not found".to_string())
    }

    pub fn unauthorized_action() -> Self {
        AppError::Forbidden("Unauthorized action".to_string())
    }

    /// Label used for the `outcome` dimension of operation metrics
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Forbidden(_) => "forbidden",
            AppError::Validation(_) => "invalid",
            AppError::Conflict(_) => "conflict",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Missing references are a client mistake, not a missing route
            AppError::NotFound(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = match self {
            // Do not leak driver messages to API clients
            AppError::Database(_) => "Database error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(msg) => AppError::Conflict(msg),
            RepositoryError::MissingReference(msg) => AppError::NotFound(msg),
            RepositoryError::StillReferenced(msg) => AppError::Conflict(msg),
            RepositoryError::OutOfRange(msg) => AppError::Conflict(msg),
            RepositoryError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let codes: Vec<&str> = errs.iter().map(|e| e.code.as_ref()).collect();
                format!("{} ({})", field, codes.join(", "))
            })
            .collect();
        AppError::Validation(format!("invalid fields: {}", fields.join("; ")))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_bad_request() {
        let err = AppError::post_not_found();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Post not found");
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let err = AppError::unauthorized_action();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.kind(), "forbidden");
    }

    #[test]
    fn test_repository_errors_convert() {
        let conflict: AppError = RepositoryError::UniqueViolation("username taken".into()).into();
        assert!(matches!(conflict, AppError::Conflict(_)));
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let missing: AppError = RepositoryError::MissingReference("Post not found".into()).into();
        assert!(matches!(missing, AppError::NotFound(_)));

        let referenced: AppError = RepositoryError::StillReferenced("Post has shares".into()).into();
        assert_eq!(referenced.status_code(), StatusCode::CONFLICT);

        let overflow: AppError = RepositoryError::OutOfRange("likes".into()).into();
        assert_eq!(overflow.status_code(), StatusCode::CONFLICT);
    }
}
