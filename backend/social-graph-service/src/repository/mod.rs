mod memory_repository;
mod postgres_repository;
mod r#trait;

pub use memory_repository::InMemorySocialGraphRepository;
pub use postgres_repository::PostgresSocialGraphRepository;
pub use r#trait::{RepoResult, SocialGraphRepository};

use thiserror::Error;

/// Storage-level failures, translated into `AppError` by the service layer
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the write
    #[error("unique violation: {0}")]
    UniqueViolation(String),

    /// A referenced row vanished between lookup and write
    #[error("missing reference: {0}")]
    MissingReference(String),

    /// The row is still referenced and cannot be deleted
    #[error("still referenced: {0}")]
    StillReferenced(String),

    /// A counter would leave the INTEGER range
    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // SQLSTATE 23505 unique_violation, 23503 foreign_key_violation,
            // 22003 numeric_value_out_of_range
            match db_err.code().as_deref() {
                Some("23505") => {
                    return RepositoryError::UniqueViolation(
                        db_err.constraint().unwrap_or("unique constraint").to_string(),
                    )
                }
                Some("23503") => {
                    return RepositoryError::MissingReference(
                        "Referenced entity not found".to_string(),
                    )
                }
                Some("22003") => {
                    return RepositoryError::OutOfRange(db_err.message().to_string())
                }
                _ => {}
            }
        }
        RepositoryError::Database(err.to_string())
    }
}
