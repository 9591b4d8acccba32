//! Errors surfaced by services to their HTTP shells.

use crate::repository::RepositoryError;
use thiserror::Error;

/// Service-level failures.
///
/// Each variant maps onto exactly one HTTP status in `microshop-web`:
/// `Validation` → 400, `NotFound` → 404, `Persistence` → 500.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request payload is malformed or misses required fields.
    #[error("{0}")]
    Validation(String),

    /// The referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity name, e.g. `"user"`.
        entity: &'static str,
        /// The identifier that was looked up.
        id: i64,
    },

    /// The store is unavailable or rejected the write.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl ServiceError {
    /// Shorthand for a [`ServiceError::NotFound`].
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepositoryError::Database(message) => Self::Persistence(message),
        }
    }
}
