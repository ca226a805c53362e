//! Repository error type.

use scholaris_core::billing::BillingError;
use scholaris_shared::AppError;
use sea_orm::{DbErr, SqlErr};

/// Errors returned by the billing repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A billing rule rejected the operation.
    #[error(transparent)]
    Billing(#[from] BillingError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Billing(err) => err.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Maps a failed insert of a numbered document, turning a unique-key
    /// violation into `DuplicateNumber`.
    pub(crate) fn on_insert(err: DbErr, number: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                Self::Billing(BillingError::DuplicateNumber(number.to_string()))
            }
            _ => Self::Database(err),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Billing(err) => err.into(),
            RepositoryError::Database(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Self::Conflict("Resource already exists".to_string())
                }
                _ => Self::Database(err.to_string()),
            },
        }
    }
}
