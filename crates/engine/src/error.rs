//! The module contains the error the engine can throw.
//!
//! Every variant maps to one [`ErrorKind`]:
//!
//! - [`InvalidInput`] malformed or out-of-range input, rejected before any write.
//! - [`PreconditionFailed`] a stock action found its source counter at zero.
//! - [`KeyNotFound`] the referenced row does not exist for the tenant.
//! - [`Conflict`] a concurrent write won the race; retry after re-reading.
//! - [`Unavailable`] the database could not be reached.
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`PreconditionFailed`]: EngineError::PreconditionFailed
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`Unavailable`]: EngineError::Unavailable
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    PreconditionFailed(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Database(DbErr),
}

/// Coarse classification of [`EngineError`], stable across messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    PreconditionFailed,
    NotFound,
    Conflict,
    Unavailable,
    Internal,
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::Validation,
            Self::PreconditionFailed(_) => ErrorKind::PreconditionFailed,
            Self::KeyNotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Database(_) => ErrorKind::Internal,
        }
    }
}

impl From<DbErr> for EngineError {
    fn from(value: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = value.sql_err() {
            return Self::Conflict(detail);
        }
        match value {
            DbErr::Conn(err) => Self::Unavailable(err.to_string()),
            DbErr::ConnectionAcquire(err) => Self::Unavailable(err.to_string()),
            other => Self::Database(other),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::PreconditionFailed(a), Self::PreconditionFailed(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Unavailable(a), Self::Unavailable(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn connection_errors_are_unavailable() {
        let err = EngineError::from(DbErr::Conn(RuntimeErr::Internal("refused".to_string())));
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err = EngineError::from(DbErr::Custom("boom".to_string()));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
