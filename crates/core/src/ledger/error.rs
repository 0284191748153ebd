//! Aggregate error type for ledger operations.

use ledgerlock_shared::types::{CompanyId, LockExceptionId, MoveId};
use thiserror::Error;

use crate::exception::ExceptionError;
use crate::lock::LockError;
use crate::moves::MoveError;

/// Errors raised by operations on the ledger aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A lock denied the operation or a lock-date write was invalid.
    #[error(transparent)]
    Lock(#[from] LockError),

    /// A lock exception was malformed at creation.
    #[error(transparent)]
    Exception(#[from] ExceptionError),

    /// A move lifecycle transition was invalid.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Company not found.
    #[error("Company not found: {0}")]
    CompanyNotFound(CompanyId),

    /// Move not found.
    #[error("Move not found: {0}")]
    MoveNotFound(MoveId),

    /// Lock exception not found.
    #[error("Lock exception not found: {0}")]
    ExceptionNotFound(LockExceptionId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Lock(e) => e.error_code(),
            Self::Exception(e) => e.error_code(),
            Self::Move(e) => e.error_code(),
            Self::CompanyNotFound(_) => "COMPANY_NOT_FOUND",
            Self::MoveNotFound(_) => "MOVE_NOT_FOUND",
            Self::ExceptionNotFound(_) => "EXCEPTION_NOT_FOUND",
        }
    }
}
