//! Exception validation errors.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::lock::LockKind;

/// Errors raised when a lock exception is malformed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExceptionError {
    /// Exceptions cannot target the hard lock.
    #[error("The Hard Lock Date is irreversible and does not allow any exception")]
    HardKindNotAllowed,

    /// The exception would already be expired when created.
    #[error("The exception must end in the future, got {end_datetime}")]
    EndBeforeCreation {
        /// The rejected end datetime.
        end_datetime: DateTime<Utc>,
    },

    /// The company has no lock date of this kind to relax.
    #[error("The company has no {} to make an exception for", .kind.label())]
    NoLockToRelax {
        /// The kind the exception targeted.
        kind: LockKind,
    },

    /// The relaxed date does not actually relax the current lock date.
    #[error(
        "The exception date {relaxed_date} must be anterior to the current lock date {lock_date}"
    )]
    InsufficientRelaxation {
        /// The rejected relaxed date.
        relaxed_date: NaiveDate,
        /// The company's current lock date for the kind.
        lock_date: NaiveDate,
    },
}

impl ExceptionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::HardKindNotAllowed => "HARD_KIND_NOT_ALLOWED",
            Self::EndBeforeCreation { .. } => "END_BEFORE_CREATION",
            Self::NoLockToRelax { .. } => "NO_LOCK_TO_RELAX",
            Self::InsufficientRelaxation { .. } => "INSUFFICIENT_RELAXATION",
        }
    }
}
