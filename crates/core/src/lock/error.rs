//! Lock error types for authorization and lock-date maintenance.

use chrono::NaiveDate;
use ledgerlock_shared::types::CompanyId;
use thiserror::Error;

use super::types::LockKind;

/// Errors raised by lock evaluation and lock-date writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// Modification denied by an unrelieved lock date.
    #[error(
        "You cannot add/modify entries prior to and inclusive of the {} ({lock_date}) of company {company_id}",
        .kind.label()
    )]
    Locked {
        /// The lock kind that blocks the modification.
        kind: LockKind,
        /// The company whose lock blocks the modification.
        company_id: CompanyId,
        /// The blocking lock date.
        lock_date: NaiveDate,
    },

    /// Attempt to clear a hard lock date that is already set.
    #[error("The Hard Lock Date cannot be removed")]
    HardLockRemoved,

    /// Attempt to move a hard lock date backwards.
    #[error(
        "A new Hard Lock Date must be posterior (or equal) to the previous one ({current}), got {requested}"
    )]
    HardLockDecreased {
        /// The hard lock date currently in force.
        current: NaiveDate,
        /// The rejected earlier date.
        requested: NaiveDate,
    },

    /// Draft entries remain in the period a hard lock would cover.
    #[error(
        "There are still {count} draft entries in the period you want to hard lock ({lock_date} and before). You should either post or delete them"
    )]
    DraftEntriesBeforeHardLock {
        /// Number of draft entries in the way.
        count: usize,
        /// The requested hard lock date.
        lock_date: NaiveDate,
    },
}

impl LockError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Locked { .. } => "LOCKED",
            Self::HardLockRemoved => "HARD_LOCK_REMOVED",
            Self::HardLockDecreased { .. } => "HARD_LOCK_DECREASED",
            Self::DraftEntriesBeforeHardLock { .. } => "DRAFT_ENTRIES_BEFORE_HARD_LOCK",
        }
    }

    /// Returns the blocking lock kind, for `Locked` errors.
    #[must_use]
    pub fn blocking_kind(&self) -> Option<LockKind> {
        match self {
            Self::Locked { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the blocking company, for `Locked` errors.
    #[must_use]
    pub fn blocking_company(&self) -> Option<CompanyId> {
        match self {
            Self::Locked { company_id, .. } => Some(*company_id),
            _ => None,
        }
    }
}
