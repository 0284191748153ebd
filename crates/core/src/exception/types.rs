//! Lock exception records.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerlock_shared::types::{CompanyId, LockExceptionId, UserId};
use serde::{Deserialize, Serialize};

use crate::lock::LockKind;

/// Lifecycle state of a lock exception.
///
/// `Active → Revoked` is terminal; a "recreated" exception is a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExceptionState {
    /// The exception can relieve locks until its end datetime.
    Active,
    /// The exception was revoked, explicitly or by a lock-date change.
    Revoked,
}

impl ExceptionState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Revoked => "revoked",
        }
    }
}

impl std::fmt::Display for ExceptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A time-boxed, optionally user-scoped relaxation of one soft lock kind at
/// one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockException {
    /// Unique identifier.
    pub id: LockExceptionId,
    /// Company whose lock is relaxed.
    pub company_id: CompanyId,
    /// Grantee; `None` makes the exception global.
    pub user_id: Option<UserId>,
    /// The soft lock kind being relaxed.
    pub kind: LockKind,
    /// The relaxed lock date; `None` removes the lock entirely for the
    /// grantee.
    pub relaxed_date: Option<NaiveDate>,
    /// Instant the exception stops applying.
    pub end_datetime: DateTime<Utc>,
    /// Lifecycle state.
    pub state: ExceptionState,
    /// The company's lock date for `kind` at creation time.
    pub lock_date_snapshot: Option<NaiveDate>,
    /// Why the exception was granted.
    pub reason: Option<String>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl LockException {
    /// Returns true while the exception is active and not past its end
    /// datetime.
    #[must_use]
    pub fn is_in_force(&self, now: DateTime<Utc>) -> bool {
        self.state == ExceptionState::Active && now <= self.end_datetime
    }

    /// Returns true if the exception applies to `user` (per-user grant or
    /// global).
    #[must_use]
    pub fn covers_user(&self, user: UserId) -> bool {
        self.user_id.is_none_or(|grantee| grantee == user)
    }

    /// Returns true if the exception relieves a block on a move dated
    /// `accounting_date`.
    ///
    /// The comparison is strict: an exception relaxing the lock exactly to
    /// the accounting date does not relieve it.
    #[must_use]
    pub fn relieves_date(&self, accounting_date: NaiveDate) -> bool {
        match self.relaxed_date {
            None => true,
            Some(relaxed) => relaxed < accounting_date,
        }
    }
}

/// Input for creating a lock exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLockException {
    /// Company whose lock is relaxed.
    pub company_id: CompanyId,
    /// Grantee; `None` makes the exception global.
    pub user_id: Option<UserId>,
    /// The soft lock kind being relaxed.
    pub kind: LockKind,
    /// The relaxed lock date; `None` removes the lock entirely.
    pub relaxed_date: Option<NaiveDate>,
    /// Instant the exception stops applying.
    pub end_datetime: DateTime<Utc>,
    /// Why the exception is requested.
    pub reason: Option<String>,
}
