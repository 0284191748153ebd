//! Company records and the parent/branch hierarchy.

use chrono::NaiveDate;
use ledgerlock_shared::types::CompanyId;
use serde::{Deserialize, Serialize};

use crate::lock::{LockDates, LockKind};

/// A company holding lock dates.
///
/// Companies form a tree through `parent_id`; a company with a parent is a
/// branch. A parent's locks constrain the branches' moves, never the other
/// way around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier.
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// Parent company, if this company is a branch.
    pub parent_id: Option<CompanyId>,
    /// Lock dates per kind.
    pub lock_dates: LockDates,
}

impl Company {
    /// Creates a root company with no locks set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CompanyId::new(),
            name: name.into(),
            parent_id: None,
            lock_dates: LockDates::default(),
        }
    }

    /// Creates a branch of `parent`.
    #[must_use]
    pub fn branch_of(parent: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id: CompanyId::new(),
            name: name.into(),
            parent_id: Some(parent),
            lock_dates: LockDates::default(),
        }
    }

    /// Returns the lock date for `kind`.
    #[must_use]
    pub fn lock_date(&self, kind: LockKind) -> Option<NaiveDate> {
        self.lock_dates.get(kind)
    }

    /// Returns true if this company has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
