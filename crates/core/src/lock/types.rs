//! Lock kinds and the per-company lock date table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of lock date carried by a company.
///
/// The four soft kinds may be relieved by exceptions; the hard kind is
/// absolute and admits none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockKind {
    /// Freezes all entries up to and including the date.
    Fiscalyear,
    /// Freezes all entries with tax implications.
    Tax,
    /// Freezes customer-facing entries.
    Sale,
    /// Freezes vendor-facing entries.
    Purchase,
    /// Irreversible lock; no exceptions, never decreases.
    Hard,
}

/// The soft lock kinds, in the order they are reported.
pub const SOFT_LOCK_KINDS: [LockKind; 4] = [
    LockKind::Fiscalyear,
    LockKind::Tax,
    LockKind::Sale,
    LockKind::Purchase,
];

/// Every lock kind, soft kinds first.
pub const LOCK_KINDS: [LockKind; 5] = [
    LockKind::Fiscalyear,
    LockKind::Tax,
    LockKind::Sale,
    LockKind::Purchase,
    LockKind::Hard,
];

impl LockKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fiscalyear => "fiscalyear",
            Self::Tax => "tax",
            Self::Sale => "sale",
            Self::Purchase => "purchase",
            Self::Hard => "hard",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fiscalyear" => Some(Self::Fiscalyear),
            "tax" => Some(Self::Tax),
            "sale" => Some(Self::Sale),
            "purchase" => Some(Self::Purchase),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Human-readable label used in error messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fiscalyear => "Global Lock Date",
            Self::Tax => "Tax Return Lock Date",
            Self::Sale => "Sales Lock Date",
            Self::Purchase => "Purchase Lock Date",
            Self::Hard => "Hard Lock Date",
        }
    }

    /// Returns true if exceptions may relieve this kind.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        !matches!(self, Self::Hard)
    }
}

impl fmt::Display for LockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-company lock date table, one optional date per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockDates {
    /// Global (fiscal year) lock date.
    pub fiscalyear: Option<NaiveDate>,
    /// Tax return lock date.
    pub tax: Option<NaiveDate>,
    /// Sales lock date.
    pub sale: Option<NaiveDate>,
    /// Purchase lock date.
    pub purchase: Option<NaiveDate>,
    /// Hard lock date.
    pub hard: Option<NaiveDate>,
}

impl LockDates {
    /// Returns the lock date for `kind`.
    #[must_use]
    pub fn get(&self, kind: LockKind) -> Option<NaiveDate> {
        match kind {
            LockKind::Fiscalyear => self.fiscalyear,
            LockKind::Tax => self.tax,
            LockKind::Sale => self.sale,
            LockKind::Purchase => self.purchase,
            LockKind::Hard => self.hard,
        }
    }

    /// Sets the lock date for `kind`.
    ///
    /// Validation (hard-lock monotonicity, cascades) is the caller's job;
    /// this is plain storage.
    pub fn set(&mut self, kind: LockKind, date: Option<NaiveDate>) {
        match kind {
            LockKind::Fiscalyear => self.fiscalyear = date,
            LockKind::Tax => self.tax = date,
            LockKind::Sale => self.sale = date,
            LockKind::Purchase => self.purchase = date,
            LockKind::Hard => self.hard = date,
        }
    }

    /// Returns true if `date` falls on or before the lock date for `kind`.
    #[must_use]
    pub fn covers(&self, kind: LockKind, date: NaiveDate) -> bool {
        self.get(kind).is_some_and(|lock| date <= lock)
    }
}
