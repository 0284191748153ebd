//! Injectable time source.
//!
//! Lock evaluation depends on "now" (exception expiry) and "today"
//! (date suggestions). Both come from a [`Calendar`] so tests can pin time
//! instead of reading the wall clock.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current instant and the current date.
pub trait Calendar: std::fmt::Debug + Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Calendar backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Calendar pinned to a settable instant.
///
/// Cloning yields a handle onto the same instant, so a test can keep one
/// handle while the ledger owns another and advance time between assertions.
#[derive(Debug, Clone)]
pub struct FixedCalendar {
    instant: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedCalendar {
    /// Creates a calendar pinned to `instant`.
    #[must_use]
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    /// Re-pins the calendar to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        *self
            .instant
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = instant;
    }

    /// Advances the pinned instant by `duration`.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self
            .instant
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard += duration;
    }
}

impl Calendar for FixedCalendar {
    fn now(&self) -> DateTime<Utc> {
        *self
            .instant
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
