//! In-memory exception table with the queries lock evaluation needs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ledgerlock_shared::types::{CompanyId, LockExceptionId, UserId};

use crate::company::Company;
use crate::lock::LockKind;

use super::error::ExceptionError;
use super::types::{ExceptionState, LockException, NewLockException};

/// Validates a new exception against the company it targets.
///
/// Cascade successors are not validated here: they replicate consent the
/// user already gave, possibly against a lock date that no longer satisfies
/// these rules.
pub fn validate_new_exception(
    company: &Company,
    input: &NewLockException,
    now: DateTime<Utc>,
) -> Result<(), ExceptionError> {
    if !input.kind.is_soft() {
        return Err(ExceptionError::HardKindNotAllowed);
    }
    if input.end_datetime <= now {
        return Err(ExceptionError::EndBeforeCreation {
            end_datetime: input.end_datetime,
        });
    }
    let Some(lock_date) = company.lock_date(input.kind) else {
        return Err(ExceptionError::NoLockToRelax { kind: input.kind });
    };
    if let Some(relaxed_date) = input.relaxed_date {
        if relaxed_date >= lock_date {
            return Err(ExceptionError::InsufficientRelaxation {
                relaxed_date,
                lock_date,
            });
        }
    }
    Ok(())
}

/// Exception table, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ExceptionStore {
    exceptions: BTreeMap<LockExceptionId, LockException>,
}

impl ExceptionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an exception.
    pub fn insert(&mut self, exception: LockException) {
        self.exceptions.insert(exception.id, exception);
    }

    /// Returns the exception with `id`.
    #[must_use]
    pub fn get(&self, id: LockExceptionId) -> Option<&LockException> {
        self.exceptions.get(&id)
    }

    /// Marks the exception `id` as revoked. Returns false if it is unknown.
    pub fn revoke(&mut self, id: LockExceptionId) -> bool {
        match self.exceptions.get_mut(&id) {
            Some(exception) => {
                exception.state = ExceptionState::Revoked;
                true
            }
            None => false,
        }
    }

    /// Ids of all active exceptions on `(company_id, kind)`, expired ones
    /// included.
    ///
    /// This is the set a lock-date change cascades over: expiry is a
    /// property of evaluation time, revocation is a recorded fact.
    #[must_use]
    pub fn active_ids_for(&self, company_id: CompanyId, kind: LockKind) -> Vec<LockExceptionId> {
        self.exceptions
            .values()
            .filter(|e| e.company_id == company_id && e.kind == kind)
            .filter(|e| e.state == ExceptionState::Active)
            .map(|e| e.id)
            .collect()
    }

    /// Iterates over exceptions on `(company_id, kind)`.
    pub fn for_company_kind(
        &self,
        company_id: CompanyId,
        kind: LockKind,
    ) -> impl Iterator<Item = &LockException> {
        self.exceptions
            .values()
            .filter(move |e| e.company_id == company_id && e.kind == kind)
    }

    /// Finds the most relaxed exception usable by `user` at `now` on
    /// `(company_id, kind)`.
    ///
    /// "Most relaxed" orders a missing relaxed date first, then earlier
    /// dates, mirroring how the lock date in force is minimized for the
    /// user. Sufficiency against a concrete accounting date is the
    /// evaluator's call.
    #[must_use]
    pub fn find_relieving(
        &self,
        company_id: CompanyId,
        kind: LockKind,
        user: UserId,
        now: DateTime<Utc>,
    ) -> Option<&LockException> {
        self.for_company_kind(company_id, kind)
            .filter(|e| e.is_in_force(now))
            .filter(|e| e.covers_user(user))
            .min_by_key(|e| e.relaxed_date)
    }

    /// Iterates over all exceptions.
    pub fn iter(&self) -> impl Iterator<Item = &LockException> {
        self.exceptions.values()
    }
}
