//! The ledger aggregate: stores, calendar, and the inbound operations.
//!
//! All mutations go through this type so the lifecycle hooks always run:
//! lock-date writes validate hard-lock rules and cascade over active
//! exceptions, exception creation snapshots the lock date it was granted
//! against. Every operation validates before it mutates; a rejected
//! operation leaves the stores untouched.

use chrono::NaiveDate;
use ledgerlock_shared::types::{CompanyId, LockExceptionId, MoveId, UserId};
use tracing::{debug, info};

use crate::calendar::{Calendar, SystemCalendar};
use crate::company::{Company, CompanyStore};
use crate::exception::{
    ExceptionState, ExceptionStore, LockException, NewLockException, validate_new_exception,
};
use crate::lock::evaluator::{
    LockDateViolation, effective_lock_date, lock_date_violations, may_modify,
    suggested_accounting_date,
};
use crate::lock::{LockError, LockKind};
use crate::moves::{Move, MoveKind, MoveState, MoveStore, validate_post, validate_reset_to_draft};

use super::error::LedgerError;

/// Companies, moves, and lock exceptions under one transactional unit.
#[derive(Debug)]
pub struct Ledger {
    calendar: Box<dyn Calendar>,
    companies: CompanyStore,
    moves: MoveStore,
    exceptions: ExceptionStore,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Creates an empty ledger on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_calendar(SystemCalendar)
    }

    /// Creates an empty ledger on the given calendar.
    #[must_use]
    pub fn with_calendar(calendar: impl Calendar + 'static) -> Self {
        Self {
            calendar: Box::new(calendar),
            companies: CompanyStore::new(),
            moves: MoveStore::new(),
            exceptions: ExceptionStore::new(),
        }
    }

    /// Read access to the company table.
    #[must_use]
    pub fn companies(&self) -> &CompanyStore {
        &self.companies
    }

    /// Read access to the move table.
    #[must_use]
    pub fn moves(&self) -> &MoveStore {
        &self.moves
    }

    /// Read access to the exception table.
    #[must_use]
    pub fn exceptions(&self) -> &ExceptionStore {
        &self.exceptions
    }

    // ========== Companies ==========

    /// Registers a company and returns its id.
    pub fn add_company(&mut self, company: Company) -> CompanyId {
        let id = company.id;
        self.companies.insert(company);
        id
    }

    /// Returns the company with `id`.
    pub fn company(&self, id: CompanyId) -> Result<&Company, LedgerError> {
        self.companies.get(id).ok_or(LedgerError::CompanyNotFound(id))
    }

    /// Writes the lock date for `kind` on `company_id`.
    ///
    /// Hard-lock writes must not retreat, must not clear, and must not cover
    /// draft entries anywhere in the company's subtree. A changed soft lock
    /// revokes every active exception on the same (company, kind) and
    /// recreates each with a refreshed snapshot, so the grantees keep the
    /// relief they consented to under the new lock date. The hard kind
    /// never cascades: it admits no exceptions.
    pub fn set_lock(
        &mut self,
        company_id: CompanyId,
        kind: LockKind,
        date: Option<NaiveDate>,
    ) -> Result<(), LedgerError> {
        let company = self
            .companies
            .get(company_id)
            .ok_or(LedgerError::CompanyNotFound(company_id))?;
        let old = company.lock_date(kind);

        if kind == LockKind::Hard {
            if let Some(current) = old {
                let Some(requested) = date else {
                    return Err(LockError::HardLockRemoved.into());
                };
                if requested < current {
                    return Err(LockError::HardLockDecreased { current, requested }.into());
                }
            }
            if let Some(lock_date) = date {
                let count =
                    self.moves
                        .count_drafts_on_or_before(&self.companies, company_id, lock_date);
                if count > 0 {
                    return Err(LockError::DraftEntriesBeforeHardLock { count, lock_date }.into());
                }
            }
        }

        let company = self
            .companies
            .get_mut(company_id)
            .ok_or(LedgerError::CompanyNotFound(company_id))?;
        company.lock_dates.set(kind, date);
        info!(company = %company_id, kind = %kind, ?old, new = ?date, "lock date written");

        if kind.is_soft() && old != date {
            self.cascade_exceptions(company_id, kind, date);
        }
        Ok(())
    }

    /// Revokes and recreates the active exceptions on `(company_id, kind)`
    /// after the lock date moved to `new_lock_date`.
    fn cascade_exceptions(
        &mut self,
        company_id: CompanyId,
        kind: LockKind,
        new_lock_date: Option<NaiveDate>,
    ) {
        let now = self.calendar.now();
        let ids = self.exceptions.active_ids_for(company_id, kind);
        if ids.is_empty() {
            return;
        }
        debug!(company = %company_id, kind = %kind, count = ids.len(), "recreating lock exceptions");
        for id in ids {
            let Some(original) = self.exceptions.get(id).cloned() else {
                continue;
            };
            self.exceptions.revoke(id);
            self.exceptions.insert(LockException {
                id: LockExceptionId::new(),
                company_id: original.company_id,
                user_id: original.user_id,
                kind: original.kind,
                relaxed_date: original.relaxed_date,
                end_datetime: original.end_datetime,
                state: ExceptionState::Active,
                lock_date_snapshot: new_lock_date,
                reason: original.reason,
                created_at: now,
            });
        }
    }

    // ========== Exceptions ==========

    /// Creates a lock exception, snapshotting the company's current lock
    /// date for its kind.
    pub fn create_exception(
        &mut self,
        input: NewLockException,
    ) -> Result<LockExceptionId, LedgerError> {
        let company = self
            .companies
            .get(input.company_id)
            .ok_or(LedgerError::CompanyNotFound(input.company_id))?;
        let now = self.calendar.now();
        validate_new_exception(company, &input, now)?;

        let exception = LockException {
            id: LockExceptionId::new(),
            company_id: input.company_id,
            user_id: input.user_id,
            kind: input.kind,
            relaxed_date: input.relaxed_date,
            end_datetime: input.end_datetime,
            state: ExceptionState::Active,
            lock_date_snapshot: company.lock_date(input.kind),
            reason: input.reason,
            created_at: now,
        };
        let id = exception.id;
        info!(
            exception = %id,
            company = %exception.company_id,
            kind = %exception.kind,
            user = ?exception.user_id,
            relaxed = ?exception.relaxed_date,
            "lock exception created"
        );
        self.exceptions.insert(exception);
        Ok(id)
    }

    /// Revokes the exception `id`. No successor is created.
    pub fn revoke_exception(&mut self, id: LockExceptionId) -> Result<(), LedgerError> {
        if !self.exceptions.revoke(id) {
            return Err(LedgerError::ExceptionNotFound(id));
        }
        info!(exception = %id, "lock exception revoked");
        Ok(())
    }

    /// Returns the exception with `id`.
    pub fn exception(&self, id: LockExceptionId) -> Result<&LockException, LedgerError> {
        self.exceptions.get(id).ok_or(LedgerError::ExceptionNotFound(id))
    }

    /// Returns the exceptions on `(company_id, kind)`, any state.
    #[must_use]
    pub fn exceptions_for(&self, company_id: CompanyId, kind: LockKind) -> Vec<&LockException> {
        self.exceptions.for_company_kind(company_id, kind).collect()
    }

    // ========== Moves ==========

    /// Admits a draft move after authorizing its accounting date for `user`.
    pub fn add_move(
        &mut self,
        company_id: CompanyId,
        accounting_date: NaiveDate,
        kind: MoveKind,
        user: UserId,
    ) -> Result<MoveId, LedgerError> {
        if !self.companies.contains(company_id) {
            return Err(LedgerError::CompanyNotFound(company_id));
        }
        let mv = Move::draft(company_id, accounting_date, kind);
        may_modify(
            &self.companies,
            &self.exceptions,
            &mv,
            user,
            self.calendar.now(),
        )?;
        let id = mv.id;
        self.moves.insert(mv);
        Ok(id)
    }

    /// Returns the move with `id`.
    pub fn get_move(&self, id: MoveId) -> Result<&Move, LedgerError> {
        self.moves.get(id).ok_or(LedgerError::MoveNotFound(id))
    }

    /// Posts a draft move.
    pub fn post_move(&mut self, id: MoveId, user: UserId) -> Result<(), LedgerError> {
        self.transition_move(id, user, MoveState::Posted)
    }

    /// Resets a posted move back to draft.
    pub fn reset_to_draft(&mut self, id: MoveId, user: UserId) -> Result<(), LedgerError> {
        self.transition_move(id, user, MoveState::Draft)
    }

    fn transition_move(
        &mut self,
        id: MoveId,
        user: UserId,
        target: MoveState,
    ) -> Result<(), LedgerError> {
        let mv = self.moves.get(id).ok_or(LedgerError::MoveNotFound(id))?;
        match target {
            MoveState::Posted => validate_post(mv.state)?,
            MoveState::Draft => validate_reset_to_draft(mv.state)?,
        }
        let now = self.calendar.now();
        if let Err(err) = may_modify(&self.companies, &self.exceptions, mv, user, now) {
            debug!(move_id = %id, user = %user, error = %err, "move modification denied");
            return Err(err.into());
        }
        let mv = self.moves.get_mut(id).ok_or(LedgerError::MoveNotFound(id))?;
        mv.state = target;
        info!(move_id = %id, user = %user, state = %target, "move transitioned");
        Ok(())
    }

    // ========== Queries ==========

    /// Decides whether `user` may currently modify the move `id`.
    pub fn may_modify_move(&self, id: MoveId, user: UserId) -> Result<(), LedgerError> {
        let mv = self.moves.get(id).ok_or(LedgerError::MoveNotFound(id))?;
        may_modify(
            &self.companies,
            &self.exceptions,
            mv,
            user,
            self.calendar.now(),
        )
        .map_err(Into::into)
    }

    /// The lock date in force for `user` on `(company_id, kind)`.
    #[must_use]
    pub fn effective_lock_date(
        &self,
        company_id: CompanyId,
        user: UserId,
        kind: LockKind,
        ignore_exceptions: bool,
    ) -> Option<NaiveDate> {
        effective_lock_date(
            &self.companies,
            &self.exceptions,
            company_id,
            user,
            kind,
            self.calendar.now(),
            ignore_exceptions,
        )
    }

    /// Every lock blocking the move `id` for `user`, chronologically.
    pub fn lock_date_violations(
        &self,
        id: MoveId,
        user: UserId,
    ) -> Result<Vec<LockDateViolation>, LedgerError> {
        let mv = self.moves.get(id).ok_or(LedgerError::MoveNotFound(id))?;
        Ok(lock_date_violations(
            &self.companies,
            &self.exceptions,
            mv,
            user,
            self.calendar.now(),
        ))
    }

    /// Suggests an accounting date at `company_id` for a move of
    /// `move_kind`: `desired` when unblocked, else the first allowed day.
    #[must_use]
    pub fn suggested_accounting_date(
        &self,
        company_id: CompanyId,
        move_kind: MoveKind,
        user: UserId,
        desired: NaiveDate,
    ) -> NaiveDate {
        suggested_accounting_date(
            &self.companies,
            &self.exceptions,
            company_id,
            move_kind,
            user,
            desired,
            self.calendar.now(),
        )
    }
}
