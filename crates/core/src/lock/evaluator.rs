//! Lock authorization evaluation.
//!
//! Every function here is a pure read over store snapshots: the decision for
//! a move is a function of (move, user, now, lock tables, exception table)
//! and nothing else. Mutations live on the ledger aggregate.

use chrono::{DateTime, Days, NaiveDate, Utc};
use ledgerlock_shared::types::{CompanyId, UserId};

use crate::company::CompanyStore;
use crate::exception::ExceptionStore;
use crate::moves::{Move, MoveKind};

use super::classifier::gated_kinds;
use super::error::LockError;
use super::types::LockKind;

/// One lock blocking a move: the date, kind, and company it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockDateViolation {
    /// The blocking lock date.
    pub lock_date: NaiveDate,
    /// The violated lock kind.
    pub kind: LockKind,
    /// The company carrying the lock.
    pub company_id: CompanyId,
}

/// Decides whether `user` may modify `mv` at instant `now`.
///
/// Walks the company ancestor chain from the move's company to the root and
/// checks every gating lock kind at every level. A hard lock covering the
/// accounting date denies immediately; a covering soft lock denies unless an
/// in-force exception at that level relieves the date for this user. The
/// returned `Locked` error names the first blocking (kind, company) found.
pub fn may_modify(
    companies: &CompanyStore,
    exceptions: &ExceptionStore,
    mv: &Move,
    user: UserId,
    now: DateTime<Utc>,
) -> Result<(), LockError> {
    for company in companies.ancestors(mv.company_id) {
        for &kind in gated_kinds(mv.kind) {
            let Some(lock_date) = company.lock_date(kind) else {
                continue;
            };
            if mv.accounting_date > lock_date {
                continue;
            }
            if kind == LockKind::Hard {
                return Err(LockError::Locked {
                    kind,
                    company_id: company.id,
                    lock_date,
                });
            }
            let relieved = exceptions
                .find_relieving(company.id, kind, user, now)
                .is_some_and(|e| e.relieves_date(mv.accounting_date));
            if !relieved {
                return Err(LockError::Locked {
                    kind,
                    company_id: company.id,
                    lock_date,
                });
            }
        }
    }
    Ok(())
}

/// The lock date in force for `user` on `(company_id, kind)`.
///
/// For a soft kind this is the maximum, over the ancestor chain, of each
/// ancestor's lock date, where an ancestor whose lock the user holds a
/// usable exception against contributes the exception's relaxed date
/// instead (a removed lock contributes nothing). For the hard kind
/// exceptions never apply. `ignore_exceptions` yields the raw chain
/// maximum.
#[must_use]
pub fn effective_lock_date(
    companies: &CompanyStore,
    exceptions: &ExceptionStore,
    company_id: CompanyId,
    user: UserId,
    kind: LockKind,
    now: DateTime<Utc>,
    ignore_exceptions: bool,
) -> Option<NaiveDate> {
    let mut effective: Option<NaiveDate> = None;
    for company in companies.ancestors(company_id) {
        let Some(lock_date) = company.lock_date(kind) else {
            continue;
        };
        let contribution = if ignore_exceptions || !kind.is_soft() {
            Some(lock_date)
        } else {
            match exceptions.find_relieving(company.id, kind, user, now) {
                // Only an exception that undercuts the current lock date
                // counts; a stale one (lock moved past its relaxed date the
                // other way) is ignored.
                Some(e) if e.relaxed_date.is_none_or(|r| r < lock_date) => e.relaxed_date,
                _ => Some(lock_date),
            }
        };
        effective = match (effective, contribution) {
            (current, None) => current,
            (None, next) => next,
            (Some(current), Some(next)) => Some(current.max(next)),
        };
    }
    effective
}

/// The fiscal lock date in force for `user` on moves of `move_kind`.
///
/// The maximum of the effective fiscal year and hard lock dates, plus the
/// sales or purchase lock for directional documents.
#[must_use]
pub fn fiscal_lock_date(
    companies: &CompanyStore,
    exceptions: &ExceptionStore,
    company_id: CompanyId,
    move_kind: MoveKind,
    user: UserId,
    now: DateTime<Utc>,
) -> Option<NaiveDate> {
    let mut kinds = vec![LockKind::Fiscalyear, LockKind::Hard];
    if move_kind.is_sale_document() {
        kinds.push(LockKind::Sale);
    } else if move_kind.is_purchase_document() {
        kinds.push(LockKind::Purchase);
    }
    kinds
        .into_iter()
        .filter_map(|kind| {
            effective_lock_date(companies, exceptions, company_id, user, kind, now, false)
        })
        .max()
}

/// Lists every lock blocking `mv` for `user` at `now`, exceptions applied,
/// ordered chronologically.
#[must_use]
pub fn lock_date_violations(
    companies: &CompanyStore,
    exceptions: &ExceptionStore,
    mv: &Move,
    user: UserId,
    now: DateTime<Utc>,
) -> Vec<LockDateViolation> {
    let mut violations = Vec::new();
    for company in companies.ancestors(mv.company_id) {
        for &kind in gated_kinds(mv.kind) {
            let Some(lock_date) = company.lock_date(kind) else {
                continue;
            };
            if mv.accounting_date > lock_date {
                continue;
            }
            let relieved = kind.is_soft()
                && exceptions
                    .find_relieving(company.id, kind, user, now)
                    .is_some_and(|e| e.relieves_date(mv.accounting_date));
            if !relieved {
                violations.push(LockDateViolation {
                    lock_date,
                    kind,
                    company_id: company.id,
                });
            }
        }
    }
    violations.sort_by_key(|v| (v.lock_date, v.kind.as_str()));
    violations
}

/// Formats violations for user-facing error text, e.g.
/// `"Tax Return Lock Date (2020-01-01), Hard Lock Date (2021-06-30)"`.
#[must_use]
pub fn format_violations(violations: &[LockDateViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({})", v.kind.label(), v.lock_date))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Suggests an accounting date for a move of `move_kind` at `company_id`.
///
/// Returns `desired` when no lock blocks it, otherwise the first day after
/// the latest violated lock date. Exceptions relieving `desired` also
/// relieve any later date, so the suggestion is always modifiable.
#[must_use]
pub fn suggested_accounting_date(
    companies: &CompanyStore,
    exceptions: &ExceptionStore,
    company_id: CompanyId,
    move_kind: MoveKind,
    user: UserId,
    desired: NaiveDate,
    now: DateTime<Utc>,
) -> NaiveDate {
    let probe = Move::draft(company_id, desired, move_kind);
    let violations = lock_date_violations(companies, exceptions, &probe, user, now);
    match violations.last() {
        None => desired,
        Some(latest) => latest
            .lock_date
            .checked_add_days(Days::new(1))
            .unwrap_or(latest.lock_date),
    }
}
