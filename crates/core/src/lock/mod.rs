//! Lock dates: kinds, classification, and authorization evaluation.
//!
//! This module implements the lock enforcement model:
//! - Lock kinds and the per-company lock date table
//! - Classification of moves to the lock kinds gating them
//! - The pure authorization evaluator and its derived queries
//! - Error types for denied modifications and lock-date writes

pub mod classifier;
pub mod error;
pub mod evaluator;
pub mod types;

#[cfg(test)]
mod evaluator_props;

pub use classifier::gated_kinds;
pub use error::LockError;
pub use evaluator::{
    LockDateViolation, effective_lock_date, fiscal_lock_date, format_violations,
    lock_date_violations, may_modify, suggested_accounting_date,
};
pub use types::{LOCK_KINDS, LockDates, LockKind, SOFT_LOCK_KINDS};
