//! Maps document kinds to the lock kinds that gate them.

use crate::moves::MoveKind;

use super::types::LockKind;

const SALE_GATED: [LockKind; 4] = [
    LockKind::Fiscalyear,
    LockKind::Tax,
    LockKind::Sale,
    LockKind::Hard,
];

const PURCHASE_GATED: [LockKind; 4] = [
    LockKind::Fiscalyear,
    LockKind::Tax,
    LockKind::Purchase,
    LockKind::Hard,
];

const MISC_GATED: [LockKind; 3] = [LockKind::Fiscalyear, LockKind::Tax, LockKind::Hard];

/// Returns the lock kinds gating a move of the given document kind.
///
/// Tax and fiscal year apply to all bookkeeping; sale and purchase segregate
/// authority between AR and AP operations. The hard lock gates every move.
#[must_use]
pub fn gated_kinds(kind: MoveKind) -> &'static [LockKind] {
    if kind.is_sale_document() {
        &SALE_GATED
    } else if kind.is_purchase_document() {
        &PURCHASE_GATED
    } else {
        &MISC_GATED
    }
}
