//! In-memory move table.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ledgerlock_shared::types::{CompanyId, MoveId};

use crate::company::CompanyStore;

use super::types::{Move, MoveState};

/// Move table, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MoveStore {
    moves: BTreeMap<MoveId, Move>,
}

impl MoveStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a move.
    pub fn insert(&mut self, mv: Move) {
        self.moves.insert(mv.id, mv);
    }

    /// Returns the move with `id`.
    #[must_use]
    pub fn get(&self, id: MoveId) -> Option<&Move> {
        self.moves.get(&id)
    }

    /// Returns a mutable reference to the move with `id`.
    pub fn get_mut(&mut self, id: MoveId) -> Option<&mut Move> {
        self.moves.get_mut(&id)
    }

    /// Counts draft moves dated on or before `date` in the subtree rooted at
    /// `company_id`.
    ///
    /// Used as the precondition for hard-lock writes: a period cannot be
    /// hard-locked while draft entries remain inside it.
    #[must_use]
    pub fn count_drafts_on_or_before(
        &self,
        companies: &CompanyStore,
        company_id: CompanyId,
        date: NaiveDate,
    ) -> usize {
        self.moves
            .values()
            .filter(|mv| mv.state == MoveState::Draft)
            .filter(|mv| mv.accounting_date <= date)
            .filter(|mv| companies.is_in_subtree_of(mv.company_id, company_id))
            .count()
    }

    /// Iterates over all moves.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.values()
    }
}
