//! In-memory company table with hierarchy queries.

use std::collections::{BTreeMap, HashSet};

use ledgerlock_shared::types::CompanyId;

use super::types::Company;

/// Company table, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct CompanyStore {
    companies: BTreeMap<CompanyId, Company>,
}

impl CompanyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a company.
    pub fn insert(&mut self, company: Company) {
        self.companies.insert(company.id, company);
    }

    /// Returns the company with `id`.
    #[must_use]
    pub fn get(&self, id: CompanyId) -> Option<&Company> {
        self.companies.get(&id)
    }

    /// Returns a mutable reference to the company with `id`.
    pub fn get_mut(&mut self, id: CompanyId) -> Option<&mut Company> {
        self.companies.get_mut(&id)
    }

    /// Returns true if the store holds `id`.
    #[must_use]
    pub fn contains(&self, id: CompanyId) -> bool {
        self.companies.contains_key(&id)
    }

    /// Walks the ancestor chain from `id` (inclusive) up to the root.
    ///
    /// The walk is iterative and stops on a missing parent or a cycle, so a
    /// malformed hierarchy cannot loop forever.
    #[must_use]
    pub fn ancestors(&self, id: CompanyId) -> Vec<&Company> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            let Some(company) = self.companies.get(&current) else {
                break;
            };
            chain.push(company);
            cursor = company.parent_id;
        }
        chain
    }

    /// Returns true if `ancestor` is `id` itself or one of its ancestors.
    #[must_use]
    pub fn is_in_subtree_of(&self, id: CompanyId, ancestor: CompanyId) -> bool {
        self.ancestors(id).iter().any(|c| c.id == ancestor)
    }

    /// Iterates over all companies.
    pub fn iter(&self) -> impl Iterator<Item = &Company> {
        self.companies.values()
    }
}
