//! In-memory catalog store.
//!
//! # Responsibility
//! - Hold catalog rows in process memory for the lifetime of one
//!   [`MemoryDatabase`].
//! - Enforce the same key and foreign-key constraints as the SQLite schema.
//!
//! # Invariants
//! - A commit works on a copy of the state and swaps it in only when every
//!   row was accepted.
//! - `authors` keeps commit order; that order is the listing order.

use super::{
    AuthorListQuery, CatalogStore, ChangeSet, ConstraintViolation, StoreError, StoreResult,
};
use crate::model::author::{Author, AuthorId};
use crate::model::country::Country;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    countries: BTreeMap<String, Country>,
    authors: Vec<Author>,
    author_ids: HashSet<AuthorId>,
}

impl MemoryState {
    fn apply(&mut self, changes: &ChangeSet) -> StoreResult<()> {
        for country in &changes.countries {
            if self.countries.contains_key(&country.id) {
                return Err(StoreError::Constraint(ConstraintViolation::DuplicateKey {
                    table: "countries",
                }));
            }
            self.countries.insert(country.id.clone(), country.clone());
        }

        for author in &changes.authors {
            if !self.author_ids.insert(author.id) {
                return Err(StoreError::Constraint(ConstraintViolation::DuplicateKey {
                    table: "authors",
                }));
            }
            if !self.countries.contains_key(&author.country_id) {
                return Err(StoreError::Constraint(ConstraintViolation::ForeignKey {
                    table: "authors",
                }));
            }
            self.authors.push(author.clone());
        }

        Ok(())
    }
}

/// Process-local catalog database identified by name.
///
/// Stores created from the same database share its rows.
#[derive(Debug)]
pub struct MemoryDatabase {
    name: String,
    state: RefCell<MemoryState>,
}

impl MemoryDatabase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RefCell::new(MemoryState::default()),
        }
    }

    /// Creates a database named `course-manager-<uuid>`.
    pub fn unique() -> Self {
        Self::new(format!("course-manager-{}", Uuid::new_v4()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> MemoryStore<'_> {
        MemoryStore { db: self }
    }
}

/// [`CatalogStore`] view over a borrowed [`MemoryDatabase`].
#[derive(Debug, Clone, Copy)]
pub struct MemoryStore<'db> {
    db: &'db MemoryDatabase,
}

impl MemoryStore<'_> {
    pub fn database_name(&self) -> &str {
        self.db.name()
    }
}

impl CatalogStore for MemoryStore<'_> {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn list_countries(&self) -> StoreResult<Vec<Country>> {
        Ok(self.db.state.borrow().countries.values().cloned().collect())
    }

    fn find_country(&self, id: &str) -> StoreResult<Option<Country>> {
        Ok(self.db.state.borrow().countries.get(id).cloned())
    }

    fn list_authors(&self, query: &AuthorListQuery) -> StoreResult<Vec<Author>> {
        let state = self.db.state.borrow();
        let skip = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let take = query.limit.map_or(usize::MAX, |limit| limit as usize);
        Ok(state.authors.iter().skip(skip).take(take).cloned().collect())
    }

    fn find_author(&self, id: AuthorId) -> StoreResult<Option<Author>> {
        Ok(self
            .db
            .state
            .borrow()
            .authors
            .iter()
            .find(|author| author.id == id)
            .cloned())
    }

    fn count_authors(&self) -> StoreResult<u64> {
        Ok(self.db.state.borrow().authors.len() as u64)
    }

    fn commit(&self, changes: &ChangeSet) -> StoreResult<()> {
        let mut next = self.db.state.borrow().clone();
        next.apply(changes)?;
        *self.db.state.borrow_mut() = next;
        Ok(())
    }
}
