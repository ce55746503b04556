//! Persistence backends for the course catalog.
//!
//! # Responsibility
//! - Define the store contract the persistence context depends on.
//! - Provide in-memory and SQLite implementations of that contract.
//!
//! # Invariants
//! - `commit` applies a whole change set or nothing.
//! - Author listings follow commit order on every backend.
//! - Constraint failures surface as the same [`ConstraintViolation`] on every
//!   backend.

use crate::db::DbError;
use crate::model::author::{Author, AuthorId};
use crate::model::country::Country;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::{MemoryDatabase, MemoryStore};
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Constraint a commit violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// A row references a parent key that does not exist.
    ForeignKey { table: &'static str },
    /// A row reuses an existing primary/unique key.
    DuplicateKey { table: &'static str },
}

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForeignKey { table } => write!(f, "foreign key constraint failed on `{table}`"),
            Self::DuplicateKey { table } => write!(f, "duplicate key in `{table}`"),
        }
    }
}

/// Store-level failures.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Commit rejected by a schema constraint.
    Constraint(ConstraintViolation),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a model.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Constraint(violation) => write!(f, "{violation}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "catalog store requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Window over the ordered author listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorListQuery {
    /// Maximum rows to return; `None` returns everything after `offset`.
    pub limit: Option<u32>,
    /// Rows to skip from the start of the ordering.
    pub offset: u64,
}

/// Rows staged for one atomic commit, in staging order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub countries: Vec<Country>,
    pub authors: Vec<Author>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() && self.authors.is_empty()
    }

    /// Total staged rows.
    pub fn len(&self) -> usize {
        self.countries.len() + self.authors.len()
    }

    pub fn clear(&mut self) {
        self.countries.clear();
        self.authors.clear();
    }
}

/// Storage contract a persistence context runs against.
///
/// Implementations borrow a handle owned elsewhere, so all methods take
/// `&self`.
pub trait CatalogStore {
    /// Short backend label for diagnostics.
    fn backend(&self) -> &'static str;
    /// Lists countries ordered by `id`.
    fn list_countries(&self) -> StoreResult<Vec<Country>>;
    fn find_country(&self, id: &str) -> StoreResult<Option<Country>>;
    /// Lists authors in commit order within the query window.
    fn list_authors(&self, query: &AuthorListQuery) -> StoreResult<Vec<Author>>;
    fn find_author(&self, id: AuthorId) -> StoreResult<Option<Author>>;
    fn count_authors(&self) -> StoreResult<u64>;
    /// Writes countries then authors in one atomic unit.
    fn commit(&self, changes: &ChangeSet) -> StoreResult<()>;
}
