//! Author repository contract and context-backed implementation.
//!
//! # Responsibility
//! - Provide paging, lookup and staging APIs over author data.
//! - Own argument guards and the default-country policy.
//!
//! # Invariants
//! - The nil id is rejected as invalid input, never reported as "not found".
//! - Authors added without a country get [`DEFAULT_COUNTRY_ID`].
//! - Pages are 1-based; pages past the end are empty, not errors.

use crate::context::CourseContext;
use crate::model::author::{Author, AuthorId, AuthorValidationError, NewAuthor};
use crate::model::country::DEFAULT_COUNTRY_ID;
use crate::store::{AuthorListQuery, CatalogStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for author queries and commands.
#[derive(Debug)]
pub enum RepoError {
    /// Caller passed a structurally invalid argument.
    InvalidArgument {
        argument: &'static str,
        reason: &'static str,
    },
    /// Resolved author record failed model validation.
    Validation(AuthorValidationError),
    /// Store rejected a read or commit.
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument { argument, reason } => {
                write!(f, "invalid argument `{argument}`: {reason}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidArgument { .. } => None,
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<AuthorValidationError> for RepoError {
    fn from(value: AuthorValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Repository interface for author data access.
pub trait AuthorRepository {
    /// Returns page `page_number` (1-based) of `page_size` authors.
    fn get_authors(&self, page_number: u32, page_size: u32) -> RepoResult<Vec<Author>>;
    /// Returns every author in insertion order.
    fn get_all_authors(&self) -> RepoResult<Vec<Author>>;
    /// Returns one author. `Ok(None)` means no such record.
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn author_exists(&self, id: AuthorId) -> RepoResult<bool>;
    /// Stages one author, applying id and country defaults.
    fn add_author(&mut self, author: NewAuthor) -> RepoResult<AuthorId>;
    /// Commits staged changes and returns the number of rows written.
    fn save_changes(&mut self) -> RepoResult<usize>;
}

/// Author repository over a borrowed [`CourseContext`].
pub struct ContextAuthorRepository<'ctx, S: CatalogStore> {
    context: &'ctx mut CourseContext<S>,
}

impl<'ctx, S: CatalogStore> ContextAuthorRepository<'ctx, S> {
    pub fn new(context: &'ctx mut CourseContext<S>) -> Self {
        Self { context }
    }
}

impl<S: CatalogStore> AuthorRepository for ContextAuthorRepository<'_, S> {
    fn get_authors(&self, page_number: u32, page_size: u32) -> RepoResult<Vec<Author>> {
        let query = page_query(page_number, page_size)?;
        Ok(self.context.authors(&query)?)
    }

    fn get_all_authors(&self) -> RepoResult<Vec<Author>> {
        Ok(self.context.authors(&AuthorListQuery::default())?)
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        ensure_not_nil(id)?;
        Ok(self.context.find_author(id)?)
    }

    fn author_exists(&self, id: AuthorId) -> RepoResult<bool> {
        Ok(self.get_author(id)?.is_some())
    }

    fn add_author(&mut self, author: NewAuthor) -> RepoResult<AuthorId> {
        let resolved = resolve_new_author(author);
        Ok(self.context.add_author(resolved)?)
    }

    fn save_changes(&mut self) -> RepoResult<usize> {
        Ok(self.context.save_changes()?)
    }
}

fn ensure_not_nil(id: AuthorId) -> RepoResult<()> {
    if id.is_nil() {
        return Err(RepoError::InvalidArgument {
            argument: "id",
            reason: "must not be the nil identifier",
        });
    }
    Ok(())
}

/// Converts a 1-based page request into an offset/limit window.
fn page_query(page_number: u32, page_size: u32) -> RepoResult<AuthorListQuery> {
    if page_number == 0 {
        return Err(RepoError::InvalidArgument {
            argument: "page_number",
            reason: "pages start at 1",
        });
    }
    if page_size == 0 {
        return Err(RepoError::InvalidArgument {
            argument: "page_size",
            reason: "must be at least 1",
        });
    }

    Ok(AuthorListQuery {
        limit: Some(page_size),
        offset: u64::from(page_number - 1) * u64::from(page_size),
    })
}

fn resolve_new_author(author: NewAuthor) -> Author {
    let id = author
        .id
        .filter(|id| !id.is_nil())
        .unwrap_or_else(Uuid::new_v4);
    let country_id = author
        .country_id
        .filter(|country_id| !country_id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_COUNTRY_ID.to_string());

    Author {
        id,
        first_name: author.first_name,
        last_name: author.last_name,
        country_id,
    }
}
