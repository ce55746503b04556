//! Core data access for the course catalog.
//! This crate owns the repository contract and both storage backends.

pub mod context;
pub mod db;
pub mod harness;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use context::{ContextOptions, CourseContext};
pub use harness::{ContextBuilder, InMemoryDbBuilder, SqliteDbBuilder};
pub use logging::{default_log_level, init_logging, logging_status, CapturedLogs, LogSink};
pub use model::author::{Author, AuthorId, AuthorValidationError, NewAuthor};
pub use model::country::{Country, CountryId, CountryValidationError, DEFAULT_COUNTRY_ID};
pub use repo::author_repo::{AuthorRepository, ContextAuthorRepository, RepoError, RepoResult};
pub use store::{
    AuthorListQuery, CatalogStore, ChangeSet, ConstraintViolation, MemoryDatabase, MemoryStore,
    SqliteStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
