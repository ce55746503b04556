//! Repository layer over the persistence context.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Enforce argument guards and default-value policy that stores do not.
//!
//! # Invariants
//! - Repositories depend on `CatalogStore`, never on a concrete backend.
//! - "Not found" is `Ok(None)`; malformed input is `RepoError::InvalidArgument`.

pub mod author_repo;
