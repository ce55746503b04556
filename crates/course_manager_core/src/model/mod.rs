//! Catalog domain model.
//!
//! # Responsibility
//! - Define the `Country` and `Author` records shared by every backend.
//! - Keep field-level validation next to the data it guards.
//!
//! # Invariants
//! - Every author references a country by `country_id`.
//! - Models carry no storage details (no sequence numbers, no SQL types).

pub mod author;
pub mod country;
