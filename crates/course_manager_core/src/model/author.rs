//! Author domain model.
//!
//! # Responsibility
//! - Define the persisted author record and its staging input.
//! - Validate name fields before persistence.
//!
//! # Invariants
//! - A persisted `Author` always has a non-nil `id` and a non-empty
//!   `country_id`.
//! - `NewAuthor` leaves `id`/`country_id` optional; the repository resolves
//!   them before staging.

use crate::model::country::CountryId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable author identifier.
pub type AuthorId = Uuid;

/// Maximum first/last name length in characters.
pub const MAX_AUTHOR_NAME_CHARS: usize = 150;

/// Canonical author record as stored and read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub first_name: Option<String>,
    pub last_name: String,
    /// Foreign key into `countries.id`.
    pub country_id: CountryId,
}

/// Author input for repository `add_author`.
///
/// `None` for `id` or `country_id` means "unspecified".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAuthor {
    pub id: Option<AuthorId>,
    pub first_name: Option<String>,
    pub last_name: String,
    pub country_id: Option<CountryId>,
}

/// Validation failures for [`Author`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorValidationError {
    /// `last_name` is empty or whitespace.
    EmptyLastName,
    /// `country_id` is empty or whitespace.
    EmptyCountryId,
    /// A name field exceeds [`MAX_AUTHOR_NAME_CHARS`].
    NameTooLong {
        field: &'static str,
        max_chars: usize,
    },
}

impl Display for AuthorValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLastName => write!(f, "author last name cannot be empty"),
            Self::EmptyCountryId => write!(f, "author country id cannot be empty"),
            Self::NameTooLong { field, max_chars } => {
                write!(f, "author {field} exceeds {max_chars} characters")
            }
        }
    }
}

impl Error for AuthorValidationError {}

impl Author {
    /// Creates an author with a generated id.
    pub fn new(
        first_name: Option<&str>,
        last_name: impl Into<String>,
        country_id: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), first_name, last_name, country_id)
    }

    /// Creates an author with a caller-provided id.
    ///
    /// A nil id is replaced by a generated one when the author is staged.
    pub fn with_id(
        id: AuthorId,
        first_name: Option<&str>,
        last_name: impl Into<String>,
        country_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.map(str::to_string),
            last_name: last_name.into(),
            country_id: country_id.into(),
        }
    }

    /// Checks name and foreign-key field shape.
    ///
    /// Does not check that `country_id` exists; stores enforce that at commit.
    pub fn validate(&self) -> Result<(), AuthorValidationError> {
        if self.last_name.trim().is_empty() {
            return Err(AuthorValidationError::EmptyLastName);
        }
        if self.country_id.trim().is_empty() {
            return Err(AuthorValidationError::EmptyCountryId);
        }
        check_name_length("last_name", &self.last_name)?;
        if let Some(first_name) = self.first_name.as_deref() {
            check_name_length("first_name", first_name)?;
        }
        Ok(())
    }

    /// Returns `"first last"` or just the last name.
    pub fn display_name(&self) -> String {
        match self.first_name.as_deref() {
            Some(first) if !first.trim().is_empty() => format!("{first} {}", self.last_name),
            _ => self.last_name.clone(),
        }
    }
}

impl NewAuthor {
    pub fn new(last_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: AuthorId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_country(mut self, country_id: impl Into<String>) -> Self {
        self.country_id = Some(country_id.into());
        self
    }
}

fn check_name_length(field: &'static str, value: &str) -> Result<(), AuthorValidationError> {
    if value.chars().count() > MAX_AUTHOR_NAME_CHARS {
        return Err(AuthorValidationError::NameTooLong {
            field,
            max_chars: MAX_AUTHOR_NAME_CHARS,
        });
    }
    Ok(())
}
