//! Country domain model.
//!
//! # Responsibility
//! - Define the lookup record authors point to through `country_id`.
//! - Validate country codes before they reach any store.
//!
//! # Invariants
//! - `id` is an uppercase 2-3 letter code and never changes once stored.
//! - `description` is non-blank.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Country code used as the `countries` primary key.
pub type CountryId = String;

/// Country assigned to authors added without one.
pub const DEFAULT_COUNTRY_ID: &str = "BE";

/// Maximum description length in characters.
pub const MAX_COUNTRY_DESCRIPTION_CHARS: usize = 250;

static COUNTRY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,3}$").expect("valid country code regex"));

/// Lookup record for an author's country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Short code, e.g. `BE`.
    pub id: CountryId,
    /// Human-readable name.
    pub description: String,
}

/// Validation failures for [`Country`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountryValidationError {
    /// Code is not 2-3 uppercase ASCII letters.
    InvalidCode(String),
    /// Description is empty or whitespace.
    EmptyDescription,
    /// Description exceeds [`MAX_COUNTRY_DESCRIPTION_CHARS`].
    DescriptionTooLong { max_chars: usize },
}

impl Display for CountryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCode(code) => {
                write!(f, "country code `{code}` must be 2-3 uppercase letters")
            }
            Self::EmptyDescription => write!(f, "country description cannot be empty"),
            Self::DescriptionTooLong { max_chars } => {
                write!(f, "country description exceeds {max_chars} characters")
            }
        }
    }
}

impl Error for CountryValidationError {}

impl Country {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }

    /// Checks code format and description presence.
    pub fn validate(&self) -> Result<(), CountryValidationError> {
        if !is_valid_country_code(&self.id) {
            return Err(CountryValidationError::InvalidCode(self.id.clone()));
        }
        if self.description.trim().is_empty() {
            return Err(CountryValidationError::EmptyDescription);
        }
        if self.description.chars().count() > MAX_COUNTRY_DESCRIPTION_CHARS {
            return Err(CountryValidationError::DescriptionTooLong {
                max_chars: MAX_COUNTRY_DESCRIPTION_CHARS,
            });
        }
        Ok(())
    }
}

/// Returns whether `code` has the shape of a stored country key.
pub fn is_valid_country_code(code: &str) -> bool {
    COUNTRY_CODE_RE.is_match(code)
}
