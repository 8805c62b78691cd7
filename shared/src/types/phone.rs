//! Canonical phone numbers
//!
//! The canonical form is the 11-digit national format with a leading zero.
//! Together with the fuzzy-matched name it is the dedup key for members.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{SharedError, SharedResult};

const CANONICAL_LEN: usize = 11;
const COUNTRY_CODE: &str = "234";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    /// Normalize a raw phone entry into canonical form
    ///
    /// Non-digits are stripped first. A 13-digit number carrying the country
    /// code becomes `0` + the remaining ten digits; a bare 10-digit number
    /// gets a leading `0`. Anything that does not end up as exactly eleven
    /// digits starting with `0` is rejected.
    pub fn parse(raw: &str) -> SharedResult<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        let canonical = if digits.starts_with('0') {
            digits
        } else if digits.len() == 13 && digits.starts_with(COUNTRY_CODE) {
            format!("0{}", &digits[COUNTRY_CODE.len()..])
        } else if digits.len() == 10 {
            format!("0{digits}")
        } else {
            digits
        };

        if canonical.len() == CANONICAL_LEN && canonical.starts_with('0') {
            Ok(Self(canonical))
        } else {
            Err(SharedError::InvalidPhone { input: raw.to_string() })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Comparison key for a stored phone cell
    ///
    /// Rows written before normalization may hold phones that no longer
    /// parse; those compare by their trimmed text. Blank cells have no key.
    pub fn key(raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(
            Self::parse(trimmed)
                .map(String::from)
                .unwrap_or_else(|_| trimmed.to_string()),
        )
    }
}

impl FromStr for CanonicalPhone {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CanonicalPhone {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CanonicalPhone> for String {
    fn from(phone: CanonicalPhone) -> Self {
        phone.0
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
