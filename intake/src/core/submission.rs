//! Registration submissions and their normalization

use serde::{Deserialize, Serialize};
use shared::{title_case, AgeBracket, CanonicalPhone, Gender, Member};

use crate::error::{IntakeError, IntakeResult};

/// Timestamp format stamped on pending submissions
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A registration exactly as entered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSubmission {
    pub name: String,
    pub gender: String,
    pub age_range: String,
    pub phone: String,
}

impl IntakeSubmission {
    /// Validate and normalize into a pending member
    ///
    /// The name is title-cased, gender must be MALE or FEMALE, the age range
    /// must be one of `allowed_brackets` and the phone must reach canonical
    /// form. `timestamp` is recorded verbatim.
    pub fn normalize(&self, allowed_brackets: &[String], timestamp: String) -> IntakeResult<Member> {
        let name = title_case(&self.name);
        if name.is_empty() {
            return Err(IntakeError::invalid("name", "Full Name is required"));
        }
        if self.phone.trim().is_empty() {
            return Err(IntakeError::invalid("phone", "Phone Number is required"));
        }

        let gender: Gender = self.gender.parse()?;
        if gender == Gender::Unknown {
            return Err(IntakeError::invalid("gender", "Gender must be MALE or FEMALE"));
        }

        let age_range = self.age_range.trim();
        if !allowed_brackets.iter().any(|b| b == age_range) {
            return Err(IntakeError::invalid(
                "age_range",
                format!("Age range '{age_range}' is not one of {}", allowed_brackets.join(", ")),
            ));
        }

        Ok(Member {
            name,
            gender: Some(gender),
            age_bracket: Some(AgeBracket::parse(age_range)?),
            phone: Some(CanonicalPhone::parse(&self.phone)?),
            activity: None,
            timestamp: Some(timestamp),
            family: None,
        })
    }
}
