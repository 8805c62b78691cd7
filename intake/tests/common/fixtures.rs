//! Test fixtures for intake tests

use intake::{IntakeConfig, IntakeSubmission};
use shared::Record;

pub struct TestFixtures;

impl TestFixtures {
    pub const ADA_PHONE: &'static str = "08031234567";

    pub fn config() -> IntakeConfig {
        IntakeConfig::default()
    }

    pub fn submission(name: &str, phone: &str) -> IntakeSubmission {
        IntakeSubmission {
            name: name.to_string(),
            gender: "FEMALE".to_string(),
            age_range: "20-24".to_string(),
            phone: phone.to_string(),
        }
    }

    pub fn ada() -> IntakeSubmission {
        Self::submission("ada obi", Self::ADA_PHONE)
    }

    pub fn assigned(name: &str, phone: &str, family: &str) -> Record {
        Record {
            name: name.to_string(),
            gender: "MALE".to_string(),
            age_range: "25-29".to_string(),
            phone: phone.to_string(),
            family: family.to_string(),
            ..Default::default()
        }
    }

    pub fn pending(name: &str, phone: &str, submitted_at: &str) -> Record {
        Record {
            name: name.to_string(),
            gender: "FEMALE".to_string(),
            age_range: "20-24".to_string(),
            phone: phone.to_string(),
            timestamp: submitted_at.to_string(),
            ..Default::default()
        }
    }
}
