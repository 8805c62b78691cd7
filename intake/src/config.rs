//! Intake configuration
//!
//! Values come from a `.env` file (if present), then the process environment,
//! then CLI flags, later sources overriding earlier ones.
//!
//! ## Environment
//! - `FAMILY_STORE_DIR`: record store directory (default `./data`)
//! - `DUPLICATE_THRESHOLD`: fuzzy name threshold, 0-100 (default 85)
//! - `DUPLICATE_CONTAINMENT`: `true` to also match on name containment
//! - `AGE_BRACKETS`: comma separated list of accepted age ranges

use std::path::PathBuf;

use crate::error::{IntakeError, IntakeResult};

pub const DEFAULT_THRESHOLD: u8 = 85;

pub const DEFAULT_AGE_BRACKETS: &[&str] = &[
    "15-19", "20-24", "25-29", "30-34", "35-39", "40-44", "45-49", "50-54",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    pub store_dir: PathBuf,
    pub duplicate_threshold: u8,
    pub containment: bool,
    pub age_brackets: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("./data"),
            duplicate_threshold: DEFAULT_THRESHOLD,
            containment: false,
            age_brackets: DEFAULT_AGE_BRACKETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl IntakeConfig {
    /// Load from `.env` and the process environment
    pub fn from_env() -> IntakeResult<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> IntakeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("FAMILY_STORE_DIR") {
            config.store_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("DUPLICATE_THRESHOLD") {
            config.duplicate_threshold = parse_threshold(&raw)?;
        }
        if let Some(raw) = lookup("DUPLICATE_CONTAINMENT") {
            config.containment = parse_flag("DUPLICATE_CONTAINMENT", &raw)?;
        }
        if let Some(raw) = lookup("AGE_BRACKETS") {
            let brackets: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if brackets.is_empty() {
                return Err(IntakeError::config("AGE_BRACKETS lists no age ranges"));
            }
            config.age_brackets = brackets;
        }

        Ok(config)
    }
}

pub fn parse_threshold(raw: &str) -> IntakeResult<u8> {
    match raw.trim().parse::<u8>() {
        Ok(value) if value <= 100 => Ok(value),
        _ => Err(IntakeError::config(format!(
            "DUPLICATE_THRESHOLD must be an integer between 0 and 100, got '{raw}'"
        ))),
    }
}

fn parse_flag(key: &str, raw: &str) -> IntakeResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(IntakeError::config(format!("{key} must be true or false, got '{raw}'"))),
    }
}
