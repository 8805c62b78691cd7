//! Allocator configuration
//!
//! Values come from a `.env` file (if present), then the process environment,
//! then CLI flags.
//!
//! ## Environment
//! - `FAMILY_STORE_DIR`: record store directory (default `./data`)
//! - `FAMILY_NAMES`: comma separated families that exist even when empty
//! - `FAMILY_PRIORITY`: comma separated `name=offset` pairs lowering a
//!   family's starting count for one run
//! - `FAMILY_SHUFFLE_SEED`: shuffle the pending batch with this seed

use std::path::PathBuf;

use shared::FamilyName;

use crate::error::{AllocatorError, AllocatorResult};

/// Family count used by restructuring when no names are given
pub const DEFAULT_FAMILY_COUNT: usize = 5;

/// `Family 1` .. `Family count`
pub fn numbered_families(count: usize) -> Vec<FamilyName> {
    (1..=count).map(|n| FamilyName::new(format!("Family {n}"))).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub store_dir: PathBuf,
    pub family_names: Vec<FamilyName>,
    pub priority: Vec<(FamilyName, usize)>,
    pub shuffle_seed: Option<u64>,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("./data"),
            family_names: Vec::new(),
            priority: Vec::new(),
            shuffle_seed: None,
        }
    }
}

impl AllocatorConfig {
    pub fn from_env() -> AllocatorResult<Self> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> AllocatorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("FAMILY_STORE_DIR") {
            config.store_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("FAMILY_NAMES") {
            config.family_names = parse_family_names(&raw);
        }
        if let Some(raw) = lookup("FAMILY_PRIORITY") {
            config.priority = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(parse_priority)
                .collect::<AllocatorResult<_>>()?;
        }
        if let Some(raw) = lookup("FAMILY_SHUFFLE_SEED") {
            config.shuffle_seed = Some(parse_seed(&raw)?);
        }

        Ok(config)
    }
}

pub fn parse_family_names(raw: &str) -> Vec<FamilyName> {
    let mut names: Vec<FamilyName> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let name = FamilyName::new(name);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Parse one `Family 2=3` pair
pub fn parse_priority(raw: &str) -> AllocatorResult<(FamilyName, usize)> {
    let invalid = || AllocatorError::config(format!("priority must look like 'Family 2=3', got '{raw}'"));

    let (name, offset) = raw.rsplit_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    let offset = offset.trim().parse::<usize>().map_err(|_| invalid())?;
    Ok((FamilyName::new(name), offset))
}

pub fn parse_seed(raw: &str) -> AllocatorResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| AllocatorError::config(format!("shuffle seed must be a non-negative integer, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AllocatorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AllocatorConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = AllocatorConfig::from_lookup(lookup(&[
            ("FAMILY_STORE_DIR", "/srv/families"),
            ("FAMILY_NAMES", "Family 1, Family 2,,Family 1"),
            ("FAMILY_PRIORITY", "Family 2=3, Family 1 = 1"),
            ("FAMILY_SHUFFLE_SEED", "42"),
        ]))
        .unwrap();

        assert_eq!(config.store_dir, PathBuf::from("/srv/families"));
        assert_eq!(config.family_names, numbered_families(2));
        assert_eq!(
            config.priority,
            vec![(FamilyName::new("Family 2"), 3), (FamilyName::new("Family 1"), 1)]
        );
        assert_eq!(config.shuffle_seed, Some(42));
    }

    #[test]
    fn test_invalid_priority() {
        assert!(parse_priority("Family 2").is_err());
        assert!(parse_priority("=3").is_err());
        assert!(parse_priority("Family 2=-1").is_err());
        assert!(AllocatorConfig::from_lookup(lookup(&[("FAMILY_SHUFFLE_SEED", "abc")])).is_err());
    }
}
