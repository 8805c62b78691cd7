//! Member attributes and the typed member record

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::phone::CanonicalPhone;
use super::record::Record;
use crate::errors::{SharedError, SharedResult};

const UNKNOWN: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    /// Degraded mode value substituted upstream for members missing a gender
    Unknown,
}

impl FromStr for Gender {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            UNKNOWN => Ok(Gender::Unknown),
            _ => Err(SharedError::InvalidGender { input: s.to_string() }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
            Gender::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Ordered categorical age label such as `20-24`
///
/// Brackets order by their leading number; labels without one (including
/// `UNKNOWN`) sort after every numbered bracket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgeBracket {
    label: String,
    lower: Option<u32>,
}

impl AgeBracket {
    pub fn parse(raw: &str) -> SharedResult<Self> {
        let label = raw.trim();
        if label.is_empty() {
            return Err(SharedError::InvalidAgeBracket { input: raw.to_string() });
        }
        if label.eq_ignore_ascii_case(UNKNOWN) {
            return Ok(Self::unknown());
        }

        let leading: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
        Ok(Self {
            label: label.to_string(),
            lower: leading.parse().ok(),
        })
    }

    pub fn unknown() -> Self {
        Self {
            label: UNKNOWN.to_string(),
            lower: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Ord for AgeBracket {
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |b: &AgeBracket| b.lower.unwrap_or(u32::MAX);
        key(self)
            .cmp(&key(other))
            .then_with(|| self.is_unknown().cmp(&other.is_unknown()))
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for AgeBracket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<String> for AgeBracket {
    type Error = SharedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AgeBracket> for String {
    fn from(bracket: AgeBracket) -> Self {
        bracket.label
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Free-form activity category, stored upper-cased
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityTag(String);

impl ActivityTag {
    pub const INACTIVE: &'static str = "INACTIVE";

    /// Returns `None` for blank input
    pub fn new(raw: &str) -> Option<Self> {
        let tag = raw.trim();
        (!tag.is_empty()).then(|| Self(tag.to_uppercase()))
    }

    pub fn is_inactive(&self) -> bool {
        self.0 == Self::INACTIVE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a family group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FamilyName(String);

impl FamilyName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FamilyName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for FamilyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Title-case a display name
///
/// Runs of whitespace collapse to a single space. Within a word, a letter is
/// upper-cased when the previous character is not a letter and lower-cased
/// otherwise, so `NWOSU-EZE` becomes `Nwosu-Eze`.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, word) in raw.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let mut after_letter = false;
        for c in word.chars() {
            if c.is_alphabetic() {
                if after_letter {
                    out.extend(c.to_lowercase());
                } else {
                    out.extend(c.to_uppercase());
                }
                after_letter = true;
            } else {
                out.push(c);
                after_letter = false;
            }
        }
    }
    out
}

/// A person awaiting or holding a family assignment
///
/// Attributes that were blank in the source row stay `None`; substituting
/// `UNKNOWN` is the job of an explicit normalization step, never of the
/// allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub gender: Option<Gender>,
    pub age_bracket: Option<AgeBracket>,
    pub phone: Option<CanonicalPhone>,
    pub activity: Option<ActivityTag>,
    pub timestamp: Option<String>,
    pub family: Option<FamilyName>,
}

impl Member {
    /// Parse a store row into a typed member
    ///
    /// Blank cells become `None`. Non-blank cells that fail to parse are
    /// errors, so a malformed phone never silently loses its dedup key.
    pub fn from_record(record: &Record) -> SharedResult<Self> {
        Ok(Self {
            name: title_case(&record.name),
            gender: non_blank(&record.gender).map(str::parse::<Gender>).transpose()?,
            age_bracket: non_blank(&record.age_range).map(AgeBracket::parse).transpose()?,
            phone: non_blank(&record.phone).map(CanonicalPhone::parse).transpose()?,
            activity: ActivityTag::new(&record.activity),
            timestamp: non_blank(&record.timestamp).map(str::to_string),
            family: non_blank(&record.family).map(FamilyName::new),
        })
    }

    /// Render back into a store row
    pub fn to_record(&self) -> Record {
        Record {
            name: self.name.clone(),
            gender: self.gender.map(|g| g.to_string()).unwrap_or_default(),
            age_range: self.age_bracket.as_ref().map(|b| b.to_string()).unwrap_or_default(),
            phone: self.phone.as_ref().map(|p| p.to_string()).unwrap_or_default(),
            family: self.family.as_ref().map(|f| f.to_string()).unwrap_or_default(),
            timestamp: self.timestamp.clone().unwrap_or_default(),
            activity: self.activity.as_ref().map(|a| a.to_string()).unwrap_or_default(),
        }
    }

    /// Short identity used in operator-facing messages
    pub fn describe(&self) -> String {
        match &self.phone {
            Some(phone) => format!("{} ({})", self.name, phone),
            None => self.name.clone(),
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
