//! Raw tabular rows as held by the record store

use serde::{Deserialize, Serialize};

/// Columns written to the assigned (master) set
pub const ASSIGNED_COLUMNS: &[&str] = &["NAME", "GENDER", "AGE_RANGE", "PHONE", "FAMILY", "TIMESTAMP"];

/// Columns written to the pending set
pub const PENDING_COLUMNS: &[&str] = &["NAME", "GENDER", "AGE_RANGE", "PHONE", "TIMESTAMP"];

/// One row of either record set
///
/// Every cell is kept as text; blank or absent columns read as empty strings.
/// Typed interpretation happens in [`crate::Member::from_record`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(rename = "NAME")]
    pub name: String,

    #[serde(rename = "GENDER")]
    pub gender: String,

    #[serde(rename = "AGE_RANGE")]
    pub age_range: String,

    #[serde(rename = "PHONE")]
    pub phone: String,

    #[serde(rename = "FAMILY")]
    pub family: String,

    #[serde(rename = "TIMESTAMP")]
    pub timestamp: String,

    #[serde(rename = "ACTIVITY")]
    pub activity: String,
}

impl Record {
    /// Cell value by upper-case column name; unknown columns are blank
    pub fn field(&self, column: &str) -> &str {
        match column {
            "NAME" => &self.name,
            "GENDER" => &self.gender,
            "AGE_RANGE" => &self.age_range,
            "PHONE" => &self.phone,
            "FAMILY" => &self.family,
            "TIMESTAMP" => &self.timestamp,
            "ACTIVITY" => &self.activity,
            _ => "",
        }
    }

    /// Cells in the order of `columns`
    pub fn row<'a>(&'a self, columns: &[&str]) -> Vec<&'a str> {
        columns.iter().map(|column| self.field(column)).collect()
    }
}
