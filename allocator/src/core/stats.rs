//! Distribution statistics over a set of records
//!
//! Works on raw store rows so hand-edited or legacy rows still show up in the
//! numbers. Blank gender and age cells are counted as `UNKNOWN`; blank
//! activity and family cells are left out of the tables that use them.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::Serialize;
use shared::{AgeBracket, Record};

pub type Tally = BTreeMap<String, usize>;

/// Row label -> column label -> count
pub type CrossTab = BTreeMap<String, Tally>;

const UNKNOWN: &str = "UNKNOWN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyBreakdown {
    pub sizes: Tally,
    pub gender: CrossTab,
    pub activity: CrossTab,
    pub age: CrossTab,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionStats {
    pub total: usize,
    pub gender: Tally,
    /// Gender -> activity -> count
    pub activity_by_gender: CrossTab,
    /// Age brackets in bracket order
    pub age_brackets: Vec<(String, usize)>,
    /// Age bracket -> gender -> count
    pub age_by_gender: CrossTab,
    /// Present only when at least one record has a family
    pub families: Option<FamilyBreakdown>,
}

fn label_or_unknown(raw: &str, upper: bool) -> String {
    let trimmed = raw.trim();
    match (trimmed.is_empty(), upper) {
        (true, _) => UNKNOWN.to_string(),
        (false, true) => trimmed.to_uppercase(),
        (false, false) => trimmed.to_string(),
    }
}

fn bump(tab: &mut CrossTab, row: &str, column: &str) {
    *tab.entry(row.to_string())
        .or_default()
        .entry(column.to_string())
        .or_insert(0) += 1;
}

impl DistributionStats {
    pub fn from_records(records: &[Record]) -> Self {
        let mut stats = DistributionStats {
            total: records.len(),
            ..Default::default()
        };
        let mut ages: BTreeMap<String, usize> = BTreeMap::new();
        let mut families = FamilyBreakdown::default();
        let mut any_family = false;

        for record in records {
            let gender = label_or_unknown(&record.gender, true);
            let age = label_or_unknown(&record.age_range, false);
            let activity = record.activity.trim().to_uppercase();
            let family = record.family.trim();

            *stats.gender.entry(gender.clone()).or_insert(0) += 1;
            *ages.entry(age.clone()).or_insert(0) += 1;
            bump(&mut stats.age_by_gender, &age, &gender);
            if !activity.is_empty() {
                bump(&mut stats.activity_by_gender, &gender, &activity);
            }

            if !family.is_empty() {
                any_family = true;
                *families.sizes.entry(family.to_string()).or_insert(0) += 1;
                bump(&mut families.gender, family, &gender);
                bump(&mut families.age, family, &age);
                if !activity.is_empty() {
                    bump(&mut families.activity, family, &activity);
                }
            }
        }

        let mut ages: Vec<(String, usize)> = ages.into_iter().collect();
        ages.sort_by_cached_key(|(label, _)| AgeBracket::parse(label).unwrap_or_else(|_| AgeBracket::unknown()));
        stats.age_brackets = ages;
        stats.families = any_family.then_some(families);
        stats
    }

    /// Spread between the largest and smallest family
    pub fn family_size_spread(&self) -> Option<usize> {
        let sizes = &self.families.as_ref()?.sizes;
        let max = sizes.values().max()?;
        let min = sizes.values().min()?;
        Some(max - min)
    }

    /// Plain-text tables for the terminal
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Members: {}", self.total);

        render_tally(&mut out, "Gender distribution", &self.gender);
        render_crosstab(&mut out, "Activity by gender", &self.activity_by_gender);

        let _ = writeln!(out, "\nAge bracket distribution");
        for (label, count) in &self.age_brackets {
            let _ = writeln!(out, "  {label:<16}{count:>6}");
        }
        render_crosstab(&mut out, "Age bracket by gender", &self.age_by_gender);

        if let Some(families) = &self.families {
            render_tally(&mut out, "Family sizes", &families.sizes);
            render_crosstab(&mut out, "Gender by family", &families.gender);
            render_crosstab(&mut out, "Activity by family", &families.activity);
            render_crosstab(&mut out, "Age bracket by family", &families.age);
        }
        out
    }
}

fn render_tally(out: &mut String, title: &str, tally: &Tally) {
    let _ = writeln!(out, "\n{title}");
    for (label, count) in tally {
        let _ = writeln!(out, "  {label:<16}{count:>6}");
    }
}

fn render_crosstab(out: &mut String, title: &str, tab: &CrossTab) {
    let _ = writeln!(out, "\n{title}");
    if tab.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }

    let mut columns: Vec<&String> = tab.values().flat_map(|row| row.keys()).collect();
    columns.sort();
    columns.dedup();

    let _ = write!(out, "  {:<16}", "");
    for column in &columns {
        let _ = write!(out, "{column:>10}");
    }
    let _ = writeln!(out);

    for (row, counts) in tab {
        let _ = write!(out, "  {row:<16}");
        for column in &columns {
            let _ = write!(out, "{:>10}", counts.get(*column).copied().unwrap_or(0));
        }
        let _ = writeln!(out);
    }
}
