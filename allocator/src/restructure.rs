//! Restructuring a full roster into balanced families
//!
//! Every member of the roster is redistributed from scratch with the
//! stratified mode. Existing FAMILY cells are ignored.

use std::path::Path;

use shared::{process_info, read_csv_file, write_csv_file, FamilyName, ProcessId, Record};

use crate::core::{allocate, normalize_roster, AllocationMode, AllocationPlan, Assignment, DistributionStats, FamilyRoster, GroupLoadTracker};
use crate::error::{AllocatorError, AllocatorResult};

/// Columns of a restructured roster file
pub const ROSTER_COLUMNS: &[&str] = &["NAME", "GENDER", "AGE_RANGE", "PHONE", "ACTIVITY", "FAMILY"];

#[derive(Debug, Clone)]
pub struct RestructureOutcome {
    /// Output rows in roster order, FAMILY filled
    pub records: Vec<Record>,

    /// Assignments in placement order
    pub assignments: Vec<Assignment>,

    pub before: DistributionStats,
    pub after: DistributionStats,
    pub cap_fallbacks: usize,
}

impl RestructureOutcome {
    pub fn roster(&self) -> FamilyRoster {
        FamilyRoster::from_assignments(&self.assignments)
    }
}

/// Redistribute `records` across `families`
pub fn restructure(records: &[Record], families: &[FamilyName], shuffle_seed: Option<u64>) -> AllocatorResult<RestructureOutcome> {
    if families.is_empty() {
        return Err(AllocatorError::config("restructuring needs at least one family"));
    }

    let batch = normalize_roster(records)?;
    let plan = AllocationPlan::new(AllocationMode::Stratified).with_shuffle_seed(shuffle_seed);
    let allocation = allocate(batch, GroupLoadTracker::with_groups(families.iter().cloned()), &plan)?;

    let mut output: Vec<Option<Record>> = vec![None; records.len()];
    for assignment in &allocation.assignments {
        let original = &records[assignment.batch_index];
        output[assignment.batch_index] = Some(Record {
            phone: original.phone.clone(),
            timestamp: original.timestamp.clone(),
            ..assignment.to_record()
        });
    }
    let output: Vec<Record> = output.into_iter().flatten().collect();

    process_info!(
        ProcessId::current(),
        "🏠 Restructured {} member(s) into {} families",
        output.len(),
        families.len()
    );

    Ok(RestructureOutcome {
        before: DistributionStats::from_records(records),
        after: DistributionStats::from_records(&output),
        records: output,
        assignments: allocation.assignments,
        cap_fallbacks: allocation.cap_fallbacks,
    })
}

/// Read a roster CSV, restructure it and write the result
pub async fn restructure_file(
    input: &Path,
    output: &Path,
    families: &[FamilyName],
    shuffle_seed: Option<u64>,
) -> AllocatorResult<RestructureOutcome> {
    let records = read_csv_file(input).await?;
    let outcome = restructure(&records, families, shuffle_seed)?;
    write_csv_file(output, ROSTER_COLUMNS, &outcome.records).await?;
    process_info!(ProcessId::current(), "💾 Wrote {}", output.display());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::numbered_families;

    fn row(name: &str, gender: &str, age: &str, activity: &str, family: &str) -> Record {
        Record {
            name: name.to_string(),
            gender: gender.to_string(),
            age_range: age.to_string(),
            activity: activity.to_string(),
            family: family.to_string(),
            phone: "08031234567".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_output_keeps_roster_order_and_phone() {
        let records = vec![
            row("Ada", "FEMALE", "20-24", "CHOIR", "Old"),
            row("Bola", "MALE", "15-19", "DRAMA", "Old"),
            row("", "", "", "INACTIVE", ""),
        ];
        let outcome = restructure(&records, &numbered_families(2), None).unwrap();

        let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Bola", "Unknown_3"]);
        assert!(outcome.records.iter().all(|r| r.phone == "08031234567"));
        assert!(outcome.records.iter().all(|r| r.family.starts_with("Family ")));
        assert_eq!(outcome.records[2].gender, "UNKNOWN");
        assert_eq!(outcome.after.family_size_spread(), Some(1));
    }

    #[test]
    fn test_no_families_is_configuration_error() {
        let err = restructure(&[row("Ada", "FEMALE", "20-24", "", "")], &[], None).unwrap_err();
        assert!(matches!(err, AllocatorError::ConfigurationError { .. }));
    }
}
