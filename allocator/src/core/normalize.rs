//! Degraded-mode normalization of a roster before restructuring
//!
//! Stratified allocation refuses members without gender or age bracket.
//! Rosters exported from elsewhere often leave those blank for inactive
//! members, so this step fills them with `UNKNOWN` explicitly, and only for
//! members tagged `INACTIVE`. Everyone else must already be complete.

use shared::{title_case, ActivityTag, AgeBracket, Gender, Member, Record};

use crate::error::{AllocatorError, AllocatorResult};

/// Turn one roster row into an allocatable member
///
/// `row` is the 1-based data row number, used to name members whose name
/// cell is blank (`Unknown_<row>`). The phone is not carried: restructuring
/// balances on attributes only and the caller keeps the original row.
pub fn roster_member(row: usize, record: &Record) -> AllocatorResult<Member> {
    let name = match title_case(&record.name) {
        name if name.is_empty() => format!("Unknown_{row}"),
        name => name,
    };
    let activity = ActivityTag::new(&record.activity);
    let inactive = activity.as_ref().is_some_and(ActivityTag::is_inactive);

    let gender = match record.gender.trim() {
        "" if inactive => Gender::Unknown,
        "" => return Err(AllocatorError::missing(name, "gender")),
        raw => raw.parse::<Gender>()?,
    };
    let age_bracket = match record.age_range.trim() {
        "" if inactive => AgeBracket::unknown(),
        "" => return Err(AllocatorError::missing(name, "age_bracket")),
        raw => AgeBracket::parse(raw)?,
    };

    Ok(Member {
        name,
        gender: Some(gender),
        age_bracket: Some(age_bracket),
        phone: None,
        activity,
        timestamp: None,
        family: None,
    })
}

/// Normalize a whole roster, numbering rows from 1
pub fn normalize_roster(records: &[Record]) -> AllocatorResult<Vec<Member>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| roster_member(i + 1, record))
        .collect()
}
