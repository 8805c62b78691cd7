//! Plain-text family roster

use std::collections::BTreeMap;
use std::fmt::Write;

use shared::{FamilyName, Gender};

use super::allocator::Assignment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: String,
    pub gender: Option<Gender>,
}

/// Members listed under their family, families in name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FamilyRoster {
    families: BTreeMap<FamilyName, Vec<RosterEntry>>,
}

impl FamilyRoster {
    pub fn from_assignments(assignments: &[Assignment]) -> Self {
        let mut families: BTreeMap<FamilyName, Vec<RosterEntry>> = BTreeMap::new();
        for assignment in assignments {
            families
                .entry(assignment.family.clone())
                .or_default()
                .push(RosterEntry {
                    name: assignment.member.name.clone(),
                    gender: assignment.member.gender,
                });
        }
        Self { families }
    }

    pub fn family(&self, name: &FamilyName) -> Option<&[RosterEntry]> {
        self.families.get(name).map(Vec::as_slice)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (family, entries) in &self.families {
            let _ = writeln!(out, "{family} ({} members)", entries.len());
            for entry in entries {
                match entry.gender {
                    Some(gender) => {
                        let _ = writeln!(out, "  - {} ({gender})", entry.name);
                    }
                    None => {
                        let _ = writeln!(out, "  - {}", entry.name);
                    }
                }
            }
            let _ = writeln!(out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Member;

    fn assignment(name: &str, gender: Option<Gender>, family: &str) -> Assignment {
        Assignment {
            member: Member {
                name: name.to_string(),
                gender,
                age_bracket: None,
                phone: None,
                activity: None,
                timestamp: None,
                family: None,
            },
            family: FamilyName::new(family),
            batch_index: 0,
        }
    }

    #[test]
    fn test_render_groups_by_family() {
        let roster = FamilyRoster::from_assignments(&[
            assignment("Tunde Bakare", Some(Gender::Male), "Family 2"),
            assignment("Ada Obi", Some(Gender::Female), "Family 1"),
            assignment("Kemi Lawal", None, "Family 2"),
        ]);

        assert_eq!(roster.family(&FamilyName::new("Family 2")).unwrap().len(), 2);
        assert_eq!(
            roster.render_text(),
            "Family 1 (1 members)\n  - Ada Obi (FEMALE)\n\n\
             Family 2 (2 members)\n  - Tunde Bakare (MALE)\n  - Kemi Lawal\n\n"
        );
    }
}
