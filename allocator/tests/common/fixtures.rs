//! Test fixtures for allocator tests

use allocator::{numbered_families, AllocatorConfig};
use shared::{ActivityTag, AgeBracket, CanonicalPhone, FamilyName, Gender, Member, Record};

pub struct TestFixtures;

#[allow(dead_code)]
impl TestFixtures {
    pub const AGE_BRACKETS: &'static [&'static str] = &["15-19", "20-24", "25-29", "30-34"];
    pub const ACTIVITIES: &'static [&'static str] = &["CHOIR", "DRAMA", "USHERING", "MEDIA"];

    /// Config with `Family 1..count` seeded
    pub fn config(count: usize) -> AllocatorConfig {
        AllocatorConfig {
            family_names: numbered_families(count),
            ..AllocatorConfig::default()
        }
    }

    pub fn family(name: &str) -> FamilyName {
        FamilyName::new(name)
    }

    /// Distinct valid phone for member number `n`
    pub fn phone(n: usize) -> String {
        format!("080{:08}", n)
    }

    pub fn pending(name: &str, phone: &str) -> Record {
        Record {
            name: name.to_string(),
            gender: "FEMALE".to_string(),
            age_range: "20-24".to_string(),
            phone: phone.to_string(),
            timestamp: "2025-01-05 10:00:00".to_string(),
            ..Default::default()
        }
    }

    pub fn assigned(name: &str, phone: &str, family: &str) -> Record {
        Record {
            family: family.to_string(),
            ..Self::pending(name, phone)
        }
    }

    /// `count` assigned rows in `family`, numbered from `start`
    pub fn assigned_block(family: &str, start: usize, count: usize) -> Vec<Record> {
        (start..start + count)
            .map(|n| Self::assigned(&format!("Member {n}"), &Self::phone(n), family))
            .collect()
    }

    pub fn member(n: usize, gender: Gender, age: &str, activity: Option<&str>) -> Member {
        Member {
            name: format!("Member {n}"),
            gender: Some(gender),
            age_bracket: Some(AgeBracket::parse(age).unwrap()),
            phone: Some(CanonicalPhone::parse(&Self::phone(n)).unwrap()),
            activity: activity.and_then(ActivityTag::new),
            timestamp: None,
            family: None,
        }
    }
}
