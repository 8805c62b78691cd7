//! Whole-roster restructuring from and to CSV

mod common;
use common::TestFixtures;

use allocator::{numbered_families, restructure, restructure_file, AllocatorError};
use shared::{read_csv_file, Record};

fn roster_row(n: usize, gender: &str, age: &str, activity: &str) -> Record {
    Record {
        name: format!("member {n}"),
        gender: gender.to_string(),
        age_range: age.to_string(),
        phone: TestFixtures::phone(n),
        activity: activity.to_string(),
        family: "Old Family".to_string(),
        ..Default::default()
    }
}

fn sample_roster() -> Vec<Record> {
    let mut rows = Vec::new();
    let mut n = 0;
    for gender in ["MALE", "FEMALE"] {
        for age in ["15-19", "20-24"] {
            for activity in ["CHOIR", "DRAMA", "MEDIA"] {
                for _ in 0..2 {
                    rows.push(roster_row(n, gender, age, activity));
                    n += 1;
                }
            }
        }
    }
    rows.push(roster_row(n, "", "", "INACTIVE"));
    rows
}

#[test]
fn test_restructure_balances_sizes_and_activities() {
    let roster = sample_roster();
    let outcome = restructure(&roster, &numbered_families(4), Some(11)).unwrap();

    assert_eq!(outcome.records.len(), roster.len());
    assert_eq!(outcome.after.family_size_spread(), Some(1));

    let families = outcome.after.families.as_ref().unwrap();
    assert!(!families.sizes.contains_key("Old Family"));
    for activity in ["CHOIR", "DRAMA", "MEDIA"] {
        let per_family: Vec<usize> = families
            .activity
            .values()
            .map(|counts| counts.get(activity).copied().unwrap_or(0))
            .collect();
        let max = per_family.iter().max().unwrap();
        let min = per_family.iter().min().unwrap();
        assert!(max - min <= 2, "{activity} spread {per_family:?}");
    }

    let inactive = outcome.records.last().unwrap();
    assert_eq!(inactive.gender, "UNKNOWN");
    assert_eq!(inactive.age_range, "UNKNOWN");
    assert_eq!(outcome.before.families.as_ref().unwrap().sizes.get("Old Family"), Some(&roster.len()));
}

#[test]
fn test_same_seed_same_families() {
    let roster = sample_roster();
    let first = restructure(&roster, &numbered_families(3), Some(5)).unwrap();
    let second = restructure(&roster, &numbered_families(3), Some(5)).unwrap();
    assert_eq!(first.records, second.records);
}

#[test]
fn test_active_member_without_gender_is_rejected() {
    let mut roster = sample_roster();
    roster[0].gender = String::new();

    let err = restructure(&roster, &numbered_families(3), None).unwrap_err();
    assert!(matches!(err, AllocatorError::MissingAttribute { ref member, .. } if member == "Member 0"));
}

#[tokio::test]
async fn test_restructure_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("roster.csv");
    let output = dir.path().join("out").join("families.csv");
    std::fs::write(
        &input,
        "Name,Gender,Age_Range,Phone,Activity\n\
         ada obi,female,20-24,8031234567,choir\n\
         tunde bakare,MALE,20-24,08037777777,drama\n\
         ,,,,inactive\n",
    )
    .unwrap();

    let outcome = restructure_file(&input, &output, &numbered_families(2), None).await.unwrap();
    assert_eq!(outcome.records.len(), 3);

    let written = read_csv_file(&output).await.unwrap();
    let names: Vec<&str> = written.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ada Obi", "Tunde Bakare", "Unknown_3"]);
    assert_eq!(written[0].phone, "8031234567");
    assert_eq!(written[0].activity, "CHOIR");
    assert!(written.iter().all(|r| r.family == "Family 1" || r.family == "Family 2"));

    let roster = outcome.roster().render_text();
    assert!(roster.contains("Family 1"));
    assert!(roster.contains("Unknown_3"));
}
