//! Fuzzy duplicate detector
//!
//! Matches on exact canonical phone, token-sort name similarity, and
//! optionally on one processed name containing the other.

use shared::{process_debug, CanonicalPhone, ProcessId, Record};

use crate::core::{sorted_tokens, token_sort_ratio};
use crate::traits::DuplicateDetector;

#[derive(Debug, Clone, Default)]
pub struct FuzzyDuplicateDetector {
    /// Also match when one processed name contains the other
    containment: bool,
}

impl FuzzyDuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_containment(containment: bool) -> Self {
        Self { containment }
    }

    fn contains_either_way(a: &str, b: &str) -> bool {
        !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
    }
}

impl DuplicateDetector for FuzzyDuplicateDetector {
    fn find_conflict(&self, candidate: &Record, pool: &[Record], threshold: u8) -> Option<Record> {
        let candidate_phone = CanonicalPhone::key(&candidate.phone);
        let candidate_name = sorted_tokens(&candidate.name);

        pool.iter()
            .find(|existing| {
                if candidate_phone.is_some() && candidate_phone == CanonicalPhone::key(&existing.phone) {
                    process_debug!(ProcessId::current(), "📞 Phone match for {}", candidate.name);
                    return true;
                }

                let score = token_sort_ratio(&candidate.name, &existing.name);
                if score >= threshold {
                    process_debug!(
                        ProcessId::current(),
                        "🔤 Name match for {} against {} (score {})",
                        candidate.name,
                        existing.name,
                        score
                    );
                    return true;
                }

                self.containment && Self::contains_either_way(&candidate_name, &sorted_tokens(&existing.name))
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, phone: &str) -> Record {
        Record {
            name: name.to_string(),
            phone: phone.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_phone_match_across_formats() {
        let detector = FuzzyDuplicateDetector::new();
        let pool = vec![record("Someone Else", "2348031234567")];

        let conflict = detector.find_conflict(&record("Ada Obi", "08031234567"), &pool, 85);
        assert_eq!(conflict.unwrap().name, "Someone Else");
    }

    #[test]
    fn test_name_match_at_threshold() {
        let detector = FuzzyDuplicateDetector::new();
        let pool = vec![record("Obi Ada", "08030000000")];

        assert!(detector
            .find_conflict(&record("Ada Obi", "08031234567"), &pool, 85)
            .is_some());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let detector = FuzzyDuplicateDetector::new();
        let pool = vec![record("Ada Obie", "08030000000")];
        let candidate = record("Ada Obi", "08031234567");

        // Score is 93
        assert!(detector.find_conflict(&candidate, &pool, 93).is_some());
        assert!(detector.find_conflict(&candidate, &pool, 94).is_none());
    }

    #[test]
    fn test_first_match_in_pool_order_wins() {
        let detector = FuzzyDuplicateDetector::new();
        let pool = vec![
            record("Tunde Bakare", "08030000001"),
            record("Ada Obi", "08030000002"),
            record("Obi Ada", "08030000003"),
        ];

        let conflict = detector.find_conflict(&record("Ada Obi", "08031234567"), &pool, 85);
        assert_eq!(conflict.unwrap().phone, "08030000002");
    }

    #[test]
    fn test_containment_is_opt_in() {
        let pool = vec![record("Ada Obi Okafor", "08030000000")];
        let candidate = record("Ada Obi", "08031234567");

        assert!(FuzzyDuplicateDetector::new().find_conflict(&candidate, &pool, 85).is_none());
        assert!(FuzzyDuplicateDetector::with_containment(true)
            .find_conflict(&candidate, &pool, 85)
            .is_some());
    }

    #[test]
    fn test_blank_phones_never_match() {
        let detector = FuzzyDuplicateDetector::new();
        let pool = vec![record("Tunde Bakare", "")];

        assert!(detector.find_conflict(&record("Ada Obi", ""), &pool, 85).is_none());
    }
}
