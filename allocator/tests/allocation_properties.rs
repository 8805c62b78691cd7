//! Balance properties of both allocation modes
//!
//! Properties run as loops over seeded random batches so failures reproduce
//! from the printed seed.

mod common;
use common::{random_batch, TestFixtures};

use allocator::{allocate, AllocationMode, AllocationPlan, Assignment, GroupLoadTracker};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use shared::{FamilyName, Gender};

const SEEDS: u64 = 64;

fn families(count: usize) -> Vec<FamilyName> {
    allocator::numbered_families(count)
}

fn tracker_with(counts: &[usize]) -> GroupLoadTracker {
    let names = families(counts.len());
    let mut tracker = GroupLoadTracker::with_groups(names.iter().cloned());
    for (name, count) in names.iter().zip(counts) {
        for _ in 0..*count {
            tracker.record_placement(name, None);
        }
    }
    tracker
}

fn spread(tracker: &GroupLoadTracker) -> usize {
    let counts: Vec<usize> = tracker.counts().into_iter().map(|(_, c)| c).collect();
    counts.iter().max().unwrap() - counts.iter().min().unwrap()
}

fn placed_in(assignments: &[Assignment]) -> Vec<&str> {
    assignments.iter().map(|a| a.family.as_str()).collect()
}

#[test]
fn test_scenario_equal_groups_four_members() {
    let tracker = GroupLoadTracker::with_groups(["A", "B", "C"].map(FamilyName::from));
    let batch = (0..4).map(|n| TestFixtures::member(n, Gender::Male, "20-24", None)).collect();

    let allocation = allocate(batch, tracker, &AllocationPlan::default()).unwrap();

    assert_eq!(
        allocation.tracker.counts(),
        vec![(FamilyName::from("A"), 2), (FamilyName::from("B"), 1), (FamilyName::from("C"), 1)]
    );
    assert_eq!(allocation.tracker.total(), 4);
}

#[test]
fn test_scenario_smallest_group_fills_first() {
    let mut tracker = GroupLoadTracker::with_groups(["A", "B", "C"].map(FamilyName::from));
    for (name, count) in [("A", 5), ("B", 5), ("C", 2)] {
        for _ in 0..count {
            tracker.record_placement(&FamilyName::from(name), None);
        }
    }
    let batch = (0..4).map(|n| TestFixtures::member(n, Gender::Female, "15-19", None)).collect();

    let allocation = allocate(batch, tracker, &AllocationPlan::default()).unwrap();

    // C reaches 5 after three placements, then the tie goes to A
    assert_eq!(placed_in(&allocation.assignments), vec!["C", "C", "C", "A"]);
}

#[test]
fn test_scenario_priority_offset_takes_next_placements() {
    let mut tracker = tracker_with(&[3, 3, 3]);
    assert!(tracker.apply_priority_offset(&FamilyName::from("Family 2"), 3));
    let batch = (0..4).map(|n| TestFixtures::member(n, Gender::Male, "25-29", None)).collect();

    let allocation = allocate(batch, tracker, &AllocationPlan::default()).unwrap();

    assert_eq!(
        placed_in(&allocation.assignments),
        vec!["Family 2", "Family 2", "Family 2", "Family 1"]
    );
    assert_eq!(allocation.tracker.member_counts()[1].1, 6);
}

#[test]
fn test_least_loaded_balances_equal_start() {
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let groups = rng.gen_range(1..=6);
        let size = rng.gen_range(0..50);
        let batch = random_batch(&mut rng, size, false);

        let allocation = allocate(batch, tracker_with(&vec![0; groups]), &AllocationPlan::default()).unwrap();
        assert!(spread(&allocation.tracker) <= 1, "seed {seed}: spread above 1");
    }
}

#[test]
fn test_stratified_balances_equal_start() {
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let groups = rng.gen_range(1..=6);
        let size = rng.gen_range(0..50);
        let batch = random_batch(&mut rng, size, true);
        let start = rng.gen_range(0..4);

        let plan = AllocationPlan::new(AllocationMode::Stratified).with_shuffle_seed(Some(seed));
        let allocation = allocate(batch, tracker_with(&vec![start; groups]), &plan).unwrap();
        assert!(spread(&allocation.tracker) <= 1, "seed {seed}: spread above 1");
    }
}

#[test]
fn test_every_member_placed_exactly_once() {
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let counts: Vec<usize> = (0..rng.gen_range(1..=5)).map(|_| rng.gen_range(0..8)).collect();
        let size = rng.gen_range(0..40);
        let batch = random_batch(&mut rng, size, seed % 2 == 0);
        let mode = if seed % 3 == 0 {
            AllocationMode::Stratified
        } else {
            AllocationMode::LeastLoaded
        };

        let before = tracker_with(&counts);
        let total_before = before.total();
        let allocation = allocate(batch.clone(), before, &AllocationPlan::new(mode)).unwrap();

        assert_eq!(allocation.tracker.total() - total_before, size, "seed {seed}");
        assert_eq!(allocation.tracker.len(), counts.len(), "seed {seed}: family set changed");

        let mut seen: Vec<usize> = allocation.assignments.iter().map(|a| a.batch_index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..size).collect::<Vec<_>>(), "seed {seed}");
        for assignment in &allocation.assignments {
            assert_eq!(assignment.member, batch[assignment.batch_index]);
        }
    }
}

/// Replays each stratified placement and checks the chosen family held the
/// fewest of the member's activity among the families it competed with
#[test]
fn test_stratified_spreads_each_activity_among_candidates() {
    for seed in 0..SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let counts: Vec<usize> = (0..rng.gen_range(2..=5)).map(|_| rng.gen_range(0..3)).collect();
        let size = rng.gen_range(1..40);
        let batch = random_batch(&mut rng, size, true);

        let start = tracker_with(&counts);
        let allocation = allocate(batch, start.clone(), &AllocationPlan::new(AllocationMode::Stratified)).unwrap();
        let cap = allocation.candidate_cap.unwrap();

        let mut replay = start;
        for assignment in &allocation.assignments {
            let loads = replay.counts();
            let under: Vec<&(FamilyName, usize)> = loads.iter().filter(|(_, load)| *load < cap).collect();
            let pool: Vec<&(FamilyName, usize)> = if under.is_empty() { loads.iter().collect() } else { under };
            let min_load = pool.iter().map(|(_, load)| *load).min().unwrap();
            let candidates: Vec<&FamilyName> =
                pool.iter().filter(|(_, load)| *load == min_load).map(|(name, _)| name).collect();

            assert!(candidates.contains(&&assignment.family), "seed {seed}: placed outside candidates");

            let tag = assignment.member.activity.as_ref().unwrap();
            let held = |name: &FamilyName| replay.activity_counts(name).get(tag).copied().unwrap_or(0);
            let fewest = candidates.iter().map(|&name| held(name)).min().unwrap();
            assert_eq!(held(&assignment.family), fewest, "seed {seed}: activity {tag} not spread");

            replay.record_placement(&assignment.family, Some(tag));
        }
    }
}

#[test]
fn test_first_stratum_spreads_across_families() {
    let batch = vec![
        TestFixtures::member(1, Gender::Female, "20-24", Some("CHOIR")),
        TestFixtures::member(2, Gender::Female, "20-24", Some("CHOIR")),
        TestFixtures::member(3, Gender::Female, "20-24", Some("CHOIR")),
    ];
    let allocation = allocate(batch, tracker_with(&[0, 0, 0]), &AllocationPlan::new(AllocationMode::Stratified)).unwrap();

    assert_eq!(
        placed_in(&allocation.assignments),
        vec!["Family 1", "Family 2", "Family 3"]
    );
}
