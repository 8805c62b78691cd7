//! Family allocation
//!
//! Two modes share the same bookkeeping:
//!
//! - **Least-loaded** places each member, in batch order, into the family
//!   with the lowest current count.
//! - **Stratified** partitions the batch by (gender, age bracket, activity)
//!   and spreads every stratum across the families, keeping counts level and
//!   spreading each activity tag.
//!
//! Allocation is pure: it consumes a batch and a tracker and returns the
//! assignments with the updated tracker. Nothing is written anywhere, so a
//! failed allocation leaves no trace.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use shared::{process_debug, process_info, ActivityTag, AgeBracket, FamilyName, Gender, Member, ProcessId, Record};

use super::load_tracker::GroupLoadTracker;
use crate::error::{AllocatorError, AllocatorResult};

/// Allocation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationMode {
    /// Mode A: each member to the least-loaded family
    #[default]
    LeastLoaded,
    /// Mode B: stratum-balanced placement with activity spread
    Stratified,
}

/// How a batch should be allocated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationPlan {
    pub mode: AllocationMode,

    /// Shuffle the batch with this seed before placing anyone
    pub shuffle_seed: Option<u64>,
}

impl AllocationPlan {
    pub fn new(mode: AllocationMode) -> Self {
        Self { mode, shuffle_seed: None }
    }

    pub fn with_shuffle_seed(mut self, seed: Option<u64>) -> Self {
        self.shuffle_seed = seed;
        self
    }
}

/// One member placed into one family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub member: Member,
    pub family: FamilyName,

    /// Position of the member in the batch as given, before any shuffle
    pub batch_index: usize,
}

impl Assignment {
    /// Store row for the assigned set
    pub fn to_record(&self) -> Record {
        Record {
            family: self.family.to_string(),
            ..self.member.to_record()
        }
    }
}

/// Stratification key; `activity` is `None` when the batch carries no tags
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StratumKey {
    pub gender: Gender,
    pub age_bracket: AgeBracket,
    pub activity: Option<ActivityTag>,
}

/// Outcome of one allocation
#[derive(Debug, Clone)]
pub struct Allocation {
    /// Assignments in placement order
    pub assignments: Vec<Assignment>,

    /// Tracker after every placement
    pub tracker: GroupLoadTracker,

    /// Per-family ceiling used in stratified mode
    pub candidate_cap: Option<usize>,

    /// Placements where no family was under the ceiling
    pub cap_fallbacks: usize,
}

/// Allocate `batch` into the families known to `tracker`
///
/// Fails before placing anyone if the tracker is empty, a member already
/// holds a family, a phone appears twice, or (stratified mode) a member lacks
/// gender or age bracket.
pub fn allocate(batch: Vec<Member>, tracker: GroupLoadTracker, plan: &AllocationPlan) -> AllocatorResult<Allocation> {
    if tracker.is_empty() {
        return Err(AllocatorError::config("no families exist to allocate into"));
    }
    validate_batch(&batch, plan.mode)?;

    let mut batch: Vec<(usize, Member)> = batch.into_iter().enumerate().collect();
    if let Some(seed) = plan.shuffle_seed {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        batch.shuffle(&mut rng);
        process_debug!(ProcessId::current(), "🔀 Shuffled batch of {} with seed {}", batch.len(), seed);
    }

    let allocation = match plan.mode {
        AllocationMode::LeastLoaded => least_loaded(batch, tracker),
        AllocationMode::Stratified => stratified(batch, tracker),
    };

    process_info!(
        ProcessId::current(),
        "🧮 Allocated {} member(s) across {} families",
        allocation.assignments.len(),
        allocation.tracker.len()
    );
    Ok(allocation)
}

fn validate_batch(batch: &[Member], mode: AllocationMode) -> AllocatorResult<()> {
    let mut phones = HashSet::new();
    for member in batch {
        if let Some(family) = &member.family {
            return Err(AllocatorError::AlreadyAssigned {
                member: member.describe(),
                family: family.to_string(),
            });
        }
        if let Some(phone) = &member.phone {
            if !phones.insert(phone.clone()) {
                return Err(AllocatorError::DuplicateMember { member: member.describe() });
            }
        }
        if mode == AllocationMode::Stratified {
            if member.gender.is_none() {
                return Err(AllocatorError::missing(member.describe(), "gender"));
            }
            if member.age_bracket.is_none() {
                return Err(AllocatorError::missing(member.describe(), "age_bracket"));
            }
        }
    }
    Ok(())
}

/// Position of the first family holding the minimum count
fn least_loaded_index(tracker: &GroupLoadTracker) -> usize {
    (0..tracker.len())
        .min_by_key(|&idx| tracker.load_at(idx))
        .unwrap_or(0)
}

fn least_loaded(batch: Vec<(usize, Member)>, mut tracker: GroupLoadTracker) -> Allocation {
    let mut assignments = Vec::with_capacity(batch.len());
    for (batch_index, member) in batch {
        let idx = least_loaded_index(&tracker);
        tracker.place_at(idx, member.activity.as_ref());
        process_debug!(ProcessId::current(), "➡️ {} -> {}", member.describe(), tracker.name_at(idx));
        assignments.push(Assignment {
            family: tracker.name_at(idx).clone(),
            member,
            batch_index,
        });
    }

    Allocation {
        assignments,
        tracker,
        candidate_cap: None,
        cap_fallbacks: 0,
    }
}

/// Partition into strata in key order; members keep batch order within a stratum
pub fn partition(batch: Vec<Member>) -> BTreeMap<StratumKey, Vec<Member>> {
    partition_indexed(batch.into_iter().enumerate().collect())
        .into_iter()
        .map(|(key, members)| (key, members.into_iter().map(|(_, m)| m).collect()))
        .collect()
}

fn partition_indexed(batch: Vec<(usize, Member)>) -> BTreeMap<StratumKey, Vec<(usize, Member)>> {
    let with_activity = batch.iter().any(|(_, m)| m.activity.is_some());
    let mut strata: BTreeMap<StratumKey, Vec<(usize, Member)>> = BTreeMap::new();
    for (batch_index, member) in batch {
        let key = StratumKey {
            gender: member.gender.unwrap_or(Gender::Unknown),
            age_bracket: member.age_bracket.clone().unwrap_or_else(AgeBracket::unknown),
            activity: if with_activity { member.activity.clone() } else { None },
        };
        strata.entry(key).or_default().push((batch_index, member));
    }
    strata
}

fn stratified(batch: Vec<(usize, Member)>, mut tracker: GroupLoadTracker) -> Allocation {
    let cap = batch.len().div_ceil(tracker.len());
    let mut cap_fallbacks = 0;
    let mut assignments = Vec::with_capacity(batch.len());

    let strata = partition_indexed(batch);
    process_debug!(
        ProcessId::current(),
        "📊 {} strata, per-family ceiling {}",
        strata.len(),
        cap
    );

    for (key, members) in strata {
        process_debug!(
            ProcessId::current(),
            "🧩 Stratum {}/{}/{}: {} member(s)",
            key.gender,
            key.age_bracket,
            key.activity.as_ref().map(ActivityTag::as_str).unwrap_or("-"),
            members.len()
        );
        for (batch_index, member) in members {
            let (idx, fell_back) = stratified_choice(&tracker, cap, member.activity.as_ref());
            if fell_back {
                cap_fallbacks += 1;
                process_debug!(
                    ProcessId::current(),
                    "↩️ No family under ceiling {} for {}; using least loaded",
                    cap,
                    member.describe()
                );
            }
            tracker.place_at(idx, member.activity.as_ref());
            process_debug!(ProcessId::current(), "➡️ {} -> {}", member.describe(), tracker.name_at(idx));
            assignments.push(Assignment {
                family: tracker.name_at(idx).clone(),
                member,
                batch_index,
            });
        }
    }

    Allocation {
        assignments,
        tracker,
        candidate_cap: Some(cap),
        cap_fallbacks,
    }
}

/// Pick a family for one stratified placement
///
/// Candidates are the least-loaded families under `cap`; when none is under
/// it, the globally least-loaded families. Among candidates the one holding
/// the fewest of `activity` wins, the earliest on ties.
fn stratified_choice(tracker: &GroupLoadTracker, cap: usize, activity: Option<&ActivityTag>) -> (usize, bool) {
    let under_cap: Vec<usize> = (0..tracker.len()).filter(|&idx| tracker.load_at(idx) < cap).collect();
    let (pool, fell_back) = if under_cap.is_empty() {
        ((0..tracker.len()).collect::<Vec<_>>(), true)
    } else {
        (under_cap, false)
    };

    let min_load = pool.iter().map(|&idx| tracker.load_at(idx)).min().unwrap_or(0);
    let chosen = pool
        .into_iter()
        .filter(|&idx| tracker.load_at(idx) == min_load)
        .min_by_key(|&idx| activity.map(|tag| tracker.activity_at(idx, tag)).unwrap_or(0))
        .unwrap_or(0);
    (chosen, fell_back)
}
