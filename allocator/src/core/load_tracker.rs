//! Per-family load bookkeeping
//!
//! Tracks the current member count of every known family plus a per-family
//! tally of activity tags. Families keep their discovery order, which is the
//! order ties are broken in.

use std::collections::{BTreeMap, HashMap};

use shared::{ActivityTag, FamilyName, Record};

/// Load state for one family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupLoad {
    /// Count the allocator balances on, after any priority offset
    pub load: usize,

    /// Actual number of members in the family
    pub members: usize,

    /// Members per activity tag; absent tags count as zero
    pub activity: BTreeMap<ActivityTag, usize>,
}

impl GroupLoad {
    fn place(&mut self, activity: Option<&ActivityTag>) {
        self.load += 1;
        self.members += 1;
        if let Some(tag) = activity {
            *self.activity.entry(tag.clone()).or_insert(0) += 1;
        }
    }
}

/// Family load counts in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupLoadTracker {
    groups: Vec<(FamilyName, GroupLoad)>,
    index: HashMap<FamilyName, usize>,
}

impl GroupLoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given families, all empty
    pub fn with_groups<I>(names: I) -> Self
    where
        I: IntoIterator<Item = FamilyName>,
    {
        let mut tracker = Self::new();
        for name in names {
            tracker.seed(name);
        }
        tracker
    }

    /// Scan the assigned set
    ///
    /// Rows with a blank family are not counted. `seeds` are configured
    /// families that must exist even with no members yet; they join after the
    /// families discovered in the records.
    pub fn from_assigned(records: &[Record], seeds: &[FamilyName]) -> Self {
        let mut tracker = Self::new();
        for record in records {
            if record.family.trim().is_empty() {
                continue;
            }
            let idx = tracker.seed(FamilyName::new(record.family.as_str()));
            tracker.groups[idx].1.place(ActivityTag::new(&record.activity).as_ref());
        }
        for name in seeds {
            tracker.seed(name.clone());
        }
        tracker
    }

    /// Register a family at zero if it is not yet known, returning its position
    pub fn seed(&mut self, name: FamilyName) -> usize {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.groups.len();
        self.index.insert(name.clone(), idx);
        self.groups.push((name, GroupLoad::default()));
        idx
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Balancing counts per family, in discovery order
    pub fn counts(&self) -> Vec<(FamilyName, usize)> {
        self.groups
            .iter()
            .map(|(name, group)| (name.clone(), group.load))
            .collect()
    }

    /// Actual member counts per family, ignoring priority offsets
    pub fn member_counts(&self) -> Vec<(FamilyName, usize)> {
        self.groups
            .iter()
            .map(|(name, group)| (name.clone(), group.members))
            .collect()
    }

    pub fn count(&self, name: &FamilyName) -> Option<usize> {
        self.index.get(name).map(|&idx| self.groups[idx].1.load)
    }

    /// Activity tally for one family; unknown families yield an empty map
    pub fn activity_counts(&self, name: &FamilyName) -> BTreeMap<ActivityTag, usize> {
        self.index
            .get(name)
            .map(|&idx| self.groups[idx].1.activity.clone())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, group)| group.load).sum()
    }

    /// Count one placement
    ///
    /// Families outside the tracker are ignored; placement never adds a family.
    pub fn record_placement(&mut self, name: &FamilyName, activity: Option<&ActivityTag>) {
        if let Some(&idx) = self.index.get(name) {
            self.place_at(idx, activity);
        }
    }

    /// Lower a family's starting count by `offset`, flooring at zero
    ///
    /// Returns `false` when the family is unknown.
    pub fn apply_priority_offset(&mut self, name: &FamilyName, offset: usize) -> bool {
        match self.index.get(name) {
            Some(&idx) => {
                let group = &mut self.groups[idx].1;
                group.load = group.load.saturating_sub(offset);
                true
            }
            None => false,
        }
    }

    pub(crate) fn load_at(&self, idx: usize) -> usize {
        self.groups[idx].1.load
    }

    pub(crate) fn activity_at(&self, idx: usize, tag: &ActivityTag) -> usize {
        self.groups[idx].1.activity.get(tag).copied().unwrap_or(0)
    }

    pub(crate) fn name_at(&self, idx: usize) -> &FamilyName {
        &self.groups[idx].0
    }

    pub(crate) fn place_at(&mut self, idx: usize, activity: Option<&ActivityTag>) {
        self.groups[idx].1.place(activity);
    }
}
