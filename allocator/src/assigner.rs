//! Assigning the pending set into families
//!
//! A run reads both record sets under the store run lock, screens the
//! pending rows, allocates them, appends each assignment to the assigned set
//! stamped with the run time, and finally clears the pending set. Every
//! phone already in the assigned set is skipped, so a run that died halfway
//! through appending is resumed by running again.

use std::collections::HashSet;
use std::fmt::Write;

use chrono::Local;
use shared::{process_info, process_warn, CanonicalPhone, FamilyName, Member, ProcessId, Record, RecordStore};
use uuid::Uuid;

use crate::config::AllocatorConfig;
use crate::core::{allocate, AllocationMode, AllocationPlan, Assignment, GroupLoadTracker};
use crate::error::{AllocatorError, AllocatorResult};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A pending row that could not be turned into a member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub record: Record,
    pub reason: String,
}

/// What a run did, or in a preview, would do
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub dry_run: bool,
    pub mode: AllocationMode,
    pub shuffle_seed: Option<u64>,

    /// New assignments in placement order
    pub placed: Vec<Assignment>,

    /// Pending members whose phone is already in the assigned set
    pub already_assigned: Vec<String>,

    /// Later pending rows repeating a phone seen earlier in the batch
    pub duplicates: Vec<String>,

    pub rejected: Vec<RejectedRecord>,

    /// Whether the pending set was cleared at the end
    pub pending_cleared: bool,

    /// Member count per family after the run
    pub family_totals: Vec<(FamilyName, usize)>,

    pub candidate_cap: Option<usize>,
}

impl RunSummary {
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let label = if self.dry_run { " (dry run)" } else { "" };
        let _ = writeln!(out, "Run {}{label}", self.run_id);
        let _ = writeln!(out, "Placed {} member(s)", self.placed.len());
        for assignment in &self.placed {
            let _ = writeln!(out, "  {} -> {}", assignment.member.describe(), assignment.family);
        }
        if !self.already_assigned.is_empty() {
            let _ = writeln!(out, "Skipped {} already assigned", self.already_assigned.len());
            for member in &self.already_assigned {
                let _ = writeln!(out, "  {member}");
            }
        }
        if !self.duplicates.is_empty() {
            let _ = writeln!(out, "Dropped {} repeated registration(s)", self.duplicates.len());
            for member in &self.duplicates {
                let _ = writeln!(out, "  {member}");
            }
        }
        if !self.rejected.is_empty() {
            let _ = writeln!(out, "Rejected {} pending row(s); pending set kept", self.rejected.len());
            for rejected in &self.rejected {
                let _ = writeln!(out, "  {}: {}", rejected.record.name, rejected.reason);
            }
        }
        let _ = writeln!(out, "Family totals");
        for (family, total) in &self.family_totals {
            let _ = writeln!(out, "  {:<16}{total:>6}", family.as_str());
        }
        out
    }
}

/// Pending set screened against the assigned set
struct Screened {
    batch: Vec<Member>,
    already_assigned: Vec<String>,
    duplicates: Vec<String>,
    rejected: Vec<RejectedRecord>,
}

fn screen(assigned: &[Record], pending: &[Record]) -> Screened {
    let assigned_phones: HashSet<String> = assigned
        .iter()
        .filter_map(|r| CanonicalPhone::key(&r.phone))
        .collect();
    let mut batch_phones = HashSet::new();
    let mut screened = Screened {
        batch: Vec::new(),
        already_assigned: Vec::new(),
        duplicates: Vec::new(),
        rejected: Vec::new(),
    };

    for record in pending {
        let member = match Member::from_record(record) {
            Ok(member) => member,
            Err(e) => {
                screened.rejected.push(RejectedRecord {
                    record: record.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let Some(phone) = member.phone.as_ref().map(|p| p.as_str().to_string()) else {
            screened.rejected.push(RejectedRecord {
                record: record.clone(),
                reason: "phone is required".to_string(),
            });
            continue;
        };

        if assigned_phones.contains(&phone) {
            screened.already_assigned.push(member.describe());
        } else if !batch_phones.insert(phone) {
            screened.duplicates.push(member.describe());
        } else {
            screened.batch.push(Member { family: None, ..member });
        }
    }
    screened
}

pub struct FamilyAssigner<S>
where
    S: RecordStore,
{
    store: S,
    config: AllocatorConfig,
}

impl<S> FamilyAssigner<S>
where
    S: RecordStore,
{
    pub fn new(store: S, config: AllocatorConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Compute the run without writing anything
    pub async fn preview(&self, plan: &AllocationPlan) -> AllocatorResult<RunSummary> {
        let assigned = self.store.read_assigned().await?;
        let pending = self.store.read_pending().await?;
        let (summary, _) = self.plan(&assigned, &pending, plan, true)?;
        Ok(summary)
    }

    /// Allocate the pending set and commit it to the store
    pub async fn run(&self, plan: &AllocationPlan) -> AllocatorResult<RunSummary> {
        let _guard = self.store.lock().await?;

        let assigned = self.store.read_assigned().await?;
        let pending = self.store.read_pending().await?;
        let (mut summary, records) = self.plan(&assigned, &pending, plan, false)?;

        if pending.is_empty() {
            process_info!(ProcessId::current(), "📭 No pending members to assign");
            return Ok(summary);
        }

        let total = records.len();
        for (appended, record) in records.iter().enumerate() {
            self.store
                .append_assigned(record)
                .await
                .map_err(|source| AllocatorError::AppendInterrupted { appended, total, source })?;
        }

        if summary.rejected.is_empty() {
            self.store.clear_pending().await?;
            self.store.append_pending_header().await?;
            summary.pending_cleared = true;
        } else {
            process_warn!(
                ProcessId::current(),
                "⚠️ {} pending row(s) rejected; pending set left in place",
                summary.rejected.len()
            );
        }

        process_info!(
            ProcessId::current(),
            "✅ Run {} placed {} member(s), skipped {}",
            summary.run_id,
            summary.placed.len(),
            summary.already_assigned.len()
        );
        Ok(summary)
    }

    /// Screen and allocate, returning the summary and the rows to append
    fn plan(
        &self,
        assigned: &[Record],
        pending: &[Record],
        plan: &AllocationPlan,
        dry_run: bool,
    ) -> AllocatorResult<(RunSummary, Vec<Record>)> {
        let screened = screen(assigned, pending);
        let mut tracker = GroupLoadTracker::from_assigned(assigned, &self.config.family_names);
        let actual_totals = tracker.member_counts();

        for (family, offset) in &self.config.priority {
            if !tracker.apply_priority_offset(family, *offset) {
                return Err(AllocatorError::config(format!("priority names unknown family '{family}'")));
            }
            process_info!(ProcessId::current(), "⭐ Priority offset {} for {}", offset, family);
        }

        let mut summary = RunSummary {
            run_id: Uuid::new_v4(),
            dry_run,
            mode: plan.mode,
            shuffle_seed: plan.shuffle_seed,
            placed: Vec::new(),
            already_assigned: screened.already_assigned,
            duplicates: screened.duplicates,
            rejected: screened.rejected,
            pending_cleared: false,
            family_totals: actual_totals,
            candidate_cap: None,
        };

        if screened.batch.is_empty() {
            return Ok((summary, Vec::new()));
        }

        let allocation = allocate(screened.batch, tracker, plan)?;
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let records = allocation
            .assignments
            .iter()
            .map(|assignment| Record {
                timestamp: timestamp.clone(),
                ..assignment.to_record()
            })
            .collect();

        summary.family_totals = allocation.tracker.member_counts();
        summary.candidate_cap = allocation.candidate_cap;
        summary.placed = allocation.assignments;
        Ok((summary, records))
    }
}
