//! Registration of new members into the pending set
//!
//! A registration is normalized, checked against the assigned set and then
//! the pending set, and appended to the pending set only when neither holds
//! a likely duplicate. The check and the append happen under the store run
//! lock so an allocation run cannot clear pending rows between them.

use chrono::Local;
use shared::{process_debug, process_info, Member, ProcessId, Record, RecordStore};

use crate::config::IntakeConfig;
use crate::core::{IntakeSubmission, TIMESTAMP_FORMAT};
use crate::error::{ConflictLocation, IntakeError, IntakeResult};
use crate::traits::DuplicateDetector;

pub struct Registrar<S, D>
where
    S: RecordStore,
    D: DuplicateDetector,
{
    store: S,
    detector: D,
    config: IntakeConfig,
}

impl<S, D> Registrar<S, D>
where
    S: RecordStore,
    D: DuplicateDetector,
{
    pub fn new(store: S, detector: D, config: IntakeConfig) -> Self {
        Self { store, detector, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Normalize and screen a submission without writing anything
    pub async fn check(&self, submission: &IntakeSubmission) -> IntakeResult<Member> {
        let member = self.normalize(submission)?;
        self.screen(&member).await?;
        Ok(member)
    }

    /// Normalize, screen, and append a submission to the pending set
    pub async fn register(&self, submission: &IntakeSubmission) -> IntakeResult<Member> {
        let member = self.normalize(submission)?;

        let _guard = self.store.lock().await?;
        self.screen(&member).await?;
        self.store.append_pending(&member.to_record()).await?;

        process_info!(
            ProcessId::current(),
            "📝 Registered {} as pending",
            member.describe()
        );
        Ok(member)
    }

    fn normalize(&self, submission: &IntakeSubmission) -> IntakeResult<Member> {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        submission.normalize(&self.config.age_brackets, timestamp)
    }

    /// Assigned set first, then pending; the first conflict halts intake
    async fn screen(&self, member: &Member) -> IntakeResult<()> {
        let candidate = member.to_record();
        let threshold = self.config.duplicate_threshold;

        let assigned = self.store.read_assigned().await?;
        if let Some(existing) = self.detector.find_conflict(&candidate, &assigned, threshold) {
            let family = if existing.family.trim().is_empty() {
                "a family".to_string()
            } else {
                existing.family.clone()
            };
            return Err(conflict(member, existing, ConflictLocation::Assigned { family }));
        }

        let pending = self.store.read_pending().await?;
        if let Some(existing) = self.detector.find_conflict(&candidate, &pending, threshold) {
            let submitted_at = existing.timestamp.clone();
            return Err(conflict(member, existing, ConflictLocation::Pending { submitted_at }));
        }

        process_debug!(
            ProcessId::current(),
            "🔍 No duplicate for {} among {} assigned and {} pending",
            member.describe(),
            assigned.len(),
            pending.len()
        );
        Ok(())
    }
}

fn conflict(member: &Member, existing: Record, location: ConflictLocation) -> IntakeError {
    IntakeError::DuplicateConflict {
        candidate: member.describe(),
        existing_name: existing.name,
        existing_phone: existing.phone,
        location,
    }
}
