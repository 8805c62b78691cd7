//! Core types used throughout the family allocation system

mod member;
mod phone;
mod record;

pub use member::{title_case, ActivityTag, AgeBracket, FamilyName, Gender, Member};
pub use phone::CanonicalPhone;
pub use record::{Record, ASSIGNED_COLUMNS, PENDING_COLUMNS};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Identity reported when no binary registered itself (tests, embedding hosts)
static EMBEDDED: ProcessId = ProcessId::Embedded;

/// Process identifier for any component in the system
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// Registration intake binary
    Intake,
    /// Family allocation binary
    Allocator,
    /// Library code running inside a host that never registered an identity
    Embedded,
}

impl ProcessId {
    /// Initialize the global process ID for the intake binary
    pub fn init_intake() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Intake)
    }

    /// Initialize the global process ID for the allocator binary
    pub fn init_allocator() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Allocator)
    }

    /// Get the global process ID, or `Embedded` if none was registered
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get().unwrap_or(&EMBEDDED)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Intake => write!(f, "intake"),
            ProcessId::Allocator => write!(f, "allocator"),
            ProcessId::Embedded => write!(f, "embedded"),
        }
    }
}
