//! Journal line format

use chrono::{DateTime, Utc};
use lendpool_ledger::LendingEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One committed event as written to the journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: Uuid,
    /// Gapless, starting at 1
    pub sequence: u64,
    /// Wall-clock time the record was written
    pub recorded_at: DateTime<Utc>,
    /// Ledger clock of the operation that produced the event
    pub ledger_time: u64,
    pub event: LendingEvent,
}

impl EventRecord {
    pub fn new(sequence: u64, ledger_time: u64, event: LendingEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence,
            recorded_at: Utc::now(),
            ledger_time,
            event,
        }
    }
}
