//! Journal-backed event sink

use lendpool_ledger::{EventSink, LendingEvent, SinkError};
use std::path::Path;
use std::sync::Mutex;

use crate::error::EventError;
use crate::reader::EventReader;
use crate::record::EventRecord;
use crate::store::EventStore;

struct Journal {
    store: EventStore,
    next_sequence: u64,
}

/// Writes every published ledger event to an [`EventStore`].
///
/// Sequence numbering continues from whatever the directory already holds.
pub struct JournalSink {
    journal: Mutex<Journal>,
}

impl JournalSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let store = EventStore::new(path)?;
        let last = EventReader::from_directory(path)?.last_sequence()?;
        let next_sequence = last.map_or(1, |seq| seq + 1);

        tracing::info!(path = %path.display(), next_sequence, "Event journal opened");

        Ok(Self {
            journal: Mutex::new(Journal {
                store,
                next_sequence,
            }),
        })
    }

    /// Sequence the next record will get
    pub fn next_sequence(&self) -> Result<u64, EventError> {
        let journal = self.journal.lock().map_err(|_| EventError::Poisoned)?;
        Ok(journal.next_sequence)
    }

    /// Append one event and return its record
    pub fn record(&self, ledger_time: u64, event: &LendingEvent) -> Result<EventRecord, EventError> {
        let mut journal = self.journal.lock().map_err(|_| EventError::Poisoned)?;
        let record = EventRecord::new(journal.next_sequence, ledger_time, event.clone());
        journal.store.append(&record)?;
        journal.next_sequence += 1;
        Ok(record)
    }

    pub fn close(&self) -> Result<(), EventError> {
        let mut journal = self.journal.lock().map_err(|_| EventError::Poisoned)?;
        journal.store.close()
    }
}

impl EventSink for JournalSink {
    fn publish(&self, at: u64, event: &LendingEvent) -> Result<(), SinkError> {
        self.record(at, event)?;
        Ok(())
    }
}
