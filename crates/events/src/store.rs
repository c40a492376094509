//! JSONL event store - append-only writer
//!
//! One file per UTC day, named `YYYY-MM-DD.jsonl` after the day the
//! records were written. Every append is flushed before it returns.

use crate::error::EventError;
use crate::record::EventRecord;
use chrono::{NaiveDate, Utc};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The day file currently open for appending
struct Segment {
    day: NaiveDate,
    writer: BufWriter<File>,
}

/// Append-only journal directory
pub struct EventStore {
    base_path: PathBuf,
    segment: Option<Segment>,
}

impl EventStore {
    /// Open a store rooted at `base_path`, creating the directory
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, EventError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            segment: None,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Append one record to the file of its `recorded_at` day
    pub fn append(&mut self, record: &EventRecord) -> Result<(), EventError> {
        let line = serde_json::to_string(record)?;
        let writer = self.writer_for(record.recorded_at.date_naive())?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::debug!(
            sequence = record.sequence,
            event = record.event.kind(),
            "Event journaled"
        );
        Ok(())
    }

    fn writer_for(&mut self, day: NaiveDate) -> Result<&mut BufWriter<File>, EventError> {
        if !matches!(self.segment, Some(ref segment) if segment.day == day) {
            self.close()?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.day_path(day))?;
            tracing::debug!(%day, "Journal segment opened");
            self.segment = Some(Segment {
                day,
                writer: BufWriter::new(file),
            });
        }
        match self.segment {
            Some(ref mut segment) => Ok(&mut segment.writer),
            None => unreachable!("segment opened above"),
        }
    }

    fn day_path(&self, day: NaiveDate) -> PathBuf {
        self.base_path.join(format!("{}.jsonl", day.format("%Y-%m-%d")))
    }

    /// File that records written right now land in
    pub fn today_file_path(&self) -> PathBuf {
        self.day_path(Utc::now().date_naive())
    }

    /// Flush and release the open day file
    pub fn close(&mut self) -> Result<(), EventError> {
        if let Some(mut segment) = self.segment.take() {
            segment.writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for EventStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendpool_ledger::LendingEvent;

    fn record(sequence: u64) -> EventRecord {
        EventRecord::new(
            sequence,
            1_700_000_000,
            LendingEvent::CollateralDeposited {
                account: "alice".parse().unwrap(),
                amount: lendpool_core::Amount::new(1),
            },
        )
    }

    #[test]
    fn test_append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EventStore::new(dir.path()).unwrap();

        store.append(&record(1)).unwrap();
        store.append(&record(2)).unwrap();

        let content = fs::read_to_string(store.today_file_path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(store.base_path(), dir.path());
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = EventStore::new(dir.path()).unwrap();
            store.append(&record(1)).unwrap();
        }
        let mut store = EventStore::new(dir.path()).unwrap();
        store.append(&record(2)).unwrap();
        store.close().unwrap();

        let content = fs::read_to_string(store.today_file_path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
