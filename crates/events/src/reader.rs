//! JSONL event reader - sequential replay of the journal

use crate::error::EventError;
use crate::record::EventRecord;
use lendpool_core::AccountId;
use lendpool_ledger::LendingEvent;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Reads every journal file in date order
pub struct EventReader {
    files: Vec<PathBuf>,
}

impl EventReader {
    /// Collect the `.jsonl` files under `path`; a missing directory is empty
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }
        files.sort();

        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Every record, oldest first
    pub fn read_all(&self) -> Result<Vec<EventRecord>, EventError> {
        let mut records = Vec::new();
        for file_path in &self.files {
            read_file(file_path, |record| records.push(record))?;
        }
        Ok(records)
    }

    /// Sequence number of the newest record
    pub fn last_sequence(&self) -> Result<Option<u64>, EventError> {
        let Some(last_file) = self.files.last() else {
            return Ok(None);
        };
        let mut last = None;
        read_file(last_file, |record| last = Some(record.sequence))?;
        Ok(last)
    }

    pub fn count(&self) -> Result<usize, EventError> {
        let mut count = 0;
        for file_path in &self.files {
            read_file(file_path, |_| count += 1)?;
        }
        Ok(count)
    }

    /// Records that mention `account` as actor, borrower or liquidator
    pub fn for_account(&self, account: &AccountId) -> Result<Vec<EventRecord>, EventError> {
        let mut records = self.read_all()?;
        records.retain(|record| involves(&record.event, account));
        Ok(records)
    }
}

fn read_file(path: &Path, mut visit: impl FnMut(EventRecord)) -> Result<(), EventError> {
    let reader = BufReader::new(File::open(path)?);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: EventRecord =
            serde_json::from_str(&line).map_err(|e| EventError::InvalidLine {
                path: path.display().to_string(),
                line: index + 1,
                reason: e.to_string(),
            })?;
        visit(record);
    }
    Ok(())
}

fn involves(event: &LendingEvent, id: &AccountId) -> bool {
    match event {
        LendingEvent::Supplied { account, .. }
        | LendingEvent::Withdrawn { account, .. }
        | LendingEvent::SupplyInterestAccrued { account, .. }
        | LendingEvent::CollateralDeposited { account, .. }
        | LendingEvent::CollateralWithdrawn { account, .. }
        | LendingEvent::Borrowed { account, .. }
        | LendingEvent::Repaid { account, .. }
        | LendingEvent::BorrowInterestAccrued { account, .. } => account == id,
        LendingEvent::Liquidated {
            borrower,
            liquidator,
            ..
        } => borrower == id || liquidator == id,
        LendingEvent::ParametersUpdated { .. } => false,
    }
}
