//! Lendpool Events - JSONL event journal
//!
//! Committed ledger events are appended to daily JSONL files. The journal
//! is an audit trail for replay and inspection; ledger state never depends
//! on it.

pub mod error;
pub mod reader;
pub mod record;
pub mod sink;
pub mod store;

pub use error::EventError;
pub use reader::EventReader;
pub use record::EventRecord;
pub use sink::JournalSink;
pub use store::EventStore;
