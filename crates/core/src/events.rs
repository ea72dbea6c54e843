//! Display-only log of contract events for the active session.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// One event emitted by a state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEvent {
    pub name: String,
    pub transaction_hash: String,
    pub block_number: u64,
}

impl fmt::Display for ContractEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.transaction_hash)
    }
}

/// A page of events and the cursor for the next poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBatch {
    pub events: Vec<ContractEvent>,
    pub next_cursor: u64,
}

/// An event as appended to the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedEvent {
    #[serde(flatten)]
    pub event: ContractEvent,
    /// RFC 3339 time at which the client appended the event.
    pub received_at: String,
}

/// Append-only, emission-ordered event log.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<LoggedEvent>,
    cursor: u64,
}

impl EventLog {
    /// Start a log that only shows events from block `cursor` onwards.
    pub fn starting_at(cursor: u64) -> Self {
        Self {
            entries: Vec::new(),
            cursor,
        }
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Append a batch, keeping the order in which it was emitted. Returns the
    /// number of events appended.
    pub fn append(&mut self, batch: EventBatch) -> usize {
        let received_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let count = batch.events.len();
        self.entries
            .extend(batch.events.into_iter().map(|event| LoggedEvent {
                event,
                received_at: received_at.clone(),
            }));
        self.cursor = self.cursor.max(batch.next_cursor);
        count
    }

    pub fn entries(&self) -> &[LoggedEvent] {
        &self.entries
    }

    /// Display lines, one per event.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.event.to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
