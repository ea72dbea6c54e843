//! A user session: the artwork under inspection, the status region and the
//! event log, driven through a [`LifecycleClient`].

use serde::Serialize;

use crate::client::{LifecycleClient, Request};
use crate::error::LifecycleError;
use crate::events::EventLog;
use crate::record::ArtworkRecord;
use crate::state::LifecycleState;

/// The single status region. Exactly one message is visible at a time:
/// either the artwork's state label or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Status {
    #[default]
    Empty,
    State(String),
    Error(String),
}

impl Status {
    /// The status shown for a state. `Unknown` is shown as an error.
    pub fn for_state(state: LifecycleState) -> Status {
        if state.is_known() {
            Status::State(state.label().to_string())
        } else {
            Status::Error(state.label().to_string())
        }
    }

    pub fn for_error(err: &LifecycleError) -> Status {
        match err {
            LifecycleError::NotFound { .. } => Status::Error("Artwork not found".to_string()),
            other => Status::Error(other.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Status::Empty => "",
            Status::State(m) | Status::Error(m) => m,
        }
    }
}

/// Holds the record currently under inspection and applies operation
/// outcomes to it:
/// - success replaces the record and shows its state label
/// - `NotFound` resets the record to empty
/// - any other error leaves the record at its last confirmed value
pub struct LifecycleSession {
    client: LifecycleClient,
    record: ArtworkRecord,
    status: Status,
    events: EventLog,
}

impl LifecycleSession {
    pub fn new(client: LifecycleClient) -> Self {
        Self {
            client,
            record: ArtworkRecord::empty(),
            status: Status::Empty,
            events: EventLog::default(),
        }
    }

    /// Show only events from block `cursor` onwards.
    pub fn with_event_cursor(mut self, cursor: u64) -> Self {
        self.events = EventLog::starting_at(cursor);
        self
    }

    pub fn record(&self) -> &ArtworkRecord {
        &self.record
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn client(&self) -> &LifecycleClient {
        &self.client
    }

    /// Discard the current record and clear the status region.
    pub fn reset(&mut self) {
        self.record = ArtworkRecord::empty();
        self.status = Status::Empty;
    }

    /// Run one request against the current record. Errors never escape:
    /// they are converted into the status region and also returned for
    /// callers that want to branch on them.
    pub async fn run(&mut self, request: Request) -> Result<&ArtworkRecord, LifecycleError> {
        match self.client.dispatch(&self.record, request).await {
            Ok(updated) => {
                self.status = Status::for_state(updated.state);
                self.record = updated;
                Ok(&self.record)
            }
            Err(err) => {
                if matches!(err, LifecycleError::NotFound { .. }) {
                    self.reset();
                }
                self.status = Status::for_error(&err);
                Err(err)
            }
        }
    }

    /// Pull new contract events into the session log.
    pub async fn refresh_events(&mut self) -> Result<usize, LifecycleError> {
        match self.client.poll_events(&mut self.events).await {
            Ok(count) => Ok(count),
            Err(err) => {
                self.status = Status::for_error(&err);
                Err(err)
            }
        }
    }
}
