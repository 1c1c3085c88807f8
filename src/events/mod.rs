mod types;

pub use types::{EngineEvent, EventKind, EventSnapshot, FailureCounts};

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::TransitionError;
use crate::models::{LeadRef, Stage};

const MAX_RECENT_EVENTS: usize = 200;

/// Collects what the engine decided and what went wrong, so failures can be
/// queried after the fact instead of only showing up in the log.
pub struct EventLog {
    inner: Arc<Mutex<EventState>>,
}

#[derive(Default)]
struct EventState {
    recent_events: Vec<EngineEvent>,
    transition_count: u64,
    unchanged_count: u64,
    failures: FailureCounts,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventState {
                recent_events: Vec::with_capacity(MAX_RECENT_EVENTS),
                ..EventState::default()
            })),
        }
    }

    pub async fn record(&self, lead: Option<LeadRef>, kind: EventKind) {
        let mut state = self.inner.lock().await;

        match &kind {
            EventKind::Transitioned { .. } => state.transition_count += 1,
            EventKind::Unchanged { .. } => state.unchanged_count += 1,
            other => {
                if let Some(failure) = other.failure_kind() {
                    state.failures.increment(failure);
                }
            }
        }

        state.recent_events.push(EngineEvent {
            timestamp: Utc::now(),
            lead,
            kind,
        });

        if state.recent_events.len() > MAX_RECENT_EVENTS {
            state.recent_events.remove(0);
        }
    }

    pub async fn record_transition(&self, lead: LeadRef, from: Stage, to: Stage) {
        self.record(Some(lead), EventKind::Transitioned { from, to })
            .await;
    }

    pub async fn record_unchanged(&self, lead: LeadRef, stage: Stage) {
        self.record(Some(lead), EventKind::Unchanged { stage }).await;
    }

    pub async fn record_error(&self, err: &TransitionError) {
        let (lead, kind) = match err {
            TransitionError::MissingIdentifier { trigger } => (
                None,
                EventKind::MissingIdentifier {
                    trigger: trigger.to_string(),
                },
            ),
            TransitionError::SourceQuery {
                lead,
                source_name,
                message,
            } => (
                Some(*lead),
                EventKind::SourceQueryFailed {
                    source: source_name.to_string(),
                    message: message.clone(),
                },
            ),
            TransitionError::StageFetch { lead, .. } | TransitionError::LeadNotFound { lead } => (
                Some(*lead),
                EventKind::StageFetchFailed {
                    message: err.to_string(),
                },
            ),
            TransitionError::TaskJoin { lead, .. } => (
                *lead,
                EventKind::StageFetchFailed {
                    message: err.to_string(),
                },
            ),
            TransitionError::StageUpdate {
                lead,
                stage,
                message,
            } => (
                Some(*lead),
                EventKind::StageUpdateFailed {
                    stage: *stage,
                    message: message.clone(),
                },
            ),
        };

        self.record(lead, kind).await;
    }

    pub async fn snapshot(&self) -> EventSnapshot {
        let state = self.inner.lock().await;
        EventSnapshot {
            recent_events: state.recent_events.clone(),
            transition_count: state.transition_count,
            unchanged_count: state.unchanged_count,
            failures: state.failures.clone(),
        }
    }

    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        state.recent_events.clear();
        state.transition_count = 0;
        state.unchanged_count = 0;
        state.failures = FailureCounts::default();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventLog {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
