use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FailureKind;
use crate::models::{LeadRef, Stage};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum EventKind {
    Transitioned { from: Stage, to: Stage },
    Unchanged { stage: Stage },
    MissingIdentifier { trigger: String },
    SourceQueryFailed { source: String, message: String },
    StageFetchFailed { message: String },
    StageUpdateFailed { stage: Stage, message: String },
}

impl EventKind {
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            EventKind::Transitioned { .. } | EventKind::Unchanged { .. } => None,
            EventKind::MissingIdentifier { .. } => Some(FailureKind::MissingIdentifier),
            EventKind::SourceQueryFailed { .. } => Some(FailureKind::SourceQueryFailure),
            EventKind::StageFetchFailed { .. } => Some(FailureKind::StageFetchFailure),
            EventKind::StageUpdateFailed { .. } => Some(FailureKind::StageUpdateFailure),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineEvent {
    pub timestamp: DateTime<Utc>,
    /// Absent only when no identifier could be resolved.
    pub lead: Option<LeadRef>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureCounts {
    pub missing_identifier: u64,
    pub source_query: u64,
    pub stage_fetch: u64,
    pub stage_update: u64,
}

impl FailureCounts {
    pub fn count(&self, kind: FailureKind) -> u64 {
        match kind {
            FailureKind::MissingIdentifier => self.missing_identifier,
            FailureKind::SourceQueryFailure => self.source_query,
            FailureKind::StageFetchFailure => self.stage_fetch,
            FailureKind::StageUpdateFailure => self.stage_update,
        }
    }

    pub(super) fn increment(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::MissingIdentifier => self.missing_identifier += 1,
            FailureKind::SourceQueryFailure => self.source_query += 1,
            FailureKind::StageFetchFailure => self.stage_fetch += 1,
            FailureKind::StageUpdateFailure => self.stage_update += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSnapshot {
    pub recent_events: Vec<EngineEvent>,
    pub transition_count: u64,
    pub unchanged_count: u64,
    pub failures: FailureCounts,
}

impl EventSnapshot {
    pub fn failures_of(&self, kind: FailureKind) -> Vec<&EngineEvent> {
        self.recent_events
            .iter()
            .filter(|event| event.kind.failure_kind() == Some(kind))
            .collect()
    }
}
