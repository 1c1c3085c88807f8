use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{InteractionSource, LeadRef, Stage, TriggerKind};

/// Everything that can go wrong while evaluating a lead. None of these ever
/// reach the code path that recorded the triggering interaction.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("{trigger} trigger received no usable lead identifier")]
    MissingIdentifier { trigger: &'static str },

    #[error("{source_name} query failed for {lead}: {message}")]
    SourceQuery {
        lead: LeadRef,
        source_name: &'static str,
        message: String,
    },

    #[error("failed to read stage for {lead}: {message}")]
    StageFetch { lead: LeadRef, message: String },

    #[error("{lead} does not exist")]
    LeadNotFound { lead: LeadRef },

    #[error("failed to persist stage {stage} for {lead}: {message}")]
    StageUpdate {
        lead: LeadRef,
        stage: Stage,
        message: String,
    },

    #[error("{trigger} evaluation task did not complete: {message}")]
    TaskJoin {
        trigger: &'static str,
        /// `None` when the trigger carried no usable identifier.
        lead: Option<LeadRef>,
        message: String,
    },
}

/// Coarse failure buckets, used for counting and filtering events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    MissingIdentifier,
    SourceQueryFailure,
    StageFetchFailure,
    StageUpdateFailure,
}

impl TransitionError {
    pub fn missing_identifier(trigger: TriggerKind) -> Self {
        TransitionError::MissingIdentifier {
            trigger: trigger.as_str(),
        }
    }

    pub fn source_query(lead: LeadRef, source: InteractionSource, err: &anyhow::Error) -> Self {
        TransitionError::SourceQuery {
            lead,
            source_name: source.as_str(),
            message: format!("{err:#}"),
        }
    }

    /// A join failure means the evaluation died before persisting anything,
    /// which is indistinguishable from a failed stage read.
    pub fn kind(&self) -> FailureKind {
        match self {
            TransitionError::MissingIdentifier { .. } => FailureKind::MissingIdentifier,
            TransitionError::SourceQuery { .. } => FailureKind::SourceQueryFailure,
            TransitionError::StageFetch { .. }
            | TransitionError::LeadNotFound { .. }
            | TransitionError::TaskJoin { .. } => FailureKind::StageFetchFailure,
            TransitionError::StageUpdate { .. } => FailureKind::StageUpdateFailure,
        }
    }
}

pub type TransitionResult<T> = std::result::Result<T, TransitionError>;
