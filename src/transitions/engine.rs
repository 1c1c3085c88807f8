use std::{sync::Arc, time::Duration};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::{TransitionError, TransitionResult};
use crate::events::EventLog;
use crate::models::{LeadRef, Stage};
use crate::settings::EngineSettings;

use super::aggregator::aggregate;
use super::predicates::target_stage;
use super::store::LeadDirectory;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

/// Result of one evaluation. `new_stage` is the stage the lead is at
/// afterwards, or `None` when the evaluation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub updated: bool,
    pub new_stage: Option<Stage>,
}

impl TransitionOutcome {
    pub fn advanced(stage: Stage) -> Self {
        Self {
            updated: true,
            new_stage: Some(stage),
        }
    }

    pub fn unchanged(stage: Stage) -> Self {
        Self {
            updated: false,
            new_stage: Some(stage),
        }
    }

    pub fn failed() -> Self {
        Self {
            updated: false,
            new_stage: None,
        }
    }
}

/// Decides and persists interaction-driven stage moves.
///
/// Every call re-reads the stage and only ever writes a higher one, so
/// repeated or overlapping calls for the same lead converge on the same value
/// without locking.
pub struct StageEngine {
    directory: Arc<dyn LeadDirectory>,
    events: EventLog,
    settings: EngineSettings,
}

impl StageEngine {
    pub fn new(directory: Arc<dyn LeadDirectory>, events: EventLog, settings: EngineSettings) -> Self {
        Self {
            directory,
            events,
            settings,
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Waits `delay`, then evaluates the lead. Failures are logged and
    /// reported as `{updated: false, newStage: null}`.
    pub async fn evaluate_and_update_stage(&self, lead: LeadRef, delay: Duration) -> TransitionOutcome {
        match self.try_evaluate(lead, delay).await {
            Ok(outcome) => outcome,
            Err(_) => TransitionOutcome::failed(),
        }
    }

    /// Same as `evaluate_and_update_stage` with the configured default delay.
    pub async fn evaluate(&self, lead: LeadRef) -> TransitionOutcome {
        self.evaluate_and_update_stage(lead, self.settings.delays.default_delay())
            .await
    }

    /// Evaluation with the failure kept. Every error is already logged and
    /// recorded in the event log by the time it is returned.
    pub async fn try_evaluate(
        &self,
        lead: LeadRef,
        delay: Duration,
    ) -> TransitionResult<TransitionOutcome> {
        let result = self.run(lead, delay).await;
        match &result {
            Ok(outcome) if outcome.updated => {
                log_info!("{} advanced to stage {:?}", lead, outcome.new_stage);
            }
            Ok(outcome) => {
                log_debug!("{} left at stage {:?}", lead, outcome.new_stage);
            }
            Err(err) => {
                log_error!("stage evaluation failed: {err}");
                self.events.record_error(err).await;
            }
        }
        result
    }

    async fn run(&self, lead: LeadRef, delay: Duration) -> TransitionResult<TransitionOutcome> {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let store = self.directory.store_for(lead);

        let current_stage = match store.fetch_stage().await {
            Ok(Some(stage)) => stage,
            Ok(None) => return Err(TransitionError::LeadNotFound { lead }),
            Err(err) => {
                return Err(TransitionError::StageFetch {
                    lead,
                    message: format!("{err:#}"),
                })
            }
        };

        let summary = aggregate(store.as_ref(), &self.events, self.settings.long_call_minutes).await;
        log_debug!("{} at stage {}: {:?}", lead, current_stage, summary);

        let Some(target) = target_stage(&summary, current_stage) else {
            self.events.record_unchanged(lead, current_stage).await;
            return Ok(TransitionOutcome::unchanged(current_stage));
        };

        if let Err(err) = store.update_stage(target).await {
            return Err(TransitionError::StageUpdate {
                lead,
                stage: target,
                message: format!("{err:#}"),
            });
        }

        self.events
            .record_transition(lead, current_stage, target)
            .await;
        Ok(TransitionOutcome::advanced(target))
    }

    /// Re-evaluates every lead that can still move, without delay. Picks up
    /// transitions whose trigger was lost, e.g. across a restart.
    pub async fn sweep_open_leads(&self) -> Result<Vec<(LeadRef, TransitionOutcome)>> {
        let leads = self.directory.open_leads().await?;
        log_info!("sweeping {} open leads", leads.len());

        let mut outcomes = Vec::with_capacity(leads.len());
        for lead in leads {
            let outcome = self.evaluate_and_update_stage(lead, Duration::ZERO).await;
            outcomes.push((lead, outcome));
        }

        let advanced = outcomes.iter().filter(|(_, outcome)| outcome.updated).count();
        log_info!("sweep advanced {} of {} leads", advanced, outcomes.len());
        Ok(outcomes)
    }
}
