//! Entry points fired after an interaction has been recorded.
//!
//! Each adapter spawns the evaluation onto the engine's runtime and returns
//! immediately. Nothing an evaluation does can fail the caller; the returned
//! handle exists only for whoever wants to observe the result.

use std::sync::Arc;

use tokio::{runtime::Handle, task::JoinHandle};

use crate::error::{TransitionError, TransitionResult};
use crate::models::{LeadRef, TriggerIds, TriggerKind};

use super::engine::{StageEngine, TransitionOutcome};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Observer for one spawned evaluation. Dropping it detaches the task.
pub struct TriggerHandle {
    kind: TriggerKind,
    lead: Option<LeadRef>,
    task: JoinHandle<TransitionResult<TransitionOutcome>>,
}

impl TriggerHandle {
    pub fn kind(&self) -> TriggerKind {
        self.kind
    }

    /// `None` when the trigger carried no usable identifier.
    pub fn lead(&self) -> Option<LeadRef> {
        self.lead
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn outcome(self) -> TransitionResult<TransitionOutcome> {
        match self.task.await {
            Ok(result) => result,
            Err(err) => Err(TransitionError::TaskJoin {
                trigger: self.kind.as_str(),
                lead: self.lead,
                message: err.to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct Triggers {
    engine: Arc<StageEngine>,
    runtime: Handle,
}

impl Triggers {
    pub fn new(engine: Arc<StageEngine>, runtime: Handle) -> Self {
        Self { engine, runtime }
    }

    pub fn engine(&self) -> &Arc<StageEngine> {
        &self.engine
    }

    pub fn on_email(&self, ids: TriggerIds) -> TriggerHandle {
        self.fire(TriggerKind::Email, ids)
    }

    pub fn on_whatsapp(&self, ids: TriggerIds) -> TriggerHandle {
        self.fire(TriggerKind::WhatsApp, ids)
    }

    pub fn on_manual(&self, ids: TriggerIds) -> TriggerHandle {
        self.fire(TriggerKind::Manual, ids)
    }

    pub fn on_call(&self, ids: TriggerIds) -> TriggerHandle {
        self.fire(TriggerKind::Call, ids)
    }

    fn fire(&self, kind: TriggerKind, ids: TriggerIds) -> TriggerHandle {
        let lead = ids.resolve();
        let engine = Arc::clone(&self.engine);

        let task = self.runtime.spawn(async move {
            let Some(lead) = lead else {
                let err = TransitionError::missing_identifier(kind);
                log_warn!("{err} ({ids:?})");
                engine.events().record_error(&err).await;
                return Err(err);
            };

            let delay = engine.settings().delays.for_trigger(kind);
            log_debug!("{} trigger for {} in {:?}", kind.as_str(), lead, delay);
            engine.try_evaluate(lead, delay).await
        });

        TriggerHandle { kind, lead, task }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, EmailRecord};
    use crate::error::FailureKind;
    use crate::events::EventLog;
    use crate::models::{STAGE_ASSIGNED, STAGE_PRECOMMUNICATION};
    use crate::settings::{EngineSettings, TriggerDelays};
    use chrono::Utc;
    use std::time::Duration;

    fn triggers_for(db: &Database, delays: TriggerDelays) -> Triggers {
        let engine = StageEngine::new(
            Arc::new(db.clone()),
            EventLog::new(),
            EngineSettings {
                delays,
                ..EngineSettings::default()
            },
        );
        Triggers::new(Arc::new(engine), Handle::current())
    }

    #[tokio::test]
    async fn missing_identifier_is_logged_and_contained() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("crm.sqlite3")).unwrap();
        let triggers = triggers_for(&db, TriggerDelays::immediate());

        for handle in [
            triggers.on_email(TriggerIds::default()),
            triggers.on_whatsapp(TriggerIds::primary("")),
            triggers.on_manual(TriggerIds::primary("nobody")),
            triggers.on_call(TriggerIds::default()),
        ] {
            assert_eq!(handle.lead(), None);
            let err = handle.outcome().await.unwrap_err();
            assert_eq!(err.kind(), FailureKind::MissingIdentifier);
        }

        let snapshot = triggers.engine().events().snapshot().await;
        assert_eq!(snapshot.failures.missing_identifier, 4);
    }

    #[tokio::test]
    async fn email_trigger_evaluates_the_resolved_lead() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("crm.sqlite3")).unwrap();
        let lead = db.insert_legacy_lead("Ada", STAGE_ASSIGNED).await.unwrap();
        db.insert_email(&EmailRecord {
            id: None,
            legacy_lead_id: Some(lead.id),
            client_id: None,
            direction: "outgoing".into(),
            subject: Some("Intro".into()),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

        let triggers = triggers_for(&db, TriggerDelays::immediate());
        let handle = triggers.on_email(TriggerIds {
            primary: Some(lead.id.to_string()),
            legacy_id: Some(lead.id),
        });
        assert_eq!(handle.kind(), TriggerKind::Email);
        assert_eq!(handle.lead(), Some(LeadRef::Legacy(lead.id)));

        let outcome = handle.outcome().await.unwrap();
        assert_eq!(outcome, TransitionOutcome::advanced(STAGE_PRECOMMUNICATION));
        assert_eq!(
            db.get_legacy_stage(lead.id).await.unwrap(),
            Some(STAGE_PRECOMMUNICATION)
        );
    }

    #[tokio::test]
    async fn adapter_returns_before_evaluation_runs() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("crm.sqlite3")).unwrap();
        let lead = db.insert_legacy_lead("Ada", STAGE_ASSIGNED).await.unwrap();

        let triggers = triggers_for(
            &db,
            TriggerDelays {
                whatsapp_ms: 200,
                ..TriggerDelays::immediate()
            },
        );
        let handle = triggers.on_whatsapp(TriggerIds::legacy(lead.id));
        assert!(!handle.is_finished());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.is_finished());

        let outcome = handle.outcome().await.unwrap();
        assert_eq!(outcome, TransitionOutcome::unchanged(STAGE_ASSIGNED));
    }

    #[tokio::test]
    async fn panicked_task_is_reported_as_a_join_failure() {
        let unresolved = TriggerHandle {
            kind: TriggerKind::Manual,
            lead: None,
            task: tokio::spawn(async { panic!("evaluation blew up") }),
        };

        let err = unresolved.outcome().await.unwrap_err();
        assert!(matches!(
            err,
            TransitionError::TaskJoin {
                trigger: "manual",
                lead: None,
                ..
            }
        ));
        assert_eq!(err.kind(), FailureKind::StageFetchFailure);

        let resolved = TriggerHandle {
            kind: TriggerKind::Call,
            lead: Some(LeadRef::Legacy(8)),
            task: tokio::spawn(async { panic!("evaluation blew up") }),
        };
        assert!(matches!(
            resolved.outcome().await,
            Err(TransitionError::TaskJoin {
                lead: Some(LeadRef::Legacy(8)),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn unknown_lead_surfaces_only_through_the_handle() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("crm.sqlite3")).unwrap();
        let triggers = triggers_for(&db, TriggerDelays::immediate());

        let err = triggers
            .on_call(TriggerIds::legacy(404))
            .outcome()
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::LeadNotFound { .. }));
        assert_eq!(
            triggers.engine().events().snapshot().await.failures.stage_fetch,
            1
        );
    }
}
