//! Writes interactions and fires the matching stage trigger.
//!
//! The write is the user-facing action: its result is what callers get back.
//! The stage evaluation that follows is handed back only as an observer and
//! never changes that result.

use anyhow::{anyhow, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::db::{CallLog, Database, EmailRecord, LegacyInteraction, ManualInteraction, WhatsAppMessage};
use crate::models::{Direction, LeadRef, TriggerIds};
use crate::transitions::summary::{is_call_kind, Vocabulary, LEGACY_CALL_KIND};
use crate::transitions::{TriggerHandle, Triggers};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// A stored interaction and the stage evaluation it started.
pub struct Recorded {
    /// Row id of the new interaction. For manual interactions this is the
    /// entry's position in the lead's embedded list.
    pub row_id: i64,
    pub evaluation: TriggerHandle,
}

#[derive(Clone)]
pub struct Recorder {
    db: Database,
    triggers: Triggers,
}

impl Recorder {
    pub fn new(db: Database, triggers: Triggers) -> Self {
        Self { db, triggers }
    }

    pub async fn record_email(
        &self,
        lead: LeadRef,
        direction: Direction,
        subject: Option<&str>,
    ) -> Result<Recorded> {
        let (legacy_lead_id, client_id) = match lead {
            LeadRef::Legacy(id) => (Some(id), None),
            LeadRef::Client(id) => (None, Some(id.to_string())),
        };

        let row_id = self
            .db
            .insert_email(&EmailRecord {
                id: None,
                legacy_lead_id,
                client_id,
                direction: Vocabulary::Email.encode(direction).to_string(),
                subject: subject.map(str::to_string),
                created_at: Utc::now(),
            })
            .await?;

        log_info!("recorded email {} for {}", row_id, lead);
        Ok(Recorded {
            row_id,
            evaluation: self.triggers.on_email(lead.into()),
        })
    }

    pub async fn record_whatsapp(
        &self,
        lead: LeadRef,
        direction: Direction,
        body: Option<&str>,
    ) -> Result<Recorded> {
        let (legacy_lead_id, lead_id) = match lead {
            LeadRef::Legacy(id) => (Some(id), None),
            LeadRef::Client(id) => (None, Some(id.to_string())),
        };

        let row_id = self
            .db
            .insert_whatsapp_message(&WhatsAppMessage {
                id: None,
                legacy_lead_id,
                lead_id,
                direction: Vocabulary::Short.encode(direction).to_string(),
                body: body.map(str::to_string),
                created_at: Utc::now(),
            })
            .await?;

        log_info!("recorded whatsapp message {} for {}", row_id, lead);
        Ok(Recorded {
            row_id,
            evaluation: self.triggers.on_whatsapp(lead.into()),
        })
    }

    /// Telephony calls are only ever keyed by a legacy id.
    pub async fn record_call(
        &self,
        legacy_id: i64,
        direction: Option<Direction>,
        duration_secs: Option<i64>,
    ) -> Result<Recorded> {
        let row_id = self
            .db
            .insert_call_log(&CallLog {
                id: None,
                lead_id: legacy_id,
                direction: direction.map(|d| Vocabulary::FreeText.encode(d).to_string()),
                duration: duration_secs,
                created_at: Utc::now(),
            })
            .await?;

        log_info!("recorded call {} for legacy:{}", row_id, legacy_id);
        Ok(Recorded {
            row_id,
            evaluation: self.triggers.on_call(TriggerIds::legacy(legacy_id)),
        })
    }

    /// Manual entries live on new-schema leads only. `length` is free text
    /// such as `"3:30"` or `"5 min"`.
    pub async fn record_manual(
        &self,
        lead_id: Uuid,
        direction: Direction,
        kind: &str,
        length: Option<&str>,
    ) -> Result<Recorded> {
        let entry = ManualInteraction {
            direction: Vocabulary::Short.encode(direction).to_string(),
            kind: kind.to_string(),
            length: length.map(str::to_string),
        };
        let count = self.db.append_manual_interaction(lead_id, &entry).await?;
        log_info!("recorded manual {} interaction for lead:{}", kind, lead_id);

        Ok(Recorded {
            row_id: count as i64 - 1,
            evaluation: self.triggers.on_manual(TriggerIds::primary(lead_id.to_string())),
        })
    }

    /// Entries in the legacy contact log. Call-like kinds are stored as the
    /// log's call code and fire the call trigger; every other kind is stored
    /// as given and fires the manual one.
    pub async fn record_legacy_interaction(
        &self,
        legacy_id: i64,
        direction: Direction,
        kind: &str,
        minutes: Option<f64>,
    ) -> Result<Recorded> {
        if kind.trim().is_empty() {
            return Err(anyhow!("interaction kind must not be empty"));
        }

        let is_call = is_call_kind(kind);
        let stored_kind = if is_call { LEGACY_CALL_KIND } else { kind.trim() };

        let row_id = self
            .db
            .insert_legacy_interaction(&LegacyInteraction {
                id: None,
                lead_id: legacy_id,
                direction: Vocabulary::Letter.encode(direction).to_string(),
                kind: stored_kind.to_string(),
                minutes,
                created_at: Utc::now(),
            })
            .await?;

        let ids = TriggerIds::legacy(legacy_id);
        let evaluation = if is_call {
            self.triggers.on_call(ids)
        } else {
            self.triggers.on_manual(ids)
        };

        log_info!("recorded legacy interaction {} for legacy:{}", row_id, legacy_id);
        Ok(Recorded { row_id, evaluation })
    }
}
