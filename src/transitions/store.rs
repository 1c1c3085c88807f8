//! Schema-specific access to one lead.
//!
//! The engine never branches on which schema a lead lives in. A `LeadRef` is
//! turned into a `LeadStore` once, by a `LeadDirectory`, and everything after
//! that goes through the trait.

use anyhow::{Context, Result};
use async_trait::async_trait;
use uuid::Uuid;

use crate::db::Database;
use crate::models::{InteractionSource, LeadRef, Stage};

use super::summary::InteractionRecord;

/// Rows from one interaction source, or the reason they could not be read.
#[derive(Debug)]
pub struct SourceBatch {
    pub source: InteractionSource,
    pub rows: Result<Vec<InteractionRecord>>,
}

impl SourceBatch {
    fn from_query<T>(source: InteractionSource, result: Result<Vec<T>>) -> Self
    where
        for<'a> InteractionRecord: From<&'a T>,
    {
        Self {
            source,
            rows: result
                .map(|rows| rows.iter().map(InteractionRecord::from).collect())
                .with_context(|| format!("failed to query {}", source.as_str())),
        }
    }
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    fn lead(&self) -> LeadRef;

    /// `Ok(None)` when the lead row does not exist.
    async fn fetch_stage(&self) -> Result<Option<Stage>>;

    /// One batch per source this schema has. Individual sources may fail
    /// without affecting the others.
    async fn fetch_interactions(&self) -> Vec<SourceBatch>;

    async fn update_stage(&self, stage: Stage) -> Result<()>;
}

/// Resolves a lead identifier to the store that owns it.
#[async_trait]
pub trait LeadDirectory: Send + Sync {
    fn store_for(&self, lead: LeadRef) -> Box<dyn LeadStore>;

    /// Leads the engine could still move forward.
    async fn open_leads(&self) -> Result<Vec<LeadRef>>;
}

pub struct LegacyLeadStore {
    db: Database,
    lead_id: i64,
}

impl LegacyLeadStore {
    pub fn new(db: Database, lead_id: i64) -> Self {
        Self { db, lead_id }
    }
}

#[async_trait]
impl LeadStore for LegacyLeadStore {
    fn lead(&self) -> LeadRef {
        LeadRef::Legacy(self.lead_id)
    }

    async fn fetch_stage(&self) -> Result<Option<Stage>> {
        self.db.get_legacy_stage(self.lead_id).await
    }

    async fn fetch_interactions(&self) -> Vec<SourceBatch> {
        let (emails, whatsapp, interactions, calls) = tokio::join!(
            self.db.get_emails_for_legacy_lead(self.lead_id),
            self.db.get_whatsapp_for_legacy_lead(self.lead_id),
            self.db.get_legacy_interactions(self.lead_id),
            self.db.get_call_logs(self.lead_id),
        );

        vec![
            SourceBatch::from_query(InteractionSource::Emails, emails),
            SourceBatch::from_query(InteractionSource::WhatsApp, whatsapp),
            SourceBatch::from_query(InteractionSource::LegacyInteractions, interactions),
            SourceBatch::from_query(InteractionSource::CallLogs, calls),
        ]
    }

    async fn update_stage(&self, stage: Stage) -> Result<()> {
        self.db.set_legacy_stage(self.lead_id, stage).await
    }
}

/// New-schema lead. The call-log store only knows numeric ids, so it is not
/// consulted here.
pub struct ClientLeadStore {
    db: Database,
    lead_id: Uuid,
}

impl ClientLeadStore {
    pub fn new(db: Database, lead_id: Uuid) -> Self {
        Self { db, lead_id }
    }
}

#[async_trait]
impl LeadStore for ClientLeadStore {
    fn lead(&self) -> LeadRef {
        LeadRef::Client(self.lead_id)
    }

    async fn fetch_stage(&self) -> Result<Option<Stage>> {
        self.db.get_client_stage(self.lead_id).await
    }

    async fn fetch_interactions(&self) -> Vec<SourceBatch> {
        let key = self.lead_id.to_string();
        let (emails, whatsapp, manual) = tokio::join!(
            self.db.get_emails_for_client(&key),
            self.db.get_whatsapp_for_lead(&key),
            self.db.get_manual_interactions(self.lead_id),
        );

        vec![
            SourceBatch::from_query(InteractionSource::Emails, emails),
            SourceBatch::from_query(InteractionSource::WhatsApp, whatsapp),
            SourceBatch::from_query(InteractionSource::ManualInteractions, manual),
        ]
    }

    async fn update_stage(&self, stage: Stage) -> Result<()> {
        self.db.set_client_stage(self.lead_id, stage).await
    }
}

#[async_trait]
impl LeadDirectory for Database {
    fn store_for(&self, lead: LeadRef) -> Box<dyn LeadStore> {
        match lead {
            LeadRef::Legacy(id) => Box::new(LegacyLeadStore::new(self.clone(), id)),
            LeadRef::Client(id) => Box::new(ClientLeadStore::new(self.clone(), id)),
        }
    }

    async fn open_leads(&self) -> Result<Vec<LeadRef>> {
        self.list_open_leads().await
    }
}
