//! Lead rows for both schemas.
//!
//! `LegacyLead` lives in `legacy_leads` and is keyed by a numeric id.
//! `ClientLead` lives in `leads`, is keyed by a UUID and carries its manually
//! logged contacts as an embedded JSON array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Stage;

use super::ManualInteraction;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLead {
    pub id: i64,
    pub name: String,
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLead {
    pub id: Uuid,
    pub legacy_id: Option<i64>,
    pub name: String,
    pub stage: Stage,
    pub manual_interactions: Vec<ManualInteraction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
