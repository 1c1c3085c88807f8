use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row in `emails`. Legacy leads are linked through `legacy_lead_id`,
/// new-schema leads through `client_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRecord {
    pub id: Option<i64>,
    pub legacy_lead_id: Option<i64>,
    pub client_id: Option<String>,
    /// `outgoing` or `incoming`.
    pub direction: String,
    pub subject: Option<String>,
    pub created_at: DateTime<Utc>,
}
