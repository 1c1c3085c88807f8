use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppMessage {
    pub id: Option<i64>,
    pub legacy_lead_id: Option<i64>,
    pub lead_id: Option<String>,
    /// `out` or `in`.
    pub direction: String,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}
