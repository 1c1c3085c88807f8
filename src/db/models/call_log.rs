use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Telephony call record. Only ever keyed by a legacy numeric lead id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    pub id: Option<i64>,
    pub lead_id: i64,
    /// Free text as delivered by the telephony provider.
    pub direction: Option<String>,
    /// Call length in seconds.
    pub duration: Option<i64>,
    pub created_at: DateTime<Utc>,
}
