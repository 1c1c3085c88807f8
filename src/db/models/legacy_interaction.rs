use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic contact log used by the legacy schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyInteraction {
    pub id: Option<i64>,
    pub lead_id: i64,
    /// `o` or `i`.
    pub direction: String,
    /// Single-letter kind code; `c` is a call.
    pub kind: String,
    pub minutes: Option<f64>,
    pub created_at: DateTime<Utc>,
}
