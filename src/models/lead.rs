use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Integer pipeline position stored on both lead tables.
pub type Stage = i64;

pub const STAGE_NEW: Stage = 0;
pub const STAGE_ASSIGNED: Stage = 10;
/// One-directional contact has happened.
pub const STAGE_PRECOMMUNICATION: Stage = 11;
/// Two-way contact including a call longer than the long-call threshold.
pub const STAGE_COMMUNICATION_STARTED: Stage = 15;

/// Identifies a lead in exactly one of the two schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "schema", content = "id")]
pub enum LeadRef {
    /// Row in `legacy_leads`, keyed by a numeric id.
    Legacy(i64),
    /// Row in `leads`, keyed by a UUID.
    Client(Uuid),
}

impl LeadRef {
    /// Parses a free-form identifier: UUIDs select the new schema, integers
    /// the legacy one.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(uuid) = Uuid::parse_str(trimmed) {
            return Some(LeadRef::Client(uuid));
        }
        trimmed.parse::<i64>().ok().map(LeadRef::Legacy)
    }
}

/// The identifiers a trigger receives: the interaction's primary lead id,
/// which may be either a UUID or a numeric id, and the lead's legacy id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerIds {
    pub primary: Option<String>,
    pub legacy_id: Option<i64>,
}

impl TriggerIds {
    pub fn primary(id: impl Into<String>) -> Self {
        Self {
            primary: Some(id.into()),
            legacy_id: None,
        }
    }

    pub fn legacy(id: i64) -> Self {
        Self {
            primary: None,
            legacy_id: Some(id),
        }
    }

    /// A parseable primary id wins; otherwise the legacy id is used.
    pub fn resolve(&self) -> Option<LeadRef> {
        self.primary
            .as_deref()
            .and_then(LeadRef::parse)
            .or_else(|| self.legacy_id.map(LeadRef::Legacy))
    }
}

impl From<LeadRef> for TriggerIds {
    fn from(lead: LeadRef) -> Self {
        match lead {
            LeadRef::Legacy(id) => TriggerIds::legacy(id),
            LeadRef::Client(id) => TriggerIds::primary(id.to_string()),
        }
    }
}

impl fmt::Display for LeadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeadRef::Legacy(id) => write!(f, "legacy:{id}"),
            LeadRef::Client(id) => write!(f, "lead:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefers_uuid_then_integer() {
        let uuid = Uuid::new_v4();
        assert_eq!(LeadRef::parse(&uuid.to_string()), Some(LeadRef::Client(uuid)));
        assert_eq!(LeadRef::parse(" 42 "), Some(LeadRef::Legacy(42)));
        assert_eq!(LeadRef::parse(""), None);
        assert_eq!(LeadRef::parse("not-an-id"), None);
    }

    #[test]
    fn trigger_ids_fall_back_to_legacy_id() {
        let uuid = Uuid::new_v4();
        let both = TriggerIds {
            primary: Some(uuid.to_string()),
            legacy_id: Some(3),
        };
        assert_eq!(both.resolve(), Some(LeadRef::Client(uuid)));

        let unusable_primary = TriggerIds {
            primary: Some("   ".into()),
            legacy_id: Some(3),
        };
        assert_eq!(unusable_primary.resolve(), Some(LeadRef::Legacy(3)));

        assert_eq!(TriggerIds::primary("12").resolve(), Some(LeadRef::Legacy(12)));
        assert_eq!(TriggerIds::default().resolve(), None);
        assert_eq!(TriggerIds::primary("bogus").resolve(), None);
    }

    #[test]
    fn display_names_the_schema() {
        assert_eq!(LeadRef::Legacy(7).to_string(), "legacy:7");
        assert!(LeadRef::Client(Uuid::nil()).to_string().starts_with("lead:"));
    }
}
