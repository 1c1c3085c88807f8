use serde::{Deserialize, Serialize};

/// Who initiated a contact, once each source's vocabulary is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Firm-initiated.
    Outbound,
    /// Client-initiated.
    Inbound,
}

/// The interaction kinds that can trigger a stage evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    Email,
    WhatsApp,
    Manual,
    Call,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Email => "email",
            TriggerKind::WhatsApp => "whatsapp",
            TriggerKind::Manual => "manual",
            TriggerKind::Call => "call",
        }
    }
}

/// Where an interaction row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionSource {
    Emails,
    WhatsApp,
    LegacyInteractions,
    CallLogs,
    ManualInteractions,
}

impl InteractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionSource::Emails => "emails",
            InteractionSource::WhatsApp => "whatsapp_messages",
            InteractionSource::LegacyInteractions => "legacy_interactions",
            InteractionSource::CallLogs => "call_logs",
            InteractionSource::ManualInteractions => "manual_interactions",
        }
    }
}
