use serde::{Deserialize, Serialize};

use crate::db::{CallLog, EmailRecord, LegacyInteraction, ManualInteraction, WhatsAppMessage};
use crate::models::Direction;

use super::duration::parse_duration;

/// The direction spellings used by the different interaction stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
    /// `outgoing` / `incoming` (emails).
    Email,
    /// `out` / `in` (WhatsApp, manual interactions).
    Short,
    /// `o` / `i` (legacy interaction log).
    Letter,
    /// Provider free text (call logs): either long or short spelling.
    FreeText,
}

impl Vocabulary {
    pub fn decode(&self, raw: &str) -> Option<Direction> {
        let value = raw.trim().to_ascii_lowercase();
        let (outbound, inbound): (&[&str], &[&str]) = match self {
            Vocabulary::Email => (&["outgoing"][..], &["incoming"][..]),
            Vocabulary::Short => (&["out"][..], &["in"][..]),
            Vocabulary::Letter => (&["o"][..], &["i"][..]),
            Vocabulary::FreeText => (&["outgoing", "out"][..], &["incoming", "in"][..]),
        };

        if outbound.contains(&value.as_str()) {
            Some(Direction::Outbound)
        } else if inbound.contains(&value.as_str()) {
            Some(Direction::Inbound)
        } else {
            None
        }
    }

    pub fn encode(&self, direction: Direction) -> &'static str {
        match (self, direction) {
            (Vocabulary::Email | Vocabulary::FreeText, Direction::Outbound) => "outgoing",
            (Vocabulary::Email | Vocabulary::FreeText, Direction::Inbound) => "incoming",
            (Vocabulary::Short, Direction::Outbound) => "out",
            (Vocabulary::Short, Direction::Inbound) => "in",
            (Vocabulary::Letter, Direction::Outbound) => "o",
            (Vocabulary::Letter, Direction::Inbound) => "i",
        }
    }
}

/// Kind code the legacy log uses for phone calls.
pub const LEGACY_CALL_KIND: &str = "c";

/// Manual interaction kinds that describe a phone call.
pub fn is_call_kind(kind: &str) -> bool {
    let kind = kind.trim().to_ascii_lowercase();
    kind == LEGACY_CALL_KIND || kind == "phone" || kind.contains("call")
}

/// One interaction row, reduced to the fields the stage rules look at.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionRecord {
    Email {
        direction: String,
    },
    WhatsApp {
        direction: String,
    },
    LegacyGeneric {
        direction: String,
        kind: String,
        minutes: Option<f64>,
    },
    CallLog {
        direction: Option<String>,
        duration_secs: Option<i64>,
    },
    Manual {
        direction: String,
        kind: String,
        length: Option<String>,
    },
}

impl InteractionRecord {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            InteractionRecord::Email { direction } => Vocabulary::Email.decode(direction),
            InteractionRecord::WhatsApp { direction } => Vocabulary::Short.decode(direction),
            InteractionRecord::LegacyGeneric { direction, .. } => {
                Vocabulary::Letter.decode(direction)
            }
            InteractionRecord::CallLog { direction, .. } => direction
                .as_deref()
                .and_then(|raw| Vocabulary::FreeText.decode(raw)),
            InteractionRecord::Manual { direction, .. } => Vocabulary::Short.decode(direction),
        }
    }

    /// Length in minutes when the record is a call, `None` otherwise.
    /// A call with an unknown or unparseable length counts as zero minutes.
    pub fn call_minutes(&self) -> Option<f64> {
        match self {
            InteractionRecord::LegacyGeneric { kind, minutes, .. }
                if kind.trim().eq_ignore_ascii_case(LEGACY_CALL_KIND) =>
            {
                Some(minutes.unwrap_or(0.0))
            }
            InteractionRecord::CallLog { duration_secs, .. } => {
                Some(duration_secs.unwrap_or(0) as f64 / 60.0)
            }
            InteractionRecord::Manual { kind, length, .. } if is_call_kind(kind) => {
                Some(length.as_deref().map(parse_duration).unwrap_or(0.0))
            }
            _ => None,
        }
    }
}

impl From<&EmailRecord> for InteractionRecord {
    fn from(email: &EmailRecord) -> Self {
        InteractionRecord::Email {
            direction: email.direction.clone(),
        }
    }
}

impl From<&WhatsAppMessage> for InteractionRecord {
    fn from(message: &WhatsAppMessage) -> Self {
        InteractionRecord::WhatsApp {
            direction: message.direction.clone(),
        }
    }
}

impl From<&LegacyInteraction> for InteractionRecord {
    fn from(interaction: &LegacyInteraction) -> Self {
        InteractionRecord::LegacyGeneric {
            direction: interaction.direction.clone(),
            kind: interaction.kind.clone(),
            minutes: interaction.minutes,
        }
    }
}

impl From<&CallLog> for InteractionRecord {
    fn from(call: &CallLog) -> Self {
        InteractionRecord::CallLog {
            direction: call.direction.clone(),
            duration_secs: call.duration,
        }
    }
}

impl From<&ManualInteraction> for InteractionRecord {
    fn from(interaction: &ManualInteraction) -> Self {
        InteractionRecord::Manual {
            direction: interaction.direction.clone(),
            kind: interaction.kind.clone(),
            length: interaction.length.clone(),
        }
    }
}

/// What a lead's communication history amounts to. Rebuilt on every
/// evaluation and never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSummary {
    pub has_outbound: bool,
    pub has_inbound: bool,
    pub has_call_over_2_min: bool,
    pub has_any_interaction: bool,
}

impl InteractionSummary {
    /// Folds one record in. Every flag is an OR, so the order records arrive
    /// in never matters.
    pub fn absorb(&mut self, record: &InteractionRecord, long_call_minutes: f64) {
        self.has_any_interaction = true;

        match record.direction() {
            Some(Direction::Outbound) => self.has_outbound = true,
            Some(Direction::Inbound) => self.has_inbound = true,
            None => {}
        }

        if let Some(minutes) = record.call_minutes() {
            if minutes > long_call_minutes {
                self.has_call_over_2_min = true;
            }
        }
    }

    /// Exactly one direction has been seen.
    pub fn is_one_directional(&self) -> bool {
        self.has_outbound != self.has_inbound
    }

    pub fn is_bidirectional(&self) -> bool {
        self.has_outbound && self.has_inbound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual(direction: &str, kind: &str, length: Option<&str>) -> InteractionRecord {
        InteractionRecord::Manual {
            direction: direction.into(),
            kind: kind.into(),
            length: length.map(Into::into),
        }
    }

    #[test]
    fn each_source_speaks_its_own_vocabulary() {
        let outgoing_email = InteractionRecord::Email {
            direction: "outgoing".into(),
        };
        let short_email = InteractionRecord::Email {
            direction: "out".into(),
        };
        let whatsapp_in = InteractionRecord::WhatsApp {
            direction: "in".into(),
        };
        let legacy_out = InteractionRecord::LegacyGeneric {
            direction: "o".into(),
            kind: "e".into(),
            minutes: None,
        };

        assert_eq!(outgoing_email.direction(), Some(Direction::Outbound));
        assert_eq!(short_email.direction(), None);
        assert_eq!(whatsapp_in.direction(), Some(Direction::Inbound));
        assert_eq!(legacy_out.direction(), Some(Direction::Outbound));
    }

    #[test]
    fn call_log_direction_accepts_both_spellings() {
        for (raw, expected) in [
            ("Outgoing", Some(Direction::Outbound)),
            ("out", Some(Direction::Outbound)),
            (" INCOMING ", Some(Direction::Inbound)),
            ("in", Some(Direction::Inbound)),
            ("missed", None),
        ] {
            let call = InteractionRecord::CallLog {
                direction: Some(raw.into()),
                duration_secs: Some(10),
            };
            assert_eq!(call.direction(), expected, "direction {raw:?}");
        }

        let unknown = InteractionRecord::CallLog {
            direction: None,
            duration_secs: None,
        };
        assert_eq!(unknown.direction(), None);
        assert_eq!(unknown.call_minutes(), Some(0.0));
    }

    #[test]
    fn vocabularies_round_trip() {
        for vocabulary in [
            Vocabulary::Email,
            Vocabulary::Short,
            Vocabulary::Letter,
            Vocabulary::FreeText,
        ] {
            for direction in [Direction::Outbound, Direction::Inbound] {
                assert_eq!(vocabulary.decode(vocabulary.encode(direction)), Some(direction));
            }
        }
    }

    #[test]
    fn long_call_threshold_is_strict() {
        let mut summary = InteractionSummary::default();
        summary.absorb(
            &InteractionRecord::CallLog {
                direction: Some("outgoing".into()),
                duration_secs: Some(120),
            },
            2.0,
        );
        assert!(!summary.has_call_over_2_min);
        assert!(summary.has_outbound && summary.has_any_interaction);
        assert!(summary.is_one_directional());

        summary.absorb(
            &InteractionRecord::CallLog {
                direction: Some("outgoing".into()),
                duration_secs: Some(121),
            },
            2.0,
        );
        assert!(summary.has_call_over_2_min);
    }

    #[test]
    fn legacy_minutes_only_count_for_calls() {
        let mut summary = InteractionSummary::default();
        summary.absorb(
            &InteractionRecord::LegacyGeneric {
                direction: "i".into(),
                kind: "m".into(),
                minutes: Some(30.0),
            },
            2.0,
        );
        assert!(!summary.has_call_over_2_min);

        summary.absorb(
            &InteractionRecord::LegacyGeneric {
                direction: "i".into(),
                kind: "c".into(),
                minutes: Some(2.5),
            },
            2.0,
        );
        assert!(summary.has_call_over_2_min);
        assert!(summary.has_inbound && !summary.has_outbound);
    }

    #[test]
    fn manual_calls_use_the_duration_parser() {
        assert_eq!(manual("out", "Call", Some("3:00")).call_minutes(), Some(3.0));
        assert_eq!(manual("out", "phone", Some("90s")).call_minutes(), Some(1.5));
        assert_eq!(manual("out", "meeting", Some("45 min")).call_minutes(), None);
    }

    #[test]
    fn unparseable_manual_call_length_never_counts_as_long() {
        let mut summary = InteractionSummary::default();
        summary.absorb(&manual("out", "call", Some("about an hour")), 2.0);
        summary.absorb(&manual("in", "call", None), 2.0);
        assert!(!summary.has_call_over_2_min);
        assert!(summary.is_bidirectional());
    }

    #[test]
    fn unrecognised_direction_still_counts_as_interaction() {
        let mut summary = InteractionSummary::default();
        summary.absorb(
            &InteractionRecord::WhatsApp {
                direction: "sideways".into(),
            },
            2.0,
        );
        assert!(summary.has_any_interaction);
        assert!(!summary.has_outbound && !summary.has_inbound);
        assert!(!summary.is_one_directional());
    }
}
