use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A contact logged by hand on a new-schema lead. Stored inside the lead's
/// `manual_interactions` JSON column rather than in its own table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualInteraction {
    /// `out` or `in`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub direction: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub kind: String,
    /// Free text such as `5 min`, `3:20` or `90s`. Bare numbers written by
    /// older clients are kept as their decimal text.
    #[serde(default, deserialize_with = "lenient_length")]
    pub length: Option<String>,
}

/// Strings and numbers as text, `null` as `None`. Arrays and objects are
/// rejected.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Number(number) => Ok(Some(number.to_string())),
        other => Err(D::Error::custom(format!("expected text, found {other}"))),
    }
}

/// `null` reads as an empty string.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(deserializer)?.unwrap_or_default())
}

fn lenient_length<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    scalar_text(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_length_and_null_fields_are_accepted() {
        let parsed: ManualInteraction =
            serde_json::from_str(r#"{"direction":null,"kind":"call","length":3}"#).unwrap();
        assert_eq!(parsed.direction, "");
        assert_eq!(parsed.kind, "call");
        assert_eq!(parsed.length.as_deref(), Some("3"));
    }

    #[test]
    fn structured_values_are_rejected() {
        assert!(serde_json::from_str::<ManualInteraction>(r#"{"kind":["call"]}"#).is_err());
        assert!(serde_json::from_str::<ManualInteraction>(r#"{"length":{"m":3}}"#).is_err());
    }

    #[test]
    fn missing_fields_default() {
        let parsed: ManualInteraction = serde_json::from_str(r#"{"direction":"in"}"#).unwrap();
        assert_eq!(parsed.kind, "");
        assert_eq!(parsed.length, None);
    }
}
