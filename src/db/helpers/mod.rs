use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use rusqlite::{Row, Rows};
use serde_json::Value;
use uuid::Uuid;

use crate::db::models::ManualInteraction;

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_uuid(value: &str, field: &str) -> Result<Uuid> {
    Uuid::parse_str(value).with_context(|| format!("failed to parse {field} as UUID"))
}

/// Decodes the `manual_interactions` column. NULL and blank values are an
/// empty list; anything else must be a JSON array. Entries that cannot be
/// decoded are logged and skipped so they never hide their neighbours.
pub fn parse_manual_interactions(value: Option<String>) -> Result<Vec<ManualInteraction>> {
    let raw = match value {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(Vec::new()),
    };

    let entries: Vec<Value> =
        serde_json::from_str(&raw).context("failed to parse manual_interactions")?;

    let mut interactions = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<ManualInteraction>(entry) {
            Ok(interaction) => interactions.push(interaction),
            Err(err) => warn!("Skipping manual interaction #{index}: {err}"),
        }
    }
    Ok(interactions)
}

/// Maps every remaining row. A row the mapper rejects is logged and skipped;
/// failing to step the cursor is still an error.
pub fn collect_rows<T>(
    rows: &mut Rows<'_>,
    table: &str,
    map: impl Fn(&Row) -> Result<T>,
) -> Result<Vec<T>> {
    let mut mapped = Vec::new();
    while let Some(row) = rows.next()? {
        match map(row) {
            Ok(value) => mapped.push(value),
            Err(err) => warn!("Skipping malformed {table} row: {err:#}"),
        }
    }
    Ok(mapped)
}
