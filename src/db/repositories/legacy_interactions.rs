use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{collect_rows, parse_datetime},
    models::LegacyInteraction,
};

fn row_to_interaction(row: &Row) -> Result<LegacyInteraction> {
    let created_at: String = row.get("created_at")?;

    Ok(LegacyInteraction {
        id: Some(row.get("id")?),
        lead_id: row.get("lead_id")?,
        direction: row.get("direction")?,
        kind: row.get("kind")?,
        minutes: row.get("minutes")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_legacy_interaction(&self, interaction: &LegacyInteraction) -> Result<i64> {
        let record = interaction.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO legacy_interactions (lead_id, direction, kind, minutes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.lead_id,
                    record.direction,
                    record.kind,
                    record.minutes,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_legacy_interactions(&self, lead_id: i64) -> Result<Vec<LegacyInteraction>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, lead_id, direction, kind, minutes, created_at
                 FROM legacy_interactions
                 WHERE lead_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![lead_id])?;
            collect_rows(&mut rows, "legacy_interactions", row_to_interaction)
        })
        .await
    }
}
