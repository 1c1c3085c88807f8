use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{collect_rows, parse_datetime},
    models::WhatsAppMessage,
};

fn row_to_message(row: &Row) -> Result<WhatsAppMessage> {
    let created_at: String = row.get("created_at")?;

    Ok(WhatsAppMessage {
        id: Some(row.get("id")?),
        legacy_lead_id: row.get("legacy_lead_id")?,
        lead_id: row.get("lead_id")?,
        direction: row.get("direction")?,
        body: row.get("body")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_whatsapp_message(&self, message: &WhatsAppMessage) -> Result<i64> {
        let record = message.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO whatsapp_messages (legacy_lead_id, lead_id, direction, body, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.legacy_lead_id,
                    record.lead_id,
                    record.direction,
                    record.body,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_whatsapp_for_legacy_lead(
        &self,
        legacy_lead_id: i64,
    ) -> Result<Vec<WhatsAppMessage>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, legacy_lead_id, lead_id, direction, body, created_at
                 FROM whatsapp_messages
                 WHERE legacy_lead_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![legacy_lead_id])?;
            collect_rows(&mut rows, "whatsapp_messages", row_to_message)
        })
        .await
    }

    pub async fn get_whatsapp_for_lead(&self, lead_id: &str) -> Result<Vec<WhatsAppMessage>> {
        let lead_id = lead_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, legacy_lead_id, lead_id, direction, body, created_at
                 FROM whatsapp_messages
                 WHERE lead_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![lead_id])?;
            collect_rows(&mut rows, "whatsapp_messages", row_to_message)
        })
        .await
    }
}
