use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{collect_rows, parse_datetime},
    models::EmailRecord,
};

fn row_to_email(row: &Row) -> Result<EmailRecord> {
    let created_at: String = row.get("created_at")?;

    Ok(EmailRecord {
        id: Some(row.get("id")?),
        legacy_lead_id: row.get("legacy_lead_id")?,
        client_id: row.get("client_id")?,
        direction: row.get("direction")?,
        subject: row.get("subject")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_email(&self, email: &EmailRecord) -> Result<i64> {
        let record = email.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO emails (legacy_lead_id, client_id, direction, subject, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    record.legacy_lead_id,
                    record.client_id,
                    record.direction,
                    record.subject,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_emails_for_legacy_lead(&self, legacy_lead_id: i64) -> Result<Vec<EmailRecord>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, legacy_lead_id, client_id, direction, subject, created_at
                 FROM emails
                 WHERE legacy_lead_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![legacy_lead_id])?;
            collect_rows(&mut rows, "emails", row_to_email)
        })
        .await
    }

    pub async fn get_emails_for_client(&self, client_id: &str) -> Result<Vec<EmailRecord>> {
        let client_id = client_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, legacy_lead_id, client_id, direction, subject, created_at
                 FROM emails
                 WHERE client_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![client_id])?;
            collect_rows(&mut rows, "emails", row_to_email)
        })
        .await
    }
}
