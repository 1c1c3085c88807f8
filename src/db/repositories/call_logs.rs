use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{collect_rows, parse_datetime},
    models::CallLog,
};

fn row_to_call_log(row: &Row) -> Result<CallLog> {
    let created_at: String = row.get("created_at")?;

    Ok(CallLog {
        id: Some(row.get("id")?),
        lead_id: row.get("lead_id")?,
        direction: row.get("direction")?,
        duration: row.get("duration")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    pub async fn insert_call_log(&self, call: &CallLog) -> Result<i64> {
        let record = call.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO call_logs (lead_id, direction, duration, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    record.lead_id,
                    record.direction,
                    record.duration,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    /// Call logs only exist for legacy numeric lead ids.
    pub async fn get_call_logs(&self, lead_id: i64) -> Result<Vec<CallLog>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, lead_id, direction, duration, created_at
                 FROM call_logs
                 WHERE lead_id = ?1
                 ORDER BY created_at ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![lead_id])?;
            collect_rows(&mut rows, "call_logs", row_to_call_log)
        })
        .await
    }
}
