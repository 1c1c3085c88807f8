use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_manual_interactions, parse_uuid},
    models::{ClientLead, LegacyLead, ManualInteraction},
};
use crate::models::{LeadRef, Stage, STAGE_ASSIGNED, STAGE_NEW, STAGE_PRECOMMUNICATION};

fn row_to_legacy_lead(row: &Row) -> Result<LegacyLead> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(LegacyLead {
        id: row.get("id")?,
        name: row.get("name")?,
        stage: row.get("stage")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

fn row_to_client_lead(row: &Row) -> Result<ClientLead> {
    let id: String = row.get("id")?;
    let manual: Option<String> = row.get("manual_interactions")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(ClientLead {
        id: parse_uuid(&id, "id")?,
        legacy_id: row.get("legacy_id")?,
        name: row.get("name")?,
        stage: row.get("stage")?,
        manual_interactions: parse_manual_interactions(manual)?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_legacy_lead(&self, name: &str, stage: Stage) -> Result<LegacyLead> {
        let name = name.to_string();
        self.execute(move |conn| {
            let now = Utc::now().to_rfc3339();
            conn.execute(
                "INSERT INTO legacy_leads (name, stage, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, stage, now, now],
            )
            .context("failed to insert legacy lead")?;

            let id = conn.last_insert_rowid();
            let lead = conn
                .query_row(
                    "SELECT id, name, stage, created_at, updated_at
                     FROM legacy_leads
                     WHERE id = ?1",
                    params![id],
                    |row| Ok(row_to_legacy_lead(row)),
                )??;
            Ok(lead)
        })
        .await
    }

    pub async fn insert_client_lead(
        &self,
        name: &str,
        legacy_id: Option<i64>,
        stage: Stage,
    ) -> Result<ClientLead> {
        let name = name.to_string();
        self.execute(move |conn| {
            let id = Uuid::new_v4();
            let now = Utc::now().to_rfc3339();
            conn.execute(
                "INSERT INTO leads (id, legacy_id, name, stage, manual_interactions, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, '[]', ?5, ?6)",
                params![id.to_string(), legacy_id, name, stage, now, now],
            )
            .context("failed to insert lead")?;

            let lead = conn
                .query_row(
                    "SELECT id, legacy_id, name, stage, manual_interactions, created_at, updated_at
                     FROM leads
                     WHERE id = ?1",
                    params![id.to_string()],
                    |row| Ok(row_to_client_lead(row)),
                )??;
            Ok(lead)
        })
        .await
    }

    /// Current stage of a legacy lead, `None` when the row does not exist.
    pub async fn get_legacy_stage(&self, lead_id: i64) -> Result<Option<Stage>> {
        self.execute(move |conn| {
            let stage = conn
                .query_row(
                    "SELECT stage FROM legacy_leads WHERE id = ?1",
                    params![lead_id],
                    |row| row.get::<_, Stage>(0),
                )
                .optional()?;
            Ok(stage)
        })
        .await
    }

    /// Current stage of a new-schema lead, `None` when the row does not exist.
    pub async fn get_client_stage(&self, lead_id: Uuid) -> Result<Option<Stage>> {
        self.execute(move |conn| {
            let stage = conn
                .query_row(
                    "SELECT stage FROM leads WHERE id = ?1",
                    params![lead_id.to_string()],
                    |row| row.get::<_, Stage>(0),
                )
                .optional()?;
            Ok(stage)
        })
        .await
    }

    pub async fn set_legacy_stage(&self, lead_id: i64, stage: Stage) -> Result<()> {
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE legacy_leads
                 SET stage = ?1,
                     updated_at = ?2
                 WHERE id = ?3",
                params![stage, Utc::now().to_rfc3339(), lead_id],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("Legacy lead {lead_id} not found"));
            }
            Ok(())
        })
        .await
    }

    pub async fn set_client_stage(&self, lead_id: Uuid, stage: Stage) -> Result<()> {
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE leads
                 SET stage = ?1,
                     updated_at = ?2
                 WHERE id = ?3",
                params![stage, Utc::now().to_rfc3339(), lead_id.to_string()],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("Lead {lead_id} not found"));
            }
            Ok(())
        })
        .await
    }

    pub async fn get_manual_interactions(&self, lead_id: Uuid) -> Result<Vec<ManualInteraction>> {
        self.execute(move |conn| {
            let raw: Option<Option<String>> = conn
                .query_row(
                    "SELECT manual_interactions FROM leads WHERE id = ?1",
                    params![lead_id.to_string()],
                    |row| row.get(0),
                )
                .optional()?;

            match raw {
                Some(value) => parse_manual_interactions(value),
                None => Ok(Vec::new()),
            }
        })
        .await
    }

    /// Appends to the embedded JSON array inside a single DB task so two
    /// concurrent appends cannot drop each other's entry. Returns the new
    /// length of the array.
    pub async fn append_manual_interaction(
        &self,
        lead_id: Uuid,
        interaction: &ManualInteraction,
    ) -> Result<usize> {
        let interaction = interaction.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;

            let raw: String = tx
                .query_row(
                    "SELECT manual_interactions FROM leads WHERE id = ?1",
                    params![lead_id.to_string()],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| anyhow!("Lead {lead_id} not found"))?;

            let mut entries = parse_manual_interactions(Some(raw))?;
            entries.push(interaction);
            let serialized = serde_json::to_string(&entries)
                .context("failed to serialize manual_interactions")?;

            tx.execute(
                "UPDATE leads
                 SET manual_interactions = ?1,
                     updated_at = ?2
                 WHERE id = ?3",
                params![serialized, Utc::now().to_rfc3339(), lead_id.to_string()],
            )?;

            tx.commit()?;
            Ok(entries.len())
        })
        .await
    }

    /// Every lead in either schema whose stage is still below 15.
    pub async fn list_open_leads(&self) -> Result<Vec<LeadRef>> {
        self.execute(|conn| {
            let mut leads = Vec::new();

            let mut stmt = conn.prepare(
                "SELECT id FROM legacy_leads
                 WHERE stage IN (?1, ?2, ?3)
                 ORDER BY id ASC",
            )?;
            let mut rows =
                stmt.query(params![STAGE_NEW, STAGE_ASSIGNED, STAGE_PRECOMMUNICATION])?;
            while let Some(row) = rows.next()? {
                leads.push(LeadRef::Legacy(row.get(0)?));
            }
            drop(rows);
            drop(stmt);

            let mut stmt = conn.prepare(
                "SELECT id FROM leads
                 WHERE stage IN (?1, ?2, ?3)
                 ORDER BY created_at ASC",
            )?;
            let mut rows =
                stmt.query(params![STAGE_NEW, STAGE_ASSIGNED, STAGE_PRECOMMUNICATION])?;
            while let Some(row) = rows.next()? {
                let id: String = row.get(0)?;
                leads.push(LeadRef::Client(parse_uuid(&id, "id")?));
            }

            Ok(leads)
        })
        .await
    }
}
