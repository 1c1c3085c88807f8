pub mod cli;
pub mod db;
pub mod error;
pub mod events;
pub mod models;
pub mod recorder;
pub mod settings;
pub mod transitions;
mod utils;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use cli::{Cli, Command, SweepEntry};
use db::Database;
use events::EventLog;
use settings::SettingsStore;
use transitions::StageEngine;

pub use error::{FailureKind, TransitionError, TransitionResult};
pub use models::{LeadRef, Stage, TriggerIds};
pub use recorder::{Recorded, Recorder};
pub use transitions::{TransitionOutcome, TriggerHandle, Triggers};

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    info!("leadflow starting up...");

    let database = Database::new(cli.db.clone())?;
    let settings_store = SettingsStore::new(cli.settings_path())?;
    let engine = StageEngine::new(
        Arc::new(database),
        EventLog::new(),
        settings_store.settings(),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async move {
        match cli.command() {
            Command::Sweep => {
                let entries: Vec<SweepEntry> = engine
                    .sweep_open_leads()
                    .await?
                    .into_iter()
                    .map(|(lead, outcome)| SweepEntry {
                        lead: lead.to_string(),
                        outcome,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            Command::Evaluate { lead } => {
                let outcome = engine.evaluate_and_update_stage(lead, Duration::ZERO).await;
                println!("{}", serde_json::to_string(&outcome)?);
            }
        }

        let snapshot = engine.events().snapshot().await;
        info!(
            "{} transitions, {} unchanged",
            snapshot.transition_count, snapshot.unchanged_count
        );
        let failures = &snapshot.failures;
        let failed = failures.missing_identifier
            + failures.source_query
            + failures.stage_fetch
            + failures.stage_update;
        if failed > 0 {
            warn!("{failed} evaluation failures: {failures:?}");
        }

        Ok::<(), anyhow::Error>(())
    })
}
