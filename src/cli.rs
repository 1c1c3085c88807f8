use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::models::LeadRef;
use crate::transitions::TransitionOutcome;

#[derive(Parser, Debug)]
#[command(name = "leadflow")]
#[command(about = "Interaction-driven pipeline stages for CRM leads", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database holding leads and interactions
    #[arg(long, env = "LEADFLOW_DB", default_value = "leadflow.sqlite3")]
    pub db: PathBuf,

    /// Engine settings file (defaults to settings.json next to the database)
    #[arg(long, env = "LEADFLOW_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Re-evaluate every lead that can still advance (default)
    Sweep,

    /// Evaluate one lead and print the outcome
    Evaluate {
        /// New-schema UUID or legacy numeric id
        #[arg(value_parser = parse_lead)]
        lead: LeadRef,
    },
}

impl Cli {
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| self.db.with_file_name("settings.json"))
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Sweep)
    }
}

fn parse_lead(raw: &str) -> Result<LeadRef, String> {
    LeadRef::parse(raw).ok_or_else(|| format!("'{raw}' is neither a UUID nor a numeric lead id"))
}

/// One line of `sweep` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepEntry {
    pub lead: String,
    #[serde(flatten)]
    pub outcome: TransitionOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_sweep() {
        let cli = Cli::try_parse_from(["leadflow", "--db", "/tmp/crm/leads.sqlite3"]).unwrap();
        assert_eq!(cli.command(), Command::Sweep);
        assert_eq!(cli.settings_path(), PathBuf::from("/tmp/crm/settings.json"));
    }

    #[test]
    fn evaluate_accepts_both_identifier_forms() {
        let cli = Cli::try_parse_from(["leadflow", "evaluate", "42"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Evaluate {
                lead: LeadRef::Legacy(42)
            }
        );

        let uuid = uuid::Uuid::new_v4();
        let cli = Cli::try_parse_from(["leadflow", "evaluate", &uuid.to_string()]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Evaluate {
                lead: LeadRef::Client(uuid)
            }
        );

        assert!(Cli::try_parse_from(["leadflow", "evaluate", "someone"]).is_err());
    }

    #[test]
    fn sweep_entry_flattens_the_outcome() {
        let entry = SweepEntry {
            lead: LeadRef::Legacy(3).to_string(),
            outcome: TransitionOutcome::advanced(11),
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"lead":"legacy:3","updated":true,"newStage":11}"#
        );
    }
}
