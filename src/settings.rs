use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Duration,
};

use crate::models::TriggerKind;

/// How long each trigger waits before reading the lead back, to let the
/// triggering write become visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerDelays {
    pub email_ms: u64,
    pub whatsapp_ms: u64,
    pub call_ms: u64,
    pub manual_ms: u64,
    pub default_ms: u64,
}

impl Default for TriggerDelays {
    fn default() -> Self {
        Self {
            email_ms: 1500,
            whatsapp_ms: 1000,
            call_ms: 1000,
            manual_ms: 500,
            default_ms: 1000,
        }
    }
}

impl TriggerDelays {
    pub fn for_trigger(&self, kind: TriggerKind) -> Duration {
        let ms = match kind {
            TriggerKind::Email => self.email_ms,
            TriggerKind::WhatsApp => self.whatsapp_ms,
            TriggerKind::Call => self.call_ms,
            TriggerKind::Manual => self.manual_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn default_delay(&self) -> Duration {
        Duration::from_millis(self.default_ms)
    }

    /// All delays zeroed; used by sweeps and tests.
    pub fn immediate() -> Self {
        Self {
            email_ms: 0,
            whatsapp_ms: 0,
            call_ms: 0,
            manual_ms: 0,
            default_ms: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub delays: TriggerDelays,
    /// A call strictly longer than this many minutes counts as a real conversation.
    pub long_call_minutes: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            delays: TriggerDelays::default(),
            long_call_minutes: 2.0,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            EngineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> EngineSettings {
        self.read().clone()
    }

    pub fn update(&self, settings: EngineSettings) -> Result<()> {
        let mut guard = self.write();
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
