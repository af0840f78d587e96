use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

use crate::coordinator::CoordinatorConfig;
use crate::session::{FileSessionStore, SessionLocation};
use crate::shapes::HttpShapeProvider;

/// What to do with entries of a stored session that fail to parse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MalformedRecordPolicy {
    /// Replay the good entries, log the rest.
    #[default]
    Skip,
    /// Refuse the whole record and stay disabled.
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub shape_endpoint: String,
    pub request_timeout_ms: u64,
    pub replay_interval_ms: u64,
    pub gaze_max_distance: f32,
    pub gaze_tick_ms: u64,
    pub location: SessionLocation,
    pub malformed_record_policy: MalformedRecordPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shape_endpoint: "http://localhost:7071/api/next-shape".into(),
            request_timeout_ms: 30_000,
            replay_interval_ms: 500,
            gaze_max_distance: 300.0,
            gaze_tick_ms: 16,
            location: SessionLocation::default(),
            malformed_record_policy: MalformedRecordPolicy::Skip,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }

    pub fn gaze_tick(&self) -> Duration {
        Duration::from_millis(self.gaze_tick_ms)
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            replay_interval: self.replay_interval(),
            malformed_record_policy: self.malformed_record_policy,
        }
    }

    pub fn http_shape_provider(&self) -> HttpShapeProvider {
        HttpShapeProvider::new(self.shape_endpoint.clone(), self.request_timeout())
    }

    pub fn file_session_store(&self, root: impl Into<PathBuf>) -> FileSessionStore {
        FileSessionStore::new(root, self.location.clone())
    }
}

/// Settings document backed by a JSON file.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    /// Loads `path`, falling back to defaults when it is missing or unreadable JSON.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unparsable settings at {}: {err}; using defaults",
                    path.display()
                );
                Settings::default()
            })
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> Settings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update(&self, settings: Settings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: Settings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", self.path.display()))?;
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = data;
        Ok(())
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
