use std::fmt;

use serde::Serialize;

use crate::models::{spawn_label, ShapeId, SpawnOrigin};
use crate::session::SkippedEntry;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum CoordinatorState {
    #[default]
    Uninitialized,
    Resolving,
    /// Ready with no stored session; accepts focus events like `Live`.
    Empty,
    Replaying,
    Live,
    /// Startup failed; gaze stays disabled.
    Faulted,
    /// Shut down by the host.
    Stopped,
}

impl CoordinatorState {
    pub fn accepts_focus(self) -> bool {
        matches!(self, CoordinatorState::Empty | CoordinatorState::Live)
    }
}

/// How startup ended when it succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Readiness {
    Empty,
    Replayed {
        entries: usize,
        skipped: Vec<SkippedEntry>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DropReason {
    /// A previous selection is still being fetched or saved.
    Busy,
    NotLive,
    /// Shutdown arrived while the shape was being fetched.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusOutcome {
    Spawned(ShapeId),
    Dropped(DropReason),
}

/// Status lines reported to the host's status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    Loading,
    NoShapeFile,
    ShapeFileFound,
    LoadComplete,
    StorageUnavailable,
    LoadFailed,
    Spawned(ShapeId, SpawnOrigin),
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Loading => f.write_str("Loading..."),
            StatusMessage::NoShapeFile => f.write_str("No Shape\nFile!"),
            StatusMessage::ShapeFileFound => f.write_str("Shape File\nFound!"),
            StatusMessage::LoadComplete => f.write_str("Load Complete!"),
            StatusMessage::StorageUnavailable => f.write_str("Storage\nUnavailable!"),
            StatusMessage::LoadFailed => f.write_str("Load\nFailed!"),
            StatusMessage::Spawned(shape, origin) => f.write_str(&spawn_label(*shape, *origin)),
        }
    }
}

/// Point-in-time view for host UIs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorSnapshot {
    pub state: CoordinatorState,
    pub entries: Vec<ShapeId>,
    pub gaze_enabled: bool,
    pub busy: bool,
    pub last_error: Option<String>,
}
