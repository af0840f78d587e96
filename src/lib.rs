//! Gaze-selected shape spawning with a persisted, replayable session.
//!
//! A host runtime owns rendering, physics and the cloud plumbing; this crate
//! owns the interaction core:
//! - [`gaze::PointerTracker`] turns per-frame raycasts into focus events.
//! - [`shapes::ShapeProvider`] fetches the next shape for a selection.
//! - [`session::SessionLog`] and [`session::SessionStore`] hold and persist
//!   the ordered shape history.
//! - [`coordinator::SessionCoordinator`] resolves or replays the stored session
//!   and then serializes request -> append -> spawn -> persist per selection.

pub mod coordinator;
pub mod db;
pub mod gaze;
pub mod hooks;
pub mod models;
pub mod session;
pub mod settings;
pub mod shapes;
pub mod utils;

pub use coordinator::{
    CoordinatorConfig, CoordinatorError, CoordinatorSnapshot, CoordinatorState, FocusOutcome,
    Readiness, SessionCoordinator,
};
pub use gaze::{FocusEvent, GazeSwitch, PointerTracker};
pub use hooks::{HostHooks, LoggingHooks};
pub use models::{ShapeId, ShapeKind, SpawnOrigin};
pub use session::{SessionLog, SessionLocation, SessionStore, StoreError};
pub use settings::{MalformedRecordPolicy, Settings, SettingsStore};
pub use shapes::{ProviderError, ShapeProvider};
pub use utils::init_logging;
