use log::info;

use crate::gaze::TargetId;
use crate::models::{spawn_label, ShapeId, SpawnOrigin};

/// Callbacks into the host runtime. The core never renders, highlights or
/// displays text itself; it reports through these.
pub trait HostHooks: Send + Sync {
    /// Create the primitive for `shape` in the scene.
    fn spawn(&self, shape: ShapeId, origin: SpawnOrigin);

    /// Apply (`focused == true`) or remove emphasis on a gaze target.
    fn on_focus_changed(&self, target: TargetId, focused: bool);

    fn on_status_changed(&self, text: &str);
}

/// Hooks that only write to the log; handy for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHooks;

impl HostHooks for LoggingHooks {
    fn spawn(&self, shape: ShapeId, origin: SpawnOrigin) {
        info!("spawn {}", spawn_label(shape, origin));
    }

    fn on_focus_changed(&self, target: TargetId, focused: bool) {
        info!("target {:?} focused={}", target, focused);
    }

    fn on_status_changed(&self, text: &str) {
        info!("status: {}", text.replace('\n', " "));
    }
}
