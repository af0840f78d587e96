use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use super::loop_worker::{gaze_loop, GazeLoopConfig, PoseSource};
use super::scene::InteractableFilter;
use super::tracker::{FocusEvent, PointerTracker};

/// Owns the background frame loop for hosts that don't tick the tracker
/// themselves.
pub struct GazeDriver {
    handle: Option<JoinHandle<PointerTracker>>,
    cancel_token: Option<CancellationToken>,
}

impl GazeDriver {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        tracker: PointerTracker,
        poses: Arc<dyn PoseSource>,
        filter: Arc<dyn InteractableFilter>,
        tick_interval: Duration,
        max_distance: f32,
        events: mpsc::Sender<FocusEvent>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("gaze driver already running");
        }
        if tick_interval.is_zero() {
            bail!("gaze tick interval must be greater than zero");
        }

        let cancel_token = CancellationToken::new();
        let config = GazeLoopConfig {
            tick_interval,
            max_distance,
        };

        let handle = tokio::spawn(gaze_loop(
            tracker,
            poses,
            filter,
            config,
            events,
            cancel_token.clone(),
        ));

        info!("gaze driver started ({}ms frames)", tick_interval.as_millis());
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Stops the loop and returns the tracker, or `None` if nothing was running.
    pub async fn stop(&mut self) -> Result<Option<PointerTracker>> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        match self.handle.take() {
            Some(handle) => handle
                .await
                .context("gaze loop task failed to join")
                .map(Some),
            None => Ok(None),
        }
    }
}

impl Default for GazeDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::gaze::{Capabilities, Pose, SphereScene, TargetId, Vec3};
    use crate::hooks::LoggingHooks;

    struct ScriptedPoses(Mutex<Vec<Vec3>>);

    impl PoseSource for ScriptedPoses {
        fn current_pose(&self) -> Option<Pose> {
            let mut dirs = self.0.lock().unwrap();
            let direction = if dirs.len() > 1 { dirs.remove(0) } else { *dirs.first()? };
            Some(Pose {
                origin: Vec3::ZERO,
                direction,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn forwards_focus_events_and_returns_tracker() {
        let button = TargetId(7);
        let scene = SphereScene::new().with_sphere(
            button,
            Vec3::new(0.0, 0.0, 5.0),
            1.0,
            Capabilities::GAZE_BUTTON,
        );
        let tracker = PointerTracker::new(Arc::new(scene), Arc::new(LoggingHooks));
        tracker.switch().enable();

        let poses = Arc::new(ScriptedPoses(Mutex::new(vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::FORWARD,
        ])));
        let (tx, mut rx) = mpsc::channel(4);

        let mut driver = GazeDriver::new();
        driver
            .start(
                tracker,
                poses,
                Arc::new(Capabilities::GAZE_BUTTON),
                Duration::from_millis(16),
                300.0,
                tx,
            )
            .unwrap();
        assert!(driver
            .start(
                PointerTracker::new(Arc::new(SphereScene::new()), Arc::new(LoggingHooks)),
                Arc::new(ScriptedPoses(Mutex::new(vec![]))),
                Arc::new(Capabilities::GAZE_BUTTON),
                Duration::from_millis(16),
                300.0,
                mpsc::channel(1).0,
            )
            .is_err());

        let event = rx.recv().await.expect("focus event");
        assert_eq!(event.target, button);

        let tracker = driver.stop().await.unwrap().expect("tracker handed back");
        assert_eq!(tracker.state().current, Some(button));
        assert!(!driver.is_running());
    }
}
