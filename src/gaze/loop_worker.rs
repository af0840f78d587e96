use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::math::Vec3;
use super::scene::InteractableFilter;
use super::tracker::{FocusEvent, PointerTracker};

// Per-frame logging is noisy; flip to silence this loop only.
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Head pose sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Host seam for the current head/camera pose. `None` skips the frame.
pub trait PoseSource: Send + Sync {
    fn current_pose(&self) -> Option<Pose>;
}

pub struct GazeLoopConfig {
    pub tick_interval: Duration,
    pub max_distance: f32,
}

/// Frame loop: ticks the tracker and forwards focus events until cancelled or
/// the receiver goes away. Hands the tracker back on exit.
pub async fn gaze_loop(
    mut tracker: PointerTracker,
    poses: Arc<dyn PoseSource>,
    filter: Arc<dyn InteractableFilter>,
    config: GazeLoopConfig,
    events: mpsc::Sender<FocusEvent>,
    cancel_token: CancellationToken,
) -> PointerTracker {
    let mut ticker = tokio::time::interval(config.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(pose) = poses.current_pose() else {
                    continue;
                };

                let Some(event) = tracker.tick(
                    pose.origin,
                    pose.direction,
                    config.max_distance,
                    filter.as_ref(),
                ) else {
                    continue;
                };

                match events.try_send(event) {
                    Ok(()) => log_debug!("focus event forwarded for {:?}", event.target),
                    Err(TrySendError::Full(dropped)) => {
                        log_info!("focus event for {:?} dropped, consumer busy", dropped.target);
                    }
                    Err(TrySendError::Closed(_)) => {
                        log_info!("focus consumer closed, gaze loop exiting");
                        break;
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("gaze loop shutting down");
                break;
            }
        }
    }

    tracker
}
