use tokio::sync::Mutex;
use tokio::time::{self, Duration};
use tokio_util::sync::CancellationToken;

use crate::hooks::HostHooks;
use crate::models::{ShapeId, SpawnOrigin};
use crate::session::SessionLog;

use super::state::StatusMessage;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Replay stopped early; `replayed` entries reached the log before it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayCancelled {
    pub replayed: usize,
}

/// Re-spawns stored entries in order, one per `interval`. Each entry is
/// appended and spawned before the pause that follows it, so stopping midway
/// leaves the log holding exactly what the host has seen.
pub async fn replay_entries(
    entries: &[ShapeId],
    log: &Mutex<SessionLog>,
    hooks: &dyn HostHooks,
    interval: Duration,
    cancel_token: &CancellationToken,
) -> Result<usize, ReplayCancelled> {
    log_info!("replaying {} stored entries", entries.len());

    for (index, &shape) in entries.iter().enumerate() {
        if cancel_token.is_cancelled() {
            return Err(ReplayCancelled { replayed: index });
        }

        log.lock().await.append(shape);
        hooks.spawn(shape, SpawnOrigin::Replay);
        hooks.on_status_changed(&StatusMessage::Spawned(shape, SpawnOrigin::Replay).to_string());
        log_debug!("replayed entry {} ({})", index, shape.kind());

        tokio::select! {
            _ = time::sleep(interval) => {}
            _ = cancel_token.cancelled() => {
                log_info!("replay cancelled after {} entries", index + 1);
                return Err(ReplayCancelled { replayed: index + 1 });
            }
        }
    }

    Ok(entries.len())
}
