use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{error, info, warn};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::gaze::{FocusEvent, GazeSwitch};
use crate::hooks::HostHooks;
use crate::models::SpawnOrigin;
use crate::session::{SessionLog, SessionStore, SkippedEntry};
use crate::settings::MalformedRecordPolicy;
use crate::shapes::ShapeProvider;

use super::error::CoordinatorError;
use super::replay::replay_entries;
use super::state::{
    CoordinatorSnapshot, CoordinatorState, DropReason, FocusOutcome, Readiness, StatusMessage,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    pub replay_interval: Duration,
    pub malformed_record_policy: MalformedRecordPolicy,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            replay_interval: Duration::from_millis(500),
            malformed_record_policy: MalformedRecordPolicy::Skip,
        }
    }
}

/// Releases the single in-flight slot on drop.
struct BusySlot(Arc<AtomicBool>);

impl Drop for BusySlot {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives a session: resolves or replays the stored record at startup, then
/// turns each focus event into request -> append -> spawn -> persist.
#[derive(Clone)]
pub struct SessionCoordinator {
    state: Arc<Mutex<CoordinatorState>>,
    log: Arc<Mutex<SessionLog>>,
    provider: Arc<dyn ShapeProvider>,
    store: Arc<dyn SessionStore>,
    hooks: Arc<dyn HostHooks>,
    gaze: GazeSwitch,
    busy: Arc<AtomicBool>,
    last_error: Arc<Mutex<Option<String>>>,
    cancel_token: CancellationToken,
    config: CoordinatorConfig,
}

impl SessionCoordinator {
    pub fn new(
        provider: Arc<dyn ShapeProvider>,
        store: Arc<dyn SessionStore>,
        hooks: Arc<dyn HostHooks>,
        gaze: GazeSwitch,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(CoordinatorState::Uninitialized)),
            log: Arc::new(Mutex::new(SessionLog::new())),
            provider,
            store,
            hooks,
            gaze,
            busy: Arc::new(AtomicBool::new(false)),
            last_error: Arc::new(Mutex::new(None)),
            cancel_token: CancellationToken::new(),
            config,
        }
    }

    pub async fn state(&self) -> CoordinatorState {
        *self.state.lock().await
    }

    pub async fn log(&self) -> SessionLog {
        self.log.lock().await.clone()
    }

    pub async fn snapshot(&self) -> CoordinatorSnapshot {
        CoordinatorSnapshot {
            state: self.state().await,
            entries: self.log.lock().await.entries().to_vec(),
            gaze_enabled: self.gaze.is_enabled(),
            busy: self.busy.load(Ordering::SeqCst),
            last_error: self.last_error.lock().await.clone(),
        }
    }

    /// Resolve the stored session: start empty if there is none, otherwise
    /// replay it. Gaze is enabled only once this returns `Ok`.
    pub async fn start(&self) -> Result<Readiness, CoordinatorError> {
        {
            let mut state = self.state.lock().await;
            if *state != CoordinatorState::Uninitialized {
                return Err(CoordinatorError::AlreadyStarted(*state));
            }
            *state = CoordinatorState::Resolving;
        }
        info!("coordinator resolving stored session");
        self.gaze.disable();
        self.report(StatusMessage::Loading);

        if let Err(err) = self.store.ensure_container_ready().await {
            return Err(self.fault(StatusMessage::StorageUnavailable, err.into()).await);
        }

        let exists = match self.store.exists().await {
            Ok(exists) => exists,
            Err(err) => return Err(self.fault(StatusMessage::StorageUnavailable, err.into()).await),
        };

        if !exists {
            if !self.transition_unless_stopped(CoordinatorState::Empty).await {
                return Err(CoordinatorError::Cancelled { replayed: 0 });
            }
            self.gaze.enable();
            self.report(StatusMessage::NoShapeFile);
            info!("no stored session; starting empty");
            return Ok(Readiness::Empty);
        }

        if !self.transition_unless_stopped(CoordinatorState::Replaying).await {
            return Err(CoordinatorError::Cancelled { replayed: 0 });
        }
        self.report(StatusMessage::ShapeFileFound);

        let text = match self.store.download().await {
            Ok(text) => text,
            Err(err) => return Err(self.fault(StatusMessage::LoadFailed, err.into()).await),
        };

        let (stored, skipped) = match self.parse_record(&text) {
            Ok(parsed) => parsed,
            Err(err) => return Err(self.fault(StatusMessage::LoadFailed, err).await),
        };

        let replayed = replay_entries(
            stored.entries(),
            &self.log,
            self.hooks.as_ref(),
            self.config.replay_interval,
            &self.cancel_token,
        )
        .await
        .map_err(|cancelled| CoordinatorError::Cancelled {
            replayed: cancelled.replayed,
        })?;

        if !self.transition_unless_stopped(CoordinatorState::Live).await {
            return Err(CoordinatorError::Cancelled { replayed });
        }
        self.gaze.enable();
        self.report(StatusMessage::LoadComplete);
        info!("replay complete ({} entries); live", replayed);

        Ok(Readiness::Replayed {
            entries: replayed,
            skipped,
        })
    }

    /// One selection: request a shape, append it, spawn it, persist the log.
    /// Errors are reported but leave the coordinator live.
    pub async fn handle_focus(&self, event: FocusEvent) -> Result<FocusOutcome, CoordinatorError> {
        if !self.state().await.accepts_focus() {
            info!("focus on {:?} ignored: session not live", event.target);
            return Ok(FocusOutcome::Dropped(DropReason::NotLive));
        }

        let Some(_slot) = self.try_claim() else {
            info!("focus on {:?} dropped: previous selection in flight", event.target);
            return Ok(FocusOutcome::Dropped(DropReason::Busy));
        };

        let requested = tokio::select! {
            result = self.provider.request_next_shape() => result,
            _ = self.cancel_token.cancelled() => {
                info!("focus on {:?} abandoned: coordinator stopped", event.target);
                return Ok(FocusOutcome::Dropped(DropReason::Stopped));
            }
        };
        let shape = match requested {
            Ok(shape) => shape,
            Err(err) => {
                warn!("shape request for {:?} failed: {err}", event.target);
                self.remember_error(err.to_string()).await;
                return Err(err.into());
            }
        };

        // Append and spawn under the state lock so shutdown can't interleave.
        let serialized = {
            let mut state = self.state.lock().await;
            if !state.accepts_focus() || self.cancel_token.is_cancelled() {
                info!("{} discarded: coordinator stopped", shape.kind());
                return Ok(FocusOutcome::Dropped(DropReason::Stopped));
            }
            let serialized = {
                let mut log = self.log.lock().await;
                log.append(shape);
                log.serialize()
            };
            self.hooks.spawn(shape, SpawnOrigin::Fresh);
            self.report(StatusMessage::Spawned(shape, SpawnOrigin::Fresh));
            if *state == CoordinatorState::Empty {
                info!("first selection; session live");
                *state = CoordinatorState::Live;
            }
            serialized
        };

        if let Err(err) = self.store.upload(&serialized).await {
            error!("failed to persist session after {}: {err}", shape.kind());
            self.remember_error(err.to_string()).await;
            return Err(CoordinatorError::Persist { shape, source: err });
        }

        Ok(FocusOutcome::Spawned(shape))
    }

    /// Consume focus events until the channel closes or `shutdown` is called.
    /// Events arriving while a selection is in flight are dropped.
    pub fn run_events(&self, mut events: mpsc::Receiver<FocusEvent>) -> JoinHandle<()> {
        let coordinator = self.clone();
        tokio::spawn(async move {
            loop {
                let event = tokio::select! {
                    event = events.recv() => event,
                    _ = coordinator.cancel_token.cancelled() => None,
                };
                let Some(event) = event else {
                    break;
                };

                let work = coordinator.handle_focus(event);
                tokio::pin!(work);
                let mut closed = false;

                let result = loop {
                    if closed {
                        break (&mut work).await;
                    }
                    tokio::select! {
                        result = &mut work => break result,
                        extra = events.recv() => match extra {
                            Some(extra) => info!(
                                "focus on {:?} dropped: previous selection in flight",
                                extra.target
                            ),
                            None => closed = true,
                        },
                    }
                };

                match result {
                    Ok(FocusOutcome::Spawned(shape)) => info!("selection spawned {}", shape.kind()),
                    Ok(FocusOutcome::Dropped(reason)) => info!("selection dropped: {reason:?}"),
                    Err(err) => warn!("selection failed: {err}"),
                }

                if closed {
                    break;
                }
            }
            info!("focus event pump stopped");
        })
    }

    /// Cancel a running replay and the event pump. Entries already replayed
    /// stay in the log.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();
        self.gaze.disable();
        *self.state.lock().await = CoordinatorState::Stopped;
        info!("coordinator stopped");
    }

    fn try_claim(&self) -> Option<BusySlot> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusySlot(self.busy.clone()))
    }

    fn parse_record(
        &self,
        text: &str,
    ) -> Result<(SessionLog, Vec<SkippedEntry>), CoordinatorError> {
        match self.config.malformed_record_policy {
            MalformedRecordPolicy::Abort => Ok((SessionLog::deserialize(text)?, Vec::new())),
            MalformedRecordPolicy::Skip => {
                let (stored, skipped) = SessionLog::deserialize_lenient(text);
                for entry in &skipped {
                    warn!(
                        "skipping malformed session entry {} ('{}')",
                        entry.index, entry.token
                    );
                }
                Ok((stored, skipped))
            }
        }
    }

    /// Returns false if the coordinator was shut down meanwhile.
    async fn transition_unless_stopped(&self, next: CoordinatorState) -> bool {
        let mut state = self.state.lock().await;
        if *state == CoordinatorState::Stopped || self.cancel_token.is_cancelled() {
            return false;
        }
        *state = next;
        true
    }

    async fn fault(&self, status: StatusMessage, err: CoordinatorError) -> CoordinatorError {
        error!("coordinator startup failed: {err}");
        self.gaze.disable();
        {
            let mut state = self.state.lock().await;
            if *state != CoordinatorState::Stopped {
                *state = CoordinatorState::Faulted;
            }
        }
        self.remember_error(err.to_string()).await;
        self.report(status);
        err
    }

    async fn remember_error(&self, message: String) {
        *self.last_error.lock().await = Some(message);
    }

    fn report(&self, status: StatusMessage) {
        self.hooks.on_status_changed(&status.to_string());
    }
}
