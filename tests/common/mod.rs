#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::time::Instant;

use gazeshapes::gaze::TargetId;
use gazeshapes::session::{MemorySessionStore, SessionLocation};
use gazeshapes::{
    GazeSwitch, HostHooks, ProviderError, SessionStore, ShapeId, ShapeProvider, SpawnOrigin,
    StoreError,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Spawned {
    pub shape: ShapeId,
    pub origin: SpawnOrigin,
    pub at: Instant,
    pub gaze_enabled: bool,
}

/// Host hooks that remember every call.
pub struct RecordingHooks {
    gaze: GazeSwitch,
    spawns: Mutex<Vec<Spawned>>,
    statuses: Mutex<Vec<String>>,
    focus: Mutex<Vec<(TargetId, bool)>>,
}

impl RecordingHooks {
    pub fn new(gaze: GazeSwitch) -> Arc<Self> {
        Arc::new(Self {
            gaze,
            spawns: Mutex::new(Vec::new()),
            statuses: Mutex::new(Vec::new()),
            focus: Mutex::new(Vec::new()),
        })
    }

    pub fn spawns(&self) -> Vec<Spawned> {
        self.spawns.lock().unwrap().clone()
    }

    pub fn spawned_shapes(&self) -> Vec<ShapeId> {
        self.spawns().into_iter().map(|s| s.shape).collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn focus_changes(&self) -> Vec<(TargetId, bool)> {
        self.focus.lock().unwrap().clone()
    }
}

impl HostHooks for RecordingHooks {
    fn spawn(&self, shape: ShapeId, origin: SpawnOrigin) {
        self.spawns.lock().unwrap().push(Spawned {
            shape,
            origin,
            at: Instant::now(),
            gaze_enabled: self.gaze.is_enabled(),
        });
    }

    fn on_focus_changed(&self, target: TargetId, focused: bool) {
        self.focus.lock().unwrap().push((target, focused));
    }

    fn on_status_changed(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }
}

/// Provider answering from a script, optionally waiting for a permit first.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<ShapeId, ProviderError>>>,
    gate: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<ShapeId, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            gate: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn shapes(values: &[i64]) -> Arc<Self> {
        Self::new(values.iter().map(|v| Ok(shape(*v))).collect())
    }

    pub fn gated(script: Vec<Result<ShapeId, ProviderError>>, gate: Arc<Semaphore>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            gate: Some(gate),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShapeProvider for ScriptedProvider {
    async fn request_next_shape(&self) -> Result<ShapeId, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| ProviderError::Transport("gate closed".into()))?
                .forget();
        }
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Transport("script exhausted".into())))
    }
}

#[derive(Default)]
pub struct StoreFaults {
    pub container: bool,
    pub exists: bool,
    pub download: bool,
    pub upload: bool,
}

/// Wraps a memory store, counting calls and injecting failures.
pub struct InstrumentedStore {
    pub inner: MemorySessionStore,
    faults: StoreFaults,
    downloads: AtomicUsize,
    uploads: AtomicUsize,
}

impl InstrumentedStore {
    pub fn empty() -> Arc<Self> {
        Self::wrap(MemorySessionStore::new(SessionLocation::default()), StoreFaults::default())
    }

    pub fn with_record(text: &str) -> Arc<Self> {
        Self::wrap(
            MemorySessionStore::with_record(SessionLocation::default(), text),
            StoreFaults::default(),
        )
    }

    pub fn wrap(inner: MemorySessionStore, faults: StoreFaults) -> Arc<Self> {
        Arc::new(Self {
            inner,
            faults,
            downloads: AtomicUsize::new(0),
            uploads: AtomicUsize::new(0),
        })
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub async fn record(&self) -> Option<String> {
        self.inner.record().await
    }
}

fn injected(what: &str) -> StoreError {
    StoreError::Transport(format!("injected {what} failure"))
}

#[async_trait]
impl SessionStore for InstrumentedStore {
    async fn ensure_container_ready(&self) -> Result<(), StoreError> {
        if self.faults.container {
            return Err(injected("container"));
        }
        self.inner.ensure_container_ready().await
    }

    async fn exists(&self) -> Result<bool, StoreError> {
        if self.faults.exists {
            return Err(injected("exists"));
        }
        self.inner.exists().await
    }

    async fn download(&self) -> Result<String, StoreError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.faults.download {
            return Err(injected("download"));
        }
        self.inner.download().await
    }

    async fn upload(&self, text: &str) -> Result<(), StoreError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.faults.upload {
            return Err(injected("upload"));
        }
        self.inner.upload(text).await
    }
}

pub fn shape(value: i64) -> ShapeId {
    ShapeId::new(value).unwrap()
}

pub fn shapes(values: &[i64]) -> Vec<ShapeId> {
    values.iter().map(|v| shape(*v)).collect()
}
