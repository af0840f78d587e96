use async_trait::async_trait;
use tokio::sync::Mutex;

use super::store::{SessionLocation, SessionStore, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    container_ready: bool,
    record: Option<String>,
    uploads: usize,
}

/// In-process store; the record lives as long as the value.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    location: SessionLocation,
    state: Mutex<MemoryState>,
}

impl MemorySessionStore {
    pub fn new(location: SessionLocation) -> Self {
        Self {
            location,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Store pre-seeded with a record, as if a previous session had saved it.
    pub fn with_record(location: SessionLocation, text: impl Into<String>) -> Self {
        Self {
            location,
            state: Mutex::new(MemoryState {
                container_ready: true,
                record: Some(text.into()),
                uploads: 0,
            }),
        }
    }

    pub async fn record(&self) -> Option<String> {
        self.state.lock().await.record.clone()
    }

    pub async fn upload_count(&self) -> usize {
        self.state.lock().await.uploads
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn ensure_container_ready(&self) -> Result<(), StoreError> {
        self.state.lock().await.container_ready = true;
        Ok(())
    }

    async fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.state.lock().await.record.is_some())
    }

    async fn download(&self) -> Result<String, StoreError> {
        let state = self.state.lock().await;
        if !state.container_ready {
            return Err(StoreError::ContainerNotReady(self.location.container()));
        }
        state
            .record
            .clone()
            .ok_or_else(|| StoreError::NotFound(self.location.to_string()))
    }

    async fn upload(&self, text: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if !state.container_ready {
            return Err(StoreError::ContainerNotReady(self.location.container()));
        }
        state.record = Some(text.to_string());
        state.uploads += 1;
        Ok(())
    }
}
