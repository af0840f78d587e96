use thiserror::Error;

use crate::models::ShapeId;
use crate::session::{SessionRecordError, StoreError};
use crate::shapes::ProviderError;

use super::state::CoordinatorState;

/// Structured failures surfaced to the host alongside the status text.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("shape request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("shape {shape} spawned but session not persisted: {source}")]
    Persist {
        shape: ShapeId,
        #[source]
        source: StoreError,
    },

    #[error("session store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Record(#[from] SessionRecordError),

    #[error("coordinator already started (state {0:?})")]
    AlreadyStarted(CoordinatorState),

    #[error("coordinator stopped after replaying {replayed} entries")]
    Cancelled { replayed: usize },
}
