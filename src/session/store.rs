use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session record {0} not found")]
    NotFound(String),

    #[error("session store container {0} is not ready")]
    ContainerNotReady(String),

    #[error("session store request failed: {0}")]
    Transport(String),
}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        StoreError::Transport(format!("{err:#}"))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Well-known name of the persisted session: share, directory, file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLocation {
    pub share: String,
    pub directory: String,
    pub file_name: String,
}

impl SessionLocation {
    pub fn new(
        share: impl Into<String>,
        directory: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            share: share.into(),
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    pub fn container(&self) -> String {
        format!("{}/{}", self.share, self.directory)
    }
}

impl Default for SessionLocation {
    fn default() -> Self {
        Self::new("fileshare", "storagedirectory", "TextShapeFile")
    }
}

impl std::fmt::Display for SessionLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.share, self.directory, self.file_name)
    }
}

/// Remote home of the single session record.
///
/// `ensure_container_ready` must succeed before `download` or `upload`.
/// `upload` overwrites unconditionally; concurrent writers clobber each other.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn ensure_container_ready(&self) -> Result<(), StoreError>;

    async fn exists(&self) -> Result<bool, StoreError>;

    async fn download(&self) -> Result<String, StoreError>;

    async fn upload(&self, text: &str) -> Result<(), StoreError>;
}
