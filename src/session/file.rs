use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use tokio::fs;

use super::store::{SessionLocation, SessionStore, StoreError};

/// Keeps the record at `root/share/directory/file_name` on local disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    root: PathBuf,
    location: SessionLocation,
}

impl FileSessionStore {
    pub fn new(root: impl Into<PathBuf>, location: SessionLocation) -> Self {
        Self {
            root: root.into(),
            location,
        }
    }

    pub fn container_path(&self) -> PathBuf {
        self.root
            .join(&self.location.share)
            .join(&self.location.directory)
    }

    pub fn record_path(&self) -> PathBuf {
        self.container_path().join(&self.location.file_name)
    }

    async fn require_container(&self) -> Result<PathBuf, StoreError> {
        let dir = self.container_path();
        match fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => Ok(dir),
            Ok(_) => Err(StoreError::ContainerNotReady(self.location.container())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::ContainerNotReady(self.location.container()))
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn ensure_container_ready(&self) -> Result<(), StoreError> {
        let dir = self.container_path();
        fs::create_dir_all(&dir).await.map_err(|err| {
            StoreError::Transport(format!("failed to create {}: {err}", dir.display()))
        })?;
        info!("session container ready at {}", dir.display());
        Ok(())
    }

    async fn exists(&self) -> Result<bool, StoreError> {
        match fs::metadata(self.record_path()).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn download(&self) -> Result<String, StoreError> {
        self.require_container().await?;
        let path = self.record_path();
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(self.location.to_string()))
            }
            Err(err) => Err(StoreError::Transport(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    async fn upload(&self, text: &str) -> Result<(), StoreError> {
        self.require_container().await?;
        let path = self.record_path();
        let partial = temp_path(&path);

        fs::write(&partial, text).await.map_err(|err| {
            StoreError::Transport(format!("failed to write {}: {err}", partial.display()))
        })?;
        fs::rename(&partial, &path).await.map_err(|err| {
            StoreError::Transport(format!("failed to replace {}: {err}", path.display()))
        })?;

        debug!("uploaded {} bytes to {}", text.len(), path.display());
        Ok(())
    }
}
