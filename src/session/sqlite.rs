use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::Database;

use super::store::{SessionLocation, SessionStore, StoreError};

/// Keeps the session record in a local SQLite database.
#[derive(Clone)]
pub struct SqliteSessionStore {
    db: Database,
    location: SessionLocation,
}

impl SqliteSessionStore {
    pub fn new(db: Database, location: SessionLocation) -> Self {
        Self { db, location }
    }

    pub fn open(path: PathBuf, location: SessionLocation) -> Result<Self, StoreError> {
        Ok(Self::new(Database::new(path)?, location))
    }

    pub fn location(&self) -> &SessionLocation {
        &self.location
    }

    /// When the record was last uploaded, if it exists.
    pub async fn last_modified(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self
            .db
            .get_session_record(&self.location)
            .await?
            .map(|record| record.updated_at))
    }

    async fn require_container(&self) -> Result<(), StoreError> {
        let ready = self
            .db
            .container_exists(&self.location.share, &self.location.directory)
            .await?;
        if ready {
            Ok(())
        } else {
            Err(StoreError::ContainerNotReady(self.location.container()))
        }
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn ensure_container_ready(&self) -> Result<(), StoreError> {
        self.db
            .create_container(&self.location.share, &self.location.directory)
            .await?;
        Ok(())
    }

    async fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.db.get_session_record(&self.location).await?.is_some())
    }

    async fn download(&self) -> Result<String, StoreError> {
        self.require_container().await?;
        self.db
            .get_session_record(&self.location)
            .await?
            .map(|record| record.body)
            .ok_or_else(|| StoreError::NotFound(self.location.to_string()))
    }

    async fn upload(&self, text: &str) -> Result<(), StoreError> {
        self.require_container().await?;
        self.db
            .upsert_session_record(&self.location, text, Utc::now())
            .await?;
        Ok(())
    }
}
