use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

use crate::db::{helpers::parse_datetime, Database};
use crate::session::SessionLocation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

impl Database {
    /// Idempotent.
    pub async fn create_container(&self, share: &str, directory: &str) -> Result<()> {
        let share = share.to_string();
        let directory = directory.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO containers (share, directory, created_at)
                 VALUES (?1, ?2, ?3)",
                params![share, directory, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn container_exists(&self, share: &str, directory: &str) -> Result<bool> {
        let share = share.to_string();
        let directory = directory.to_string();
        self.execute(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM containers WHERE share = ?1 AND directory = ?2",
                    params![share, directory],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    pub async fn get_session_record(
        &self,
        location: &SessionLocation,
    ) -> Result<Option<StoredRecord>> {
        let location = location.clone();
        self.execute(move |conn| {
            let row: Option<(String, String)> = conn
                .query_row(
                    "SELECT body, updated_at FROM session_records
                     WHERE share = ?1 AND directory = ?2 AND file_name = ?3",
                    params![location.share, location.directory, location.file_name],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            row.map(|(body, updated_at)| -> Result<StoredRecord> {
                Ok(StoredRecord {
                    body,
                    updated_at: parse_datetime(&updated_at, "updated_at")?,
                })
            })
            .transpose()
        })
        .await
    }

    pub async fn upsert_session_record(
        &self,
        location: &SessionLocation,
        body: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let location = location.clone();
        let body = body.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO session_records (share, directory, file_name, body, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (share, directory, file_name)
                 DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
                params![
                    location.share,
                    location.directory,
                    location.file_name,
                    body,
                    updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }
}
