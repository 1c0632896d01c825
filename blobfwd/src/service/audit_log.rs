use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::storage::{ObjectStore, StorageError};

pub const DEFAULT_LOG_OBJECT: &str = "processing_logs.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogStatus {
    Success,
    Failed,
    Error,
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Error => "Error",
        };
        f.write_str(s)
    }
}

/// One processing outcome as stored in the log object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub blob_name: String,
    pub status: LogStatus,
    pub timestamp: DateTime<Utc>,
    pub error_message: Option<String>,
}

impl LogEntry {
    pub fn new(blob_name: impl Into<String>, status: LogStatus, error_message: Option<String>) -> Self {
        Self {
            blob_name: blob_name.into(),
            status,
            timestamp: Utc::now(),
            error_message,
        }
    }

    pub fn success(blob_name: impl Into<String>) -> Self {
        Self::new(blob_name, LogStatus::Success, None)
    }

    pub fn failed(blob_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(blob_name, LogStatus::Failed, Some(message.into()))
    }

    pub fn error(blob_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(blob_name, LogStatus::Error, Some(message.into()))
    }
}

/// The shared processing log: a JSON array kept in a single object.
///
/// Appends are a plain read, push, overwrite cycle with no lock and no
/// conditional write, so two concurrent appends can lose one entry.
#[derive(Clone)]
pub struct ProcessingLog {
    store: Arc<dyn ObjectStore>,
    container: String,
    object_name: String,
}

impl ProcessingLog {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        container: impl Into<String>,
        object_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            container: container.into(),
            object_name: object_name.into(),
        }
    }

    /// Reads the whole log. A missing log object is an empty log; any other
    /// failure, including undecodable content, is returned as an error.
    pub async fn read(&self) -> Result<Vec<LogEntry>, AppError> {
        let data = match self.store.fetch(&self.container, &self.object_name).await {
            Ok(data) => data,
            Err(StorageError::NotFound { .. }) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&data)?)
    }

    /// Replaces the whole log with `entries`.
    pub async fn write(&self, entries: &[LogEntry]) -> Result<(), AppError> {
        let data = serde_json::to_vec(entries)?;
        self.store
            .store(&self.container, &self.object_name, Bytes::from(data), true)
            .await?;
        Ok(())
    }

    /// Appends one entry. Read failures other than "not found" are logged and
    /// the log restarts from empty; a failed write is returned to the caller.
    pub async fn append(&self, entry: LogEntry) -> Result<(), AppError> {
        let mut entries = self.read().await.unwrap_or_else(|e| {
            tracing::warn!(
                "processing log {}/{} unreadable, starting a new one: {e}",
                self.container,
                self.object_name
            );
            Vec::new()
        });
        entries.push(entry);
        self.write(&entries).await
    }
}
