//! Process-wide record of the most recent SwitchTransact call outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// Health of the upstream API as seen by the last call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiStatus {
    Unknown,
    Ok,
    Error,
}

/// Snapshot served by `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: ApiStatus,
    pub message: String,
    /// Unix seconds of the last update.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

/// Mutex-guarded status record shared by all request handlers.
///
/// Cloning is cheap and every clone observes the same record.
#[derive(Debug, Clone)]
pub struct StatusTracker {
    inner: Arc<Mutex<StatusRecord>>,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatusRecord {
                status: ApiStatus::Unknown,
                message: "API status has not been checked yet".to_string(),
                timestamp: Utc::now(),
            })),
        }
    }

    /// Overwrites the record with `status`, `message` and the current time.
    pub fn update(&self, status: ApiStatus, message: impl Into<String>) {
        let message = message.into();
        let mut record = self.lock();
        record.status = status;
        record.message = message;
        record.timestamp = Utc::now();
        tracing::info!(
            status = ?record.status,
            message = %record.message,
            "API status updated"
        );
    }

    pub fn read(&self) -> StatusRecord {
        self.lock().clone()
    }

    // A panic while holding the lock cannot leave a half-written record: every
    // field assignment above is infallible.
    fn lock(&self) -> MutexGuard<'_, StatusRecord> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
