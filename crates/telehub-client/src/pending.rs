//! Durable buffer for heartbeats that could not be delivered.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;
use uuid::Uuid;

use telehub_core::error::{AppError, ErrorKind};

/// A heartbeat delta that failed to reach the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingHeartbeat {
    /// The session the delta belongs to.
    pub session_id: Uuid,
    /// Active seconds the failed report carried.
    pub seconds: i64,
    /// When the failed report was attempted.
    pub timestamp: DateTime<Utc>,
}

/// Ordered, file-backed list of undelivered heartbeats.
///
/// Entries survive restarts; the file is a plain JSON array rewritten on
/// every mutation. All access goes through the internal mutex so a flush
/// cannot race with an append.
#[derive(Debug)]
pub struct PendingHeartbeatStore {
    path: PathBuf,
    entries: Mutex<Vec<PendingHeartbeat>>,
}

impl PendingHeartbeatStore {
    /// Opens the store, loading any entries left by a previous run.
    ///
    /// A missing file means an empty buffer. An unreadable file is
    /// treated the same way so a corrupt buffer cannot wedge check-in.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding corrupt heartbeat buffer");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Appends a failed heartbeat and persists the buffer.
    pub async fn append(&self, entry: PendingHeartbeat) -> Result<(), AppError> {
        let mut entries = self.entries.lock().await;
        entries.push(entry);
        self.persist(&entries).await
    }

    /// Returns the number of buffered heartbeats.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns whether the buffer is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Locks the buffer for a flush attempt.
    ///
    /// The buffer stays locked until the guard is committed or dropped;
    /// dropping without [`FlushGuard::commit`] leaves every entry in
    /// place for the next attempt.
    pub async fn begin_flush(&self) -> FlushGuard<'_> {
        FlushGuard {
            store: self,
            entries: self.entries.lock().await,
        }
    }

    async fn persist(&self, entries: &[PendingHeartbeat]) -> Result<(), AppError> {
        let bytes = serde_json::to_vec(entries).map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Cannot encode heartbeat buffer", e)
        })?;
        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Internal,
                format!("Cannot write heartbeat buffer to {}", self.path.display()),
                e,
            )
        })
    }
}

/// Exclusive view of the buffer during a flush.
pub struct FlushGuard<'a> {
    store: &'a PendingHeartbeatStore,
    entries: MutexGuard<'a, Vec<PendingHeartbeat>>,
}

impl FlushGuard<'_> {
    /// Returns the buffered seconds aggregated per session, oldest
    /// session first.
    pub fn aggregated(&self) -> Vec<(Uuid, i64)> {
        let mut totals: Vec<(Uuid, i64)> = Vec::new();
        for entry in self.entries.iter() {
            match totals.iter_mut().find(|(id, _)| *id == entry.session_id) {
                Some((_, seconds)) => *seconds += entry.seconds,
                None => totals.push((entry.session_id, entry.seconds)),
            }
        }
        totals
    }

    /// Returns whether there is anything to flush.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears the buffer after a successful flush and persists the
    /// now-empty file.
    pub async fn commit(mut self) -> Result<(), AppError> {
        self.entries.clear();
        self.store.persist(&self.entries).await
    }
}
