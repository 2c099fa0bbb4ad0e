use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::warn;

use common::{Direction, FeedbackRecord, FeedbackResult, SignalContext};

use crate::history::FeedbackHistory;
use crate::persist;

/// Shared feedback accessor: the in-memory history plus its JSON backing
/// file. Appends are serialized behind a single writer lock; scans take
/// read guards.
pub struct FeedbackStore {
    history: RwLock<FeedbackHistory>,
    path: PathBuf,
}

impl FeedbackStore {
    /// Open the store, loading any persisted history. An unreadable file
    /// degrades to an empty in-memory history with a warning; the scanner
    /// keeps operating without feedback effects.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = persist::load(&path).unwrap_or_else(|e| {
            warn!(error = %e, path = %path.display(), "Feedback history unreadable, starting empty");
            Vec::new()
        });
        Self { history: RwLock::new(FeedbackHistory::from_records(records)), path }
    }

    /// Read guard over the history for the duration of a scan.
    pub async fn read(&self) -> RwLockReadGuard<'_, FeedbackHistory> {
        self.history.read().await
    }

    pub async fn len(&self) -> usize {
        self.history.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.history.read().await.is_empty()
    }

    /// (total, wins, losses) for the stats endpoint.
    pub async fn stats(&self) -> (usize, usize, usize) {
        let history = self.history.read().await;
        (history.len(), history.wins(), history.losses())
    }

    /// Stamp and append one confirmed outcome, then persist the whole
    /// history. Persistence failure is logged and the append stands; the
    /// store degrades to in-memory only rather than failing the
    /// submission. Returns the new history size.
    pub async fn submit(
        &self,
        asset: String,
        direction: Direction,
        result: FeedbackResult,
        context: Option<SignalContext>,
        now: DateTime<Utc>,
    ) -> usize {
        let record = FeedbackRecord { asset, direction, result, timestamp: now, context };

        let mut history = self.history.write().await;
        history.append(record);
        if let Err(e) = persist::save(&self.path, history.records()) {
            warn!(error = %e, path = %self.path.display(), "Feedback persistence failed, continuing in-memory");
        }
        history.len()
    }
}
