//! In-flight submission tracking.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline state of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxState {
    /// Normalizing the request.
    Submitting,
    /// Waiting for the signer to sign and broadcast.
    Broadcasting,
    /// Broadcast accepted, waiting for the node.
    Confirming,
    /// Broadcast accepted and confirmation was not requested.
    Sent,
    Succeeded,
    Failed,
}

impl TxState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TxState::Sent | TxState::Succeeded | TxState::Failed)
    }
}

/// What is known about one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTransaction {
    pub state: TxState,
    /// Transaction id once the signer reported it.
    pub tx_id: Option<String>,
    /// Failure message for `Failed`.
    pub error: Option<String>,
    /// Last transition, seconds since epoch.
    pub updated_at: u64,
}

/// Counts of tracked submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerSummary {
    pub in_flight: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// How long finished submissions stay queryable by default.
pub const DEFAULT_FINISHED_TTL: Duration = Duration::from_secs(300);

/// Thread-safe map of submission id to state.
///
/// Finished entries older than the TTL are evicted whenever a new
/// submission begins.
#[derive(Clone)]
pub struct TransactionTracker {
    inner: Arc<DashMap<Uuid, TrackedTransaction>>,
    finished_ttl: Duration,
}

impl Default for TransactionTracker {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_FINISHED_TTL)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl TransactionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker that keeps finished submissions for `finished_ttl`.
    pub fn with_ttl(finished_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            finished_ttl,
        }
    }

    pub fn finished_ttl(&self) -> Duration {
        self.finished_ttl
    }

    /// Register a new submission in `Submitting`.
    pub fn begin(&self) -> Uuid {
        let evicted = self.prune_expired();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted expired submissions");
        }

        let id = Uuid::new_v4();
        self.inner.insert(
            id,
            TrackedTransaction {
                state: TxState::Submitting,
                tx_id: None,
                error: None,
                updated_at: now_secs(),
            },
        );
        id
    }

    /// Move a submission to `state`. Terminal entries are not reopened.
    pub fn advance(&self, id: Uuid, state: TxState) {
        if let Some(mut entry) = self.inner.get_mut(&id) {
            if entry.state.is_terminal() {
                tracing::debug!(submission = %id, from = ?entry.state, to = ?state, "Ignoring transition of finished submission");
                return;
            }
            entry.state = state;
            entry.updated_at = now_secs();
        }
    }

    pub fn set_tx_id(&self, id: Uuid, tx_id: &str) {
        if let Some(mut entry) = self.inner.get_mut(&id) {
            entry.tx_id = Some(tx_id.to_string());
        }
    }

    pub fn fail(&self, id: Uuid, message: &str) {
        if let Some(mut entry) = self.inner.get_mut(&id) {
            entry.error = Some(message.to_string());
        }
        self.advance(id, TxState::Failed);
    }

    pub fn get(&self, id: &Uuid) -> Option<TrackedTransaction> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    pub fn summary(&self) -> TrackerSummary {
        let mut summary = TrackerSummary::default();
        for r in self.inner.iter() {
            match r.value().state {
                TxState::Succeeded | TxState::Sent => summary.succeeded += 1,
                TxState::Failed => summary.failed += 1,
                _ => summary.in_flight += 1,
            }
        }
        summary
    }

    /// Drop finished submissions, returning how many were removed.
    pub fn prune_finished(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, tx| !tx.state.is_terminal());
        before - self.inner.len()
    }

    /// Drop finished submissions whose last transition is at least the TTL old.
    pub fn prune_expired(&self) -> usize {
        let now = now_secs();
        let ttl = self.finished_ttl.as_secs();
        let before = self.inner.len();
        self.inner
            .retain(|_, tx| !(tx.state.is_terminal() && now.saturating_sub(tx.updated_at) >= ttl));
        before - self.inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let tracker = TransactionTracker::new();
        let id = tracker.begin();
        assert_eq!(tracker.get(&id).unwrap().state, TxState::Submitting);

        tracker.advance(id, TxState::Broadcasting);
        tracker.set_tx_id(id, "abc");
        tracker.advance(id, TxState::Confirming);
        assert_eq!(tracker.summary().in_flight, 1);

        tracker.advance(id, TxState::Succeeded);
        let tx = tracker.get(&id).unwrap();
        assert_eq!(tx.state, TxState::Succeeded);
        assert_eq!(tx.tx_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_terminal_is_final() {
        let tracker = TransactionTracker::new();
        let id = tracker.begin();
        tracker.fail(id, "User rejected");
        tracker.advance(id, TxState::Confirming);

        let tx = tracker.get(&id).unwrap();
        assert_eq!(tx.state, TxState::Failed);
        assert_eq!(tx.error.as_deref(), Some("User rejected"));
    }

    #[test]
    fn test_summary_and_prune() {
        let tracker = TransactionTracker::new();
        let ok = tracker.begin();
        let bad = tracker.begin();
        let _pending = tracker.begin();
        tracker.advance(ok, TxState::Succeeded);
        tracker.fail(bad, "boom");

        assert_eq!(
            tracker.summary(),
            TrackerSummary {
                in_flight: 1,
                succeeded: 1,
                failed: 1
            }
        );
        assert_eq!(tracker.prune_finished(), 2);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_begin_evicts_expired_finished() {
        let tracker = TransactionTracker::with_ttl(Duration::ZERO);
        let pending = tracker.begin();
        for _ in 0..50 {
            let id = tracker.begin();
            tracker.advance(id, TxState::Succeeded);
        }

        // Only the in-flight entry and the most recent finished one remain.
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.get(&pending).unwrap().state, TxState::Submitting);
    }

    #[test]
    fn test_recent_finished_are_kept() {
        let tracker = TransactionTracker::new();
        let done = tracker.begin();
        tracker.fail(done, "boom");
        tracker.begin();

        assert_eq!(tracker.prune_expired(), 0);
        assert_eq!(tracker.get(&done).unwrap().state, TxState::Failed);
    }
}
