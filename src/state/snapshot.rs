use chrono::{DateTime, Utc};
use nfl_api::{Game, Team};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything one refresh cycle produced. Built atomically, published
/// wholesale, read-only afterwards; the next refresh replaces it entirely.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Favorite team profiles, keyed by team id. A team whose fetch failed
    /// is simply absent.
    pub favorite_teams: HashMap<String, Team>,
    /// Display games involving a favorite team.
    pub favorite_games: Vec<Game>,
    /// Favorite team ids with a game dated today (local date).
    pub teams_with_game_today: HashSet<String>,
    /// Non-favorite display games; only populated when the board is
    /// configured to show all of today's games.
    pub other_games: Vec<Game>,
    /// The full, time-adjusted game list the partitions were derived from.
    pub display_games: Vec<Game>,
    /// Per favorite team: the full season schedule, unfiltered by time.
    /// Drives next/last game resolution.
    pub schedules: HashMap<String, Vec<Game>>,
    /// Set when the whole refresh collapsed; the render path shows it.
    pub error: Option<String>,
    pub built_at: DateTime<Utc>,
}

impl Snapshot {
    /// Minimal snapshot for a total refresh failure. The render path must
    /// always have something to read.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            built_at: Utc::now(),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Shared handle to the latest snapshot. Writers replace the value
/// atomically; readers clone the `Arc` out under the lock and release it
/// immediately, then work on their private copy.
#[derive(Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<Mutex<Option<Arc<Snapshot>>>>,
}

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, snapshot: Snapshot) {
        *self.inner.lock().await = Some(Arc::new(snapshot));
    }

    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.inner.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_replaces_the_snapshot_wholesale() {
        let shared = SharedSnapshot::new();
        assert!(shared.current().await.is_none());

        shared.publish(Snapshot::error("first")).await;
        let first = shared.current().await.unwrap();
        assert_eq!(first.error.as_deref(), Some("first"));

        shared.publish(Snapshot::default()).await;
        let second = shared.current().await.unwrap();
        assert!(second.is_ok());
        // The reader's earlier copy is unaffected.
        assert_eq!(first.error.as_deref(), Some("first"));
    }
}
