use crate::state::builder::SnapshotBuilder;
use crate::state::snapshot::SharedSnapshot;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::interval;

/// Rebuilds and republishes the snapshot on a fixed interval. The builder is
/// shared with the render path, which runs the very first build itself; the
/// leading tick is consumed so startup doesn't trigger two builds at once.
pub struct PeriodicRefresher {
    builder: Arc<Mutex<SnapshotBuilder>>,
    shared: SharedSnapshot,
    every: Duration,
}

impl PeriodicRefresher {
    pub fn new(
        builder: Arc<Mutex<SnapshotBuilder>>,
        shared: SharedSnapshot,
        every: Duration,
    ) -> Self {
        Self {
            builder,
            shared,
            every,
        }
    }

    pub async fn run(self) {
        let mut ticker = interval(self.every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let snapshot = self.builder.lock().await.build().await;
            debug!(
                "refreshed: {} favorite games, {} other games",
                snapshot.favorite_games.len(),
                snapshot.other_games.len()
            );
            self.shared.publish(snapshot).await;
        }
    }
}
