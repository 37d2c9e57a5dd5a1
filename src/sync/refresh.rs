use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::{remote::RemoteStore, votemap::VoteMapConfig};

/// Owned handle to the vote-map poller. Dropping it stops the task.
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Poll the vote-map config every `period`, publishing changes on `flags`.
    ///
    /// The first poll happens one full period after spawning; callers load
    /// the initial value themselves.
    pub fn spawn<S: RemoteStore>(
        store: Arc<S>,
        flags: Arc<watch::Sender<VoteMapConfig>>,
        period: Duration,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match store.fetch_votemap_config().await {
                    Ok(config) => {
                        let changed = flags.send_if_modified(|current| {
                            if *current == config {
                                return false;
                            }
                            *current = config;
                            true
                        });
                        if changed {
                            let enabled = flags.borrow().enabled;
                            tracing::info!("Vote-map config changed (enabled: {})", enabled);
                        }
                    }
                    Err(e) => tracing::warn!("Failed to refresh vote-map config: {:#}", e),
                }
            }
        });

        Self { task }
    }

    /// Stop polling now
    pub fn cancel(self) {
        drop(self);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
