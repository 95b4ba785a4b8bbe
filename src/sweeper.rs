use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::engine::Engine;

/// The process-wide completion sweep task.
///
/// One instance runs per process, started once the store connection is
/// established and stopped on shutdown, so ticks never overlap. A failed
/// tick is logged and dropped; the sweep filter re-selects anything the
/// failed tick missed on the next pass, so no retry queue is kept.
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    pub fn start(engine: Arc<Engine>, period: Duration) -> Self {
        let (shutdown, mut rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match engine.sweep_elapsed_rides().await {
                            Ok(0) => {}
                            Ok(swept) => tracing::info!(swept, "aged elapsed rides to completed"),
                            Err(err) => {
                                tracing::warn!(?err, "completion sweep failed, next tick will retry")
                            }
                        }
                    }
                    _ = rx.changed() => break,
                }
            }
        });

        Self { shutdown, handle }
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
