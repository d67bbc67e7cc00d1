//! Background task that animates a progress indicator

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::ProgressIndicator;

/// Default animation frame interval
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Handle to a running indicator task
///
/// The task ticks the indicator until `stop` is called (or the handle is
/// dropped), then calls `finish` exactly once.
pub struct SpinnerTask {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl SpinnerTask {
    /// Spawn the indicator task
    pub fn start(indicator: Arc<dyn ProgressIndicator>, interval: Duration) -> Self {
        debug!(?interval, "SpinnerTask::start: called");
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => indicator.tick(),
                }
            }
            indicator.finish();
            debug!("SpinnerTask: finished");
        });

        Self { stop_tx, handle }
    }

    /// Signal the task to stop and wait for it to finish the indicator
    pub async fn stop(self) {
        debug!("SpinnerTask::stop: called");
        let _ = self.stop_tx.send(());
        if let Err(e) = self.handle.await {
            warn!(error = %e, "SpinnerTask::stop: indicator task failed");
        }
    }
}
