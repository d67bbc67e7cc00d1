//! Fan-out delivery coordinator
//!
//! Spawns one task per target, prints each result line as it completes, and
//! waits for every task before stopping the progress indicator.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{BatchResult, DeliveryClient, DeliveryOutcome, DeliveryStatus, TargetId};
use crate::progress::{DEFAULT_TICK_INTERVAL, ProgressIndicator, SpinnerTask};
use crate::template::ServiceLogTemplate;

/// Errors rejecting a batch before any delivery starts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("No target clusters given")]
    NoTargets,
}

/// Delivers one notice to many targets concurrently
///
/// There is no concurrency cap and no retry: every target gets exactly one
/// task and exactly one outcome.
pub struct DeliveryCoordinator {
    client: Arc<dyn DeliveryClient>,
    indicator: Arc<dyn ProgressIndicator>,
    tick_interval: Duration,
}

impl DeliveryCoordinator {
    pub fn new(client: Arc<dyn DeliveryClient>, indicator: Arc<dyn ProgressIndicator>) -> Self {
        Self {
            client,
            indicator,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Override the indicator animation interval
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Deliver `notice` to every target and collect the outcomes
    ///
    /// Outcomes are returned in submission order; result lines are printed
    /// in completion order. Duplicate targets are delivered independently.
    pub async fn deliver(
        &self,
        notice: Arc<ServiceLogTemplate>,
        targets: &[TargetId],
    ) -> Result<BatchResult, DeliveryError> {
        debug!(target_count = targets.len(), "deliver: called");
        if targets.is_empty() {
            return Err(DeliveryError::NoTargets);
        }

        info!(target_count = targets.len(), summary = %notice.summary, "Starting delivery batch");
        let spinner = SpinnerTask::start(self.indicator.clone(), self.tick_interval);

        let handles: Vec<_> = targets
            .iter()
            .map(|target| {
                let client = self.client.clone();
                let indicator = self.indicator.clone();
                let notice = notice.clone();
                let target = target.clone();

                tokio::spawn(async move {
                    let status = match client.deliver(&target, &notice).await {
                        Ok(()) => DeliveryStatus::Success,
                        Err(e) => DeliveryStatus::Failure(format!("{:#}", e)),
                    };
                    let outcome = DeliveryOutcome { target, status };
                    match outcome.error() {
                        None => info!(cluster = %outcome.target, "Delivered service log"),
                        Some(error) => warn!(cluster = %outcome.target, %error, "Service log delivery failed"),
                    }
                    indicator.println(&outcome.to_string());
                    outcome
                })
            })
            .collect();

        // Barrier: every task has finished once this resolves
        let results = join_all(handles).await;

        let outcomes = results
            .into_iter()
            .zip(targets)
            .map(|(result, target)| match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(cluster = %target, error = %e, "Delivery task did not complete");
                    let outcome = DeliveryOutcome::failure(target.clone(), format!("delivery task failed: {}", e));
                    self.indicator.println(&outcome.to_string());
                    outcome
                }
            })
            .collect();

        spinner.stop().await;

        let batch = BatchResult::new(outcomes);
        info!(
            total = batch.len(),
            succeeded = batch.succeeded_count(),
            failed = batch.failed_count(),
            "Delivery batch complete"
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::client::mock::MockDeliveryClient;
    use crate::progress::mock::RecordingIndicator;
    use std::collections::HashSet;
    use std::sync::Mutex;

    fn notice() -> Arc<ServiceLogTemplate> {
        Arc::new(ServiceLogTemplate::from_json(br#"{"summary": "Heads up", "description": "Maintenance"}"#).unwrap())
    }

    fn targets(ids: &[&str]) -> Vec<TargetId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn coordinator(client: Arc<MockDeliveryClient>, indicator: Arc<RecordingIndicator>) -> DeliveryCoordinator {
        DeliveryCoordinator::new(client, indicator).with_tick_interval(Duration::from_millis(5))
    }

    /// Indicator that snapshots the client's completion count when finished
    struct BarrierIndicator {
        client: Arc<MockDeliveryClient>,
        completed_at_finish: Mutex<Option<usize>>,
    }

    impl ProgressIndicator for BarrierIndicator {
        fn tick(&self) {}

        fn println(&self, _line: &str) {}

        fn finish(&self) {
            *self.completed_at_finish.lock().unwrap() = Some(self.client.completed_count());
        }
    }

    #[tokio::test]
    async fn test_empty_targets_rejected() {
        let client = Arc::new(MockDeliveryClient::new());
        let indicator = Arc::new(RecordingIndicator::new());
        let coord = coordinator(client.clone(), indicator.clone());

        let err = coord.deliver(notice(), &[]).await.unwrap_err();
        assert_eq!(err, DeliveryError::NoTargets);
        assert_eq!(client.call_count(), 0);
        assert_eq!(indicator.finishes(), 0);
    }

    #[tokio::test]
    async fn test_success_and_failure_lines() {
        let client = Arc::new(MockDeliveryClient::new().failing("c2", "timeout"));
        let indicator = Arc::new(RecordingIndicator::new());
        let coord = coordinator(client.clone(), indicator.clone());

        let batch = coord.deliver(notice(), &targets(&["c1", "c2"])).await.unwrap();

        assert_eq!(batch.outcomes()[0], DeliveryOutcome::success("c1"));
        assert_eq!(batch.outcomes()[1], DeliveryOutcome::failure("c2", "timeout"));

        let lines: HashSet<String> = indicator.lines().into_iter().collect();
        let expected: HashSet<String> = ["c1\tsuccess", "c2\tfailure\ttimeout"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(lines, expected);
    }

    #[tokio::test]
    async fn test_one_outcome_per_target_including_duplicates() {
        let client = Arc::new(MockDeliveryClient::new().failing("c3", "boom"));
        let indicator = Arc::new(RecordingIndicator::new());
        let coord = coordinator(client.clone(), indicator.clone());
        let ids = targets(&["c1", "c1", "c2", "c3", "c1"]);

        let batch = coord.deliver(notice(), &ids).await.unwrap();

        assert_eq!(batch.len(), ids.len());
        assert_eq!(client.call_count(), ids.len());
        assert_eq!(indicator.lines().len(), ids.len());
        let delivered: Vec<&str> = batch.outcomes().iter().map(|o| o.target.as_str()).collect();
        assert_eq!(delivered, vec!["c1", "c1", "c2", "c3", "c1"]);
        assert_eq!(batch.failed_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_siblings() {
        let client = Arc::new(
            MockDeliveryClient::new()
                .failing("c1", "forbidden")
                .with_delay(Duration::from_millis(20)),
        );
        let indicator = Arc::new(RecordingIndicator::new());
        let coord = coordinator(client.clone(), indicator.clone());

        let batch = coord.deliver(notice(), &targets(&["c1", "c2", "c3"])).await.unwrap();

        assert_eq!(client.completed_count(), 3);
        assert_eq!(batch.succeeded_count(), 2);
        assert_eq!(batch.outcomes()[0].error(), Some("forbidden"));
    }

    #[tokio::test]
    async fn test_indicator_stops_after_barrier() {
        let client = Arc::new(MockDeliveryClient::new().with_delay(Duration::from_millis(30)));
        let indicator = Arc::new(BarrierIndicator {
            client: client.clone(),
            completed_at_finish: Mutex::new(None),
        });
        let coord = DeliveryCoordinator::new(client.clone(), indicator.clone()).with_tick_interval(Duration::from_millis(5));

        let batch = coord.deliver(notice(), &targets(&["c1", "c2", "c3", "c4"])).await.unwrap();

        assert_eq!(batch.len(), 4);
        assert_eq!(*indicator.completed_at_finish.lock().unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_indicator_finished_once() {
        let client = Arc::new(MockDeliveryClient::new().with_delay(Duration::from_millis(20)));
        let indicator = Arc::new(RecordingIndicator::new());
        let coord = coordinator(client.clone(), indicator.clone());

        coord.deliver(notice(), &targets(&["c1", "c2"])).await.unwrap();

        assert_eq!(indicator.finishes(), 1);
        assert!(indicator.ticks() >= 1);
    }

    #[tokio::test]
    async fn test_deliveries_run_concurrently() {
        let client = Arc::new(MockDeliveryClient::new().with_delay(Duration::from_millis(200)));
        let indicator = Arc::new(RecordingIndicator::new());
        let coord = coordinator(client.clone(), indicator.clone());
        let ids: Vec<TargetId> = (0..10).map(|i| format!("c{}", i)).collect();

        let started = std::time::Instant::now();
        coord.deliver(notice(), &ids).await.unwrap();

        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_panicking_task_reported_as_failure() {
        let client = Arc::new(MockDeliveryClient::new().panicking("c2"));
        let indicator = Arc::new(RecordingIndicator::new());
        let coord = coordinator(client.clone(), indicator.clone());

        let batch = coord.deliver(notice(), &targets(&["c1", "c2", "c3"])).await.unwrap();

        assert_eq!(batch.len(), 3);
        assert!(batch.outcomes()[0].is_success());
        assert!(batch.outcomes()[1].error().unwrap().contains("delivery task failed"));
        assert!(batch.outcomes()[2].is_success());
        assert_eq!(indicator.lines().len(), 3);
    }
}
