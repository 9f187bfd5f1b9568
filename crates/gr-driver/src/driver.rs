//! The drain loop: run every remaining item once, last item first.

use chrono::{DateTime, Utc};
use gr_types::{DriverError, GrResult, ResultRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::checkpoint::Checkpoint;
use crate::config::DriverConfig;
use crate::results::ResultStore;
use crate::worker::Worker;

/// Unique drain session identifier, used to tag log output.
pub type SessionId = Uuid;

/// Outcome of a drain session that ran to the end of the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrainSummary {
    pub session: SessionId,
    /// Items run during this session.
    pub processed: usize,
    /// Items whose worker exited unsuccessfully; included in `processed`.
    pub failed: usize,
    pub remaining: usize,
    pub completed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl fmt::Display for DrainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} items ({} failed) in {}s; {} completed, {} remaining",
            self.processed,
            self.failed,
            (self.finished_at - self.started_at).num_seconds(),
            self.completed,
            self.remaining
        )
    }
}

/// Sequential, checkpointed driver over one pair of queue files.
pub struct Driver {
    config: DriverConfig,
    worker: Box<dyn Worker>,
}

impl Driver {
    pub fn new(config: DriverConfig, worker: Box<dyn Worker>) -> Self {
        Self { config, worker }
    }

    /// Drain the queue until it is empty or `shutdown` resolves.
    ///
    /// When `shutdown` wins, the item in flight stays in the remaining list
    /// and [`DriverError::Interrupted`] is returned. On every exit path the
    /// queue files reflect the in-memory state.
    pub async fn run<F>(&self, shutdown: F) -> GrResult<DrainSummary>
    where
        F: Future<Output = ()>,
    {
        let session = Uuid::new_v4();
        self.drain(session, shutdown)
            .instrument(info_span!("drain", session = %session))
            .await
    }

    async fn drain<F>(&self, session: SessionId, shutdown: F) -> GrResult<DrainSummary>
    where
        F: Future<Output = ()>,
    {
        let started_at = Utc::now();
        self.config.validate()?;
        let mut checkpoint = Checkpoint::load(self.config.queue.clone())?;
        if checkpoint.is_empty() {
            warn!("Work queue {} is empty", self.config.queue.remaining.display());
        }
        let dropped = checkpoint.reconcile();
        if dropped > 0 {
            warn!("Dropped {} remaining items already marked completed", dropped);
        }
        let store = ResultStore::open(&self.config.output_dir)?;
        info!(
            "Draining {} items ({} already completed) into {}",
            checkpoint.remaining.len(),
            checkpoint.completed.len(),
            store.root().display()
        );

        tokio::pin!(shutdown);
        let mut processed = 0usize;
        let mut failed = 0usize;

        while let Some(item) = checkpoint.peek().cloned() {
            info!("Config: {}", item);

            let output = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    warn!("Shutdown requested, leaving {} in the queue", item);
                    return Err(DriverError::Interrupted {
                        remaining: checkpoint.remaining.len(),
                    }
                    .into());
                }
                result = self.worker.run(&item) => result?,
            };

            let record = ResultRecord {
                id: self.config.naming.result_id(&item).to_string(),
                output: output.text,
                exit_code: output.exit_code,
            };
            if !record.succeeded() {
                failed += 1;
                warn!(
                    "Worker failed for {}, exit code: {:?}, output: {}",
                    item, record.exit_code, record.output
                );
            }

            checkpoint.complete_last();
            processed += 1;

            let path = store.write(&record)?;
            info!("{} -> {}\n{}", record.id, path.display(), record.output);

            if self.config.checkpoint_every > 0 && processed % self.config.checkpoint_every == 0 {
                checkpoint.flush()?;
            }
        }

        let state = checkpoint.finish()?;
        let summary = DrainSummary {
            session,
            processed,
            failed,
            remaining: state.remaining.len(),
            completed: state.completed.len(),
            started_at,
            finished_at: Utc::now(),
        };
        info!("{}", summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gr_types::{GrError, WorkItem};
    use std::sync::Mutex;

    use crate::config::ResultNaming;
    use crate::queue::QueueFiles;
    use crate::worker::WorkerOutput;

    /// Echoes the item back and records the order it was called in.
    #[derive(Default)]
    struct EchoWorker {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Worker for EchoWorker {
        async fn run(&self, item: &WorkItem) -> GrResult<WorkerOutput> {
            self.calls.lock().unwrap().push(item.to_string());
            Ok(WorkerOutput {
                text: format!("ran {item}"),
                exit_code: Some(0),
            })
        }
    }

    fn config_in(dir: &std::path::Path) -> DriverConfig {
        DriverConfig::default()
            .with_queue(QueueFiles::new(
                dir.join("remaining.txt"),
                dir.join("completed.txt"),
            ))
            .with_output_dir(dir.join("results"))
    }

    #[tokio::test]
    async fn drains_last_item_first() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.queue.remaining, "A 1\nB 2\nC 3").unwrap();

        let worker = std::sync::Arc::new(EchoWorker::default());
        let driver = Driver::new(config.clone(), Box::new(SharedWorker(worker.clone())));
        let summary = driver.run(std::future::pending()).await.unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.remaining, 0);
        assert_eq!(*worker.calls.lock().unwrap(), ["C 3", "B 2", "A 1"]);
        assert_eq!(std::fs::read_to_string(&config.queue.remaining).unwrap(), "");
        assert_eq!(
            std::fs::read_to_string(&config.queue.completed).unwrap(),
            "C 3\nB 2\nA 1"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("results").join("C.csv")).unwrap(),
            "ran C 3"
        );
    }

    #[tokio::test]
    async fn ready_shutdown_processes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.queue.remaining, "A\nB").unwrap();

        let driver = Driver::new(config.clone(), Box::new(EchoWorker::default()));
        let err = driver.run(std::future::ready(())).await.unwrap_err();

        assert!(matches!(
            err,
            GrError::Driver(DriverError::Interrupted { remaining: 2 })
        ));
        assert_eq!(std::fs::read_to_string(&config.queue.remaining).unwrap(), "A\nB");
        assert_eq!(std::fs::read_to_string(&config.queue.completed).unwrap(), "");
    }

    #[tokio::test]
    async fn missing_queue_fails_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let driver = Driver::new(config.clone(), Box::new(EchoWorker::default()));
        let err = driver.run(std::future::pending()).await.unwrap_err();

        assert!(matches!(err, GrError::Queue(_)));
        assert!(!config.queue.completed.exists());
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn invalid_config_fails_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let config = config
            .clone()
            .with_queue(QueueFiles::new(&config.queue.remaining, &config.queue.remaining));
        std::fs::write(&config.queue.remaining, "A").unwrap();

        let driver = Driver::new(config.clone(), Box::new(EchoWorker::default()));
        let err = driver.run(std::future::pending()).await.unwrap_err();

        assert!(matches!(err, GrError::Config(_)));
        assert_eq!(std::fs::read_to_string(&config.queue.remaining).unwrap(), "A");
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn skip_algorithm_tag_names_results_by_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path()).with_naming(ResultNaming::SkipAlgorithmTag);
        std::fs::write(
            &config.queue.remaining,
            "ag 0-200.0.95.0.0.0.005 200 0.95 0 0 0.005\nag 1-200.0.95.0.0.0.01 200 0.95 0 0 0.01",
        )
        .unwrap();

        let driver = Driver::new(config, Box::new(EchoWorker::default()));
        driver.run(std::future::pending()).await.unwrap();

        let results = dir.path().join("results");
        assert!(results.join("0-200.0.95.0.0.0.005.csv").exists());
        assert!(results.join("1-200.0.95.0.0.0.01.csv").exists());
    }

    struct SharedWorker(std::sync::Arc<EchoWorker>);

    #[async_trait]
    impl Worker for SharedWorker {
        async fn run(&self, item: &WorkItem) -> GrResult<WorkerOutput> {
            self.0.run(item).await
        }
    }
}
