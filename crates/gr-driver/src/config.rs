//! Driver configuration.

use gr_types::{config_error, GrResult, WorkItem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::queue::QueueFiles;
use crate::worker::WorkerCommand;

/// How a work item is turned into a result file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultNaming {
    /// First whitespace-delimited token of the item.
    #[default]
    FirstToken,
    /// Second token when the first is an algorithm tag (`ag`, `grasp`).
    SkipAlgorithmTag,
}

impl ResultNaming {
    pub fn result_id<'a>(&self, item: &'a WorkItem) -> &'a str {
        match self {
            Self::FirstToken => item.result_id(),
            Self::SkipAlgorithmTag => item.untagged_result_id(),
        }
    }
}

/// Top-level configuration for a drain session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub queue: QueueFiles,

    /// Directory receiving one `<id>.csv` per item.
    pub output_dir: PathBuf,

    pub worker: WorkerCommand,

    /// Flush the queue files after this many items; 0 flushes only when the
    /// session ends.
    pub checkpoint_every: usize,

    pub naming: ResultNaming,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            queue: QueueFiles::default(),
            output_dir: PathBuf::from("results"),
            worker: WorkerCommand::default(),
            checkpoint_every: 1,
            naming: ResultNaming::FirstToken,
        }
    }
}

impl DriverConfig {
    /// Read a JSON config; absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> GrResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Reject settings that would make a drain session misbehave.
    pub fn validate(&self) -> GrResult<()> {
        if self.worker.program.trim().is_empty() {
            return Err(config_error!("Worker program must not be empty"));
        }
        if self.queue.remaining == self.queue.completed {
            return Err(config_error!(
                "Remaining and completed queues must be different files, both are {}",
                self.queue.remaining.display()
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(config_error!("Output directory must not be empty"));
        }
        Ok(())
    }

    pub fn with_queue(mut self, queue: QueueFiles) -> Self {
        self.queue = queue;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_worker(mut self, worker: WorkerCommand) -> Self {
        self.worker = worker;
        self
    }

    pub fn with_checkpoint_every(mut self, n: usize) -> Self {
        self.checkpoint_every = n;
        self
    }

    pub fn with_naming(mut self, naming: ResultNaming) -> Self {
        self.naming = naming;
        self
    }
}
