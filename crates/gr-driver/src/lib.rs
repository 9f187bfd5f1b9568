//! # gr-driver
//!
//! Drains a work queue against the external optimizer one item at a time,
//! storing each item's output as a result file and checkpointing the
//! remaining/completed queue files so an interrupted session can resume
//! where it stopped.

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod driver;
pub mod queue;
pub mod results;
pub mod worker;

pub use checkpoint::Checkpoint;
pub use config::{DriverConfig, ResultNaming};
pub use driver::{DrainSummary, Driver};
pub use queue::{QueueFiles, WorkQueueState};
pub use results::ResultStore;
pub use worker::{ProcessWorker, Worker, WorkerCommand, WorkerOutput};
