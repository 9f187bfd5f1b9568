//! Command line front end for `gr-drive`.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, warn};

use gr_types::logging::{enable_tracing, Verbosity};

use crate::config::{DriverConfig, ResultNaming};
use crate::driver::Driver;
use crate::worker::ProcessWorker;

/// Run every queued configuration through the optimizer, resumably.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct DriveArgs {
    /// JSON driver configuration; flags below override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Problem instance passed to the optimizer
    #[arg(short, long, value_name = "FILE")]
    pub instance: Option<PathBuf>,

    /// Remaining-items queue file
    #[arg(long, value_name = "FILE")]
    pub remaining: Option<PathBuf>,

    /// Completed-items queue file
    #[arg(long, value_name = "FILE")]
    pub completed: Option<PathBuf>,

    /// Directory for per-item result files
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Name result files after the token following an `ag`/`grasp` tag
    #[arg(long)]
    pub skip_algorithm_tag: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl DriveArgs {
    pub fn resolve(&self) -> anyhow::Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => DriverConfig::from_json_file(path)
                .with_context(|| format!("reading driver config {}", path.display()))?,
            None => DriverConfig::default(),
        };
        if let Some(instance) = &self.instance {
            config.worker.instance = Some(instance.clone());
        }
        if let Some(remaining) = &self.remaining {
            config.queue.remaining = remaining.clone();
        }
        if let Some(completed) = &self.completed {
            config.queue.completed = completed.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.skip_algorithm_tag {
            config.naming = ResultNaming::SkipAlgorithmTag;
        }
        Ok(config)
    }
}

const LOG_LEVELS: Verbosity = ["info", "debug", "trace"];

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Entry point for `gr-drive`.
pub async fn run() -> anyhow::Result<()> {
    let args = DriveArgs::parse();
    enable_tracing(args.verbose, LOG_LEVELS);

    let config = args.resolve()?;
    if config.worker.instance.is_none() {
        warn!("No problem instance configured; the optimizer is started without one");
    }

    let worker = ProcessWorker::new(config.worker.clone());
    let summary = Driver::new(config, Box::new(worker))
        .run(shutdown_signal())
        .await
        .context("drain session aborted")?;
    println!("{summary}");
    Ok(())
}
