//! The external optimizer, seen as a function from work item to text.

use async_trait::async_trait;
use gr_types::{GrResult, WorkItem, WorkerError};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, PipeReader};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};
use tracing::debug;

/// Text a worker produced for one item, with its exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutput {
    pub text: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Runs one work item to completion.
///
/// A non-zero exit is reported through [`WorkerOutput::exit_code`], not as
/// an error; errors are reserved for failures to run the item at all.
#[async_trait]
pub trait Worker: Send + Sync {
    async fn run(&self, item: &WorkItem) -> GrResult<WorkerOutput>;
}

/// How to launch the optimizer: `program args.. [instance] flag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Problem instance file handed to the optimizer. Omitted when unset.
    pub instance: Option<PathBuf>,
    /// Mode flag that makes the optimizer read a configuration from stdin.
    pub flag: String,
}

impl Default for WorkerCommand {
    fn default() -> Self {
        Self {
            program: "cargo".to_string(),
            args: vec!["run".into(), "--release".into(), "--".into()],
            instance: None,
            flag: "-e".to_string(),
        }
    }
}

impl WorkerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            instance: None,
            flag: String::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_instance(mut self, instance: impl Into<PathBuf>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = flag.into();
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(instance) = &self.instance {
            command.arg(instance);
        }
        if !self.flag.is_empty() {
            command.arg(&self.flag);
        }
        command
    }
}

/// Runs the optimizer as a child process, one item per process.
#[derive(Debug, Clone)]
pub struct ProcessWorker {
    command: WorkerCommand,
}

impl ProcessWorker {
    pub fn new(command: WorkerCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl Worker for ProcessWorker {
    async fn run(&self, item: &WorkItem) -> GrResult<WorkerOutput> {
        let io_err = |e: std::io::Error| WorkerError::Io(e.to_string());

        // One pipe for stdout and stderr keeps the text in the order it was
        // written.
        let (reader, writer) = std::io::pipe().map_err(io_err)?;
        let mut command = self.command.command();
        command
            .stdin(Stdio::piped())
            .stdout(writer.try_clone().map_err(io_err)?)
            .stderr(writer)
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let spawned = command.spawn();
        // The command keeps our copies of the write end open; the reader
        // only sees EOF once they are gone.
        drop(command);
        let mut child = spawned.map_err(|source| WorkerError::Spawn {
            program: self.command.program.clone(),
            source,
        })?;
        let mut group = ProcessGroup::new(child.id());

        let stdin = child.stdin.take();
        let (fed, status, captured) = tokio::join!(
            feed_stdin(stdin, item.as_str()),
            child.wait(),
            read_to_end(reader)
        );
        group.disarm();
        fed?;
        let status = status.map_err(io_err)?;
        let captured = captured.map_err(io_err)?;

        Ok(WorkerOutput {
            text: String::from_utf8_lossy(&captured).into_owned(),
            exit_code: status.code(),
        })
    }
}

async fn feed_stdin(stdin: Option<ChildStdin>, text: &str) -> GrResult<()> {
    let Some(mut stdin) = stdin else {
        return Ok(());
    };
    match stdin.write_all(text.as_bytes()).await {
        Ok(()) => Ok(()),
        // The optimizer may exit before reading its configuration.
        Err(e) if e.kind() == ErrorKind::BrokenPipe => {
            debug!("Worker closed stdin early");
            Ok(())
        }
        Err(e) => Err(WorkerError::Io(e.to_string()).into()),
    }
}

#[cfg(unix)]
async fn read_to_end(reader: PipeReader) -> std::io::Result<Vec<u8>> {
    use tokio::io::AsyncReadExt;

    let mut receiver = tokio::net::unix::pipe::Receiver::from_owned_fd(reader.into())?;
    let mut captured = Vec::new();
    receiver.read_to_end(&mut captured).await?;
    Ok(captured)
}

#[cfg(not(unix))]
async fn read_to_end(mut reader: PipeReader) -> std::io::Result<Vec<u8>> {
    use std::io::Read;

    tokio::task::spawn_blocking(move || {
        let mut captured = Vec::new();
        reader.read_to_end(&mut captured).map(|_| captured)
    })
    .await
    .map_err(std::io::Error::other)?
}

/// Kills the worker's process group if the run is abandoned before the
/// worker exits.
///
/// The worker leads its own group, so a terminal Ctrl-C reaches only the
/// driver. Killing the group also takes down anything the worker started,
/// such as the binary behind `cargo run`.
struct ProcessGroup {
    leader: Option<u32>,
}

impl ProcessGroup {
    fn new(leader: Option<u32>) -> Self {
        Self { leader }
    }

    fn disarm(&mut self) {
        self.leader = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        let Some(leader) = self.leader.take() else {
            return;
        };
        #[cfg(unix)]
        unsafe {
            libc::killpg(leader as libc::pid_t, libc::SIGKILL);
        }
        #[cfg(not(unix))]
        let _ = leader;
        debug!("Killed worker process group {}", leader);
    }
}
