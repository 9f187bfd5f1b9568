//! Scoped persistence of the work queue.
//!
//! A [`Checkpoint`] owns the in-memory queue state for the length of a drain
//! session. Whatever way the session ends (normal return, `?`, a panic
//! unwinding, or the drain future being dropped on interrupt) the queue
//! files are rewritten from the state before the checkpoint goes away.

use gr_types::GrResult;
use std::ops::{Deref, DerefMut};
use tracing::{debug, error};

use crate::queue::{QueueFiles, WorkQueueState};

#[derive(Debug)]
pub struct Checkpoint {
    state: WorkQueueState,
    files: QueueFiles,
    armed: bool,
}

impl Checkpoint {
    pub fn new(state: WorkQueueState, files: QueueFiles) -> Self {
        Self {
            state,
            files,
            armed: true,
        }
    }

    /// Load the queue files and take ownership of their state.
    pub fn load(files: QueueFiles) -> GrResult<Self> {
        let state = files.load()?;
        Ok(Self::new(state, files))
    }

    /// Write the current state to both queue files.
    pub fn flush(&self) -> GrResult<()> {
        self.files.store(&self.state)?;
        debug!(
            "Checkpointed {} remaining, {} completed",
            self.state.remaining.len(),
            self.state.completed.len()
        );
        Ok(())
    }

    /// Final flush. Unlike the flush on drop, a failure here is returned.
    pub fn finish(mut self) -> GrResult<WorkQueueState> {
        self.armed = false;
        self.files.store(&self.state)?;
        Ok(std::mem::take(&mut self.state))
    }
}

impl Deref for Checkpoint {
    type Target = WorkQueueState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl DerefMut for Checkpoint {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}

impl Drop for Checkpoint {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match self.files.store(&self.state) {
            Ok(()) => debug!("Queue state flushed on early exit"),
            Err(e) => error!("Failed to flush queue state on exit: {}", e),
        }
    }
}
