//! Remaining/completed work queue state and its line-oriented files.

use gr_types::{GrResult, QueueError, WorkItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Items still to run and items already run, each in file order.
///
/// An item lives in exactly one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkQueueState {
    pub remaining: Vec<WorkItem>,
    pub completed: Vec<WorkItem>,
}

impl WorkQueueState {
    pub fn new(remaining: Vec<WorkItem>, completed: Vec<WorkItem>) -> Self {
        Self {
            remaining,
            completed,
        }
    }

    /// The item the next drain step runs: the last remaining one.
    pub fn peek(&self) -> Option<&WorkItem> {
        self.remaining.last()
    }

    /// Move the last remaining item to the end of completed.
    pub fn complete_last(&mut self) -> Option<WorkItem> {
        let item = self.remaining.pop()?;
        self.completed.push(item.clone());
        Some(item)
    }

    pub fn is_drained(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Total number of items across both lists.
    pub fn len(&self) -> usize {
        self.remaining.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop remaining items that are already completed. Returns how many
    /// were dropped.
    pub fn reconcile(&mut self) -> usize {
        let done: HashSet<&WorkItem> = self.completed.iter().collect();
        let before = self.remaining.len();
        self.remaining.retain(|item| {
            let duplicate = done.contains(item);
            if duplicate {
                warn!("Item already completed, dropping from remaining: {}", item);
            }
            !duplicate
        });
        before - self.remaining.len()
    }
}

/// Locations of the two queue files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueFiles {
    pub remaining: PathBuf,
    pub completed: PathBuf,
}

impl Default for QueueFiles {
    fn default() -> Self {
        Self {
            remaining: PathBuf::from("remaining.txt"),
            completed: PathBuf::from("completed.txt"),
        }
    }
}

impl QueueFiles {
    pub fn new(remaining: impl Into<PathBuf>, completed: impl Into<PathBuf>) -> Self {
        Self {
            remaining: remaining.into(),
            completed: completed.into(),
        }
    }

    /// Read both files. The remaining file must exist; a missing completed
    /// file reads as empty.
    pub fn load(&self) -> GrResult<WorkQueueState> {
        let remaining = match read_items(&self.remaining)? {
            Some(items) => items,
            None => {
                return Err(QueueError::MissingQueue {
                    path: self.remaining.clone(),
                }
                .into())
            }
        };
        let completed = read_items(&self.completed)?.unwrap_or_default();
        debug!(
            "Loaded {} remaining and {} completed items",
            remaining.len(),
            completed.len()
        );
        Ok(WorkQueueState::new(remaining, completed))
    }

    /// Rewrite both files from `state`.
    ///
    /// Completed is replaced first: a crash between the two replacements
    /// leaves the moved item in both files, which `reconcile` repairs.
    pub fn store(&self, state: &WorkQueueState) -> GrResult<()> {
        write_items(&self.completed, &state.completed)?;
        write_items(&self.remaining, &state.remaining)?;
        Ok(())
    }
}

fn read_items(path: &Path) -> GrResult<Option<Vec<WorkItem>>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(QueueError::Io {
                path: path.to_path_buf(),
                source,
            }
            .into())
        }
    };
    let items = contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(WorkItem::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(items))
}

/// Items joined with `\n`, no trailing terminator, replaced via rename.
fn write_items(path: &Path, items: &[WorkItem]) -> GrResult<()> {
    let contents = items
        .iter()
        .map(WorkItem::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let io_err = |source: std::io::Error| QueueError::Io {
        path: path.to_path_buf(),
        source,
    };
    std::fs::write(&tmp, contents).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}
