use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::QueueError;

/// Algorithm selector tokens the optimizer understands as a line prefix.
pub const ALGORITHM_TAGS: [&str; 2] = ["ag", "grasp"];

/// One line of the work queue, sent verbatim to the optimizer's stdin.
///
/// Items are trimmed on construction and never empty, so the first
/// whitespace-delimited token always exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkItem(String);

impl WorkItem {
    pub fn new(line: impl AsRef<str>) -> Result<Self, QueueError> {
        let trimmed = line.as_ref().trim();
        if trimmed.is_empty() {
            return Err(QueueError::EmptyItem);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-separated tokens of the item.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// First token of the item; names the result file.
    pub fn result_id(&self) -> &str {
        self.tokens().next().unwrap_or(self.0.as_str())
    }

    /// Result id that skips a leading algorithm tag such as `ag`.
    pub fn untagged_result_id(&self) -> &str {
        let mut tokens = self.tokens();
        match (tokens.next(), tokens.next()) {
            (Some(tag), Some(id)) if ALGORITHM_TAGS.contains(&tag) => id,
            _ => self.result_id(),
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WorkItem {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for WorkItem {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkItem> for String {
    fn from(item: WorkItem) -> Self {
        item.0
    }
}

/// Captured output of one optimizer invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// File stem the output is stored under.
    pub id: String,
    /// Combined stdout/stderr text, stored verbatim.
    pub output: String,
    /// Process exit code; `None` when the worker was killed by a signal.
    pub exit_code: Option<i32>,
}

impl ResultRecord {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}
