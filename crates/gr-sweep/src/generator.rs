//! Writing one group of the grid as a work queue file.

use gr_types::{GrResult, QueueError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::family::AlgorithmFamily;
use crate::partition::{GroupPlan, PartitionPolicy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of groups the grid is split into.
    pub groups: usize,
    pub policy: PartitionPolicy,
    /// Queue file to overwrite.
    pub output: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            groups: 1,
            policy: PartitionPolicy::Truncate,
            output: PathBuf::from("remaining.txt"),
        }
    }
}

impl GeneratorConfig {
    pub fn with_groups(mut self, groups: usize) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_policy(mut self, policy: PartitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

/// What a generation run wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub combinations: usize,
    pub per_group: usize,
    pub range: Range<usize>,
    pub written: usize,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Combinations: {}", self.combinations)?;
        writeln!(f, "Per group: {}", self.per_group)?;
        write!(f, "Range: [{}, {})", self.range.start, self.range.end)
    }
}

/// Overwrite the queue file with the combinations of `group`.
///
/// Deterministic: the same family, config and group always produce the same
/// file.
pub fn generate(
    family: AlgorithmFamily,
    config: &GeneratorConfig,
    group: usize,
) -> GrResult<GenerationSummary> {
    let space = family.search_space();
    let combinations = space.enumerate();
    let plan = GroupPlan::new(combinations.len(), config.groups, config.policy)?;
    let range = plan.range(group)?;

    if plan.dropped() > 0 {
        warn!(
            "{} of {} {} combinations fall outside every group",
            plan.dropped(),
            plan.total,
            family
        );
    }

    let mut contents = String::new();
    for combination in &combinations[range.clone()] {
        let line = family.encode(combination);
        debug!("queued {}", line);
        contents.push_str(&line);
        contents.push('\n');
    }

    std::fs::write(&config.output, contents).map_err(|source| QueueError::Io {
        path: config.output.clone(),
        source,
    })?;

    info!(
        "Wrote {} {} items for group {} to {}",
        range.len(),
        family,
        group,
        config.output.display()
    );

    Ok(GenerationSummary {
        combinations: plan.total,
        per_group: plan.per_group,
        written: range.len(),
        range,
    })
}
