//! Splitting the enumerated grid into contiguous groups.

use gr_types::PartitionError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// What to do when the grid does not split evenly into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionPolicy {
    /// Floor division; the trailing `total % groups` combinations belong to
    /// no group.
    #[default]
    Truncate,
    /// Refuse uneven splits and out-of-range group indices.
    Strict,
}

/// Group layout over `total` enumerated combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPlan {
    pub total: usize,
    pub groups: usize,
    pub per_group: usize,
    pub policy: PartitionPolicy,
}

impl GroupPlan {
    pub fn new(total: usize, groups: usize, policy: PartitionPolicy) -> Result<Self, PartitionError> {
        if groups == 0 {
            return Err(PartitionError::ZeroGroups);
        }
        if policy == PartitionPolicy::Strict && total % groups != 0 {
            return Err(PartitionError::Uneven { total, groups });
        }
        Ok(Self {
            total,
            groups,
            per_group: total / groups,
            policy,
        })
    }

    /// Combinations left out of every group by floor division.
    pub fn dropped(&self) -> usize {
        self.total - self.per_group * self.groups
    }

    /// Half-open index range of `group`, clamped to the grid.
    ///
    /// Under [`PartitionPolicy::Truncate`] an index past the last group is
    /// not an error: the range is clamped like a slice past its end, so it
    /// is empty unless it reaches into the dropped remainder.
    pub fn range(&self, group: usize) -> Result<Range<usize>, PartitionError> {
        if self.policy == PartitionPolicy::Strict && group >= self.groups {
            return Err(PartitionError::GroupOutOfRange {
                group,
                groups: self.groups,
            });
        }
        let start = group.saturating_mul(self.per_group).min(self.total);
        let end = group
            .saturating_add(1)
            .saturating_mul(self.per_group)
            .min(self.total);
        Ok(start..end)
    }
}
