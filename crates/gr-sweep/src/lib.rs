//! # gr-sweep
//!
//! Configuration generator for GridRun.
//!
//! Enumerates the Cartesian product of a fixed set of parameter axes, splits
//! it into contiguous groups and writes one group as a work queue file that
//! the driver drains against the optimizer.

pub mod cli;
mod family;
mod generator;
mod partition;
mod search;

pub use family::AlgorithmFamily;
pub use generator::{generate, GenerationSummary, GeneratorConfig};
pub use partition::{GroupPlan, PartitionPolicy};
pub use search::{Combination, ParameterDef, ParameterValue, SearchSpace};
