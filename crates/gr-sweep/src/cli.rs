//! Command line front end shared by the generator binaries.

use anyhow::Context;
use clap::Parser;
use gr_types::logging::{enable_tracing, Verbosity};
use std::path::PathBuf;

use crate::family::AlgorithmFamily;
use crate::generator::{generate, GeneratorConfig};
use crate::partition::PartitionPolicy;

/// Write one group of the experiment grid to the work queue file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct GenerateArgs {
    /// Group to write (0-based)
    pub group: usize,

    /// Number of groups the grid is split into
    #[arg(long, default_value_t = 1)]
    pub groups: usize,

    /// Fail instead of dropping combinations when the split is uneven
    #[arg(long)]
    pub strict: bool,

    /// Work queue file to overwrite
    #[arg(short, long, default_value = "remaining.txt")]
    pub output: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GenerateArgs {
    pub fn config(&self) -> GeneratorConfig {
        let policy = if self.strict {
            PartitionPolicy::Strict
        } else {
            PartitionPolicy::Truncate
        };
        GeneratorConfig::default()
            .with_groups(self.groups)
            .with_policy(policy)
            .with_output(&self.output)
    }
}

// Warn by default so stdout carries only the summary.
const LOG_LEVELS: Verbosity = ["warn", "info", "debug"];

/// Entry point for `gr-gen-ga` and `gr-gen-grasp`.
pub fn run(family: AlgorithmFamily) -> anyhow::Result<()> {
    let args = GenerateArgs::parse();
    enable_tracing(args.verbose, LOG_LEVELS);

    let summary = generate(family, &args.config(), args.group)
        .with_context(|| format!("generating {family} group {}", args.group))?;
    println!("{summary}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_group_only() {
        let args = GenerateArgs::try_parse_from(["gr-gen-ga", "2"]).unwrap();
        assert_eq!(args.group, 2);
        assert_eq!(args.config(), GeneratorConfig::default());
    }

    #[test]
    fn optional_flags_override_defaults() {
        let args = GenerateArgs::try_parse_from([
            "gr-gen-grasp", "1", "--groups", "3", "--strict", "-o", "queue.txt",
        ])
        .unwrap();
        let config = args.config();
        assert_eq!(config.groups, 3);
        assert_eq!(config.policy, PartitionPolicy::Strict);
        assert_eq!(config.output, PathBuf::from("queue.txt"));
    }

    #[test]
    fn group_must_be_a_non_negative_integer() {
        assert!(GenerateArgs::try_parse_from(["gr-gen-ga"]).is_err());
        assert!(GenerateArgs::try_parse_from(["gr-gen-ga", "-1"]).is_err());
        assert!(GenerateArgs::try_parse_from(["gr-gen-ga", "one"]).is_err());
    }
}
