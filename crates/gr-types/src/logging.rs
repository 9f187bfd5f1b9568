//! Log output shared by the GridRun binaries.

use tracing_subscriber::EnvFilter;

/// Default filter for zero, one, and two or more `-v` flags.
pub type Verbosity = [&'static str; 3];

pub fn default_filter(verbose: u8, levels: Verbosity) -> &'static str {
    levels[usize::from(verbose.min(2))]
}

/// Install a `fmt` subscriber on stderr. `RUST_LOG` overrides the default
/// picked from `verbose`.
pub fn enable_tracing(verbose: u8, levels: Verbosity) {
    let default = default_filter(verbose, levels);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}
