use gr_sweep::{cli, AlgorithmFamily};

fn main() -> anyhow::Result<()> {
    cli::run(AlgorithmFamily::Genetic)
}
