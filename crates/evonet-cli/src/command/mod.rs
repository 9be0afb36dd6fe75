use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{bench_matmul::BenchMatmulArg, train::TrainArg};

mod bench_matmul;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter used when `RUST_LOG` is not set (e.g. `debug`, `evonet_training=trace`)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a population of goal-seeking agents
    Train(#[clap(flatten)] TrainArg),
    /// Compare serial and parallel matrix multiplication
    BenchMatmul(#[clap(flatten)] BenchMatmulArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(&args.log_level)?;
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::BenchMatmul(arg) => bench_matmul::run(&arg)?,
    }
    Ok(())
}

fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
