use std::time::{Duration, Instant};

use anyhow::ensure;
use evonet_engine::{ExecutionStrategy, MatMul as _, Matrix};
use evonet_training::seed::Seed;
use rand::{Rng as _, RngCore};
use rand_distr::StandardNormal;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchMatmulArg {
    /// Rows of the left matrix
    #[arg(long, default_value_t = 256)]
    rows: usize,
    /// Columns of the left matrix and rows of the right matrix
    #[arg(long, default_value_t = 256)]
    inner: usize,
    /// Columns of the right matrix
    #[arg(long, default_value_t = 256)]
    cols: usize,
    /// Multiplications timed per strategy
    #[arg(long, default_value_t = 10)]
    iterations: u32,
    /// Largest allowed per-cell difference between the two strategies
    #[arg(long, default_value_t = 1e-3)]
    tolerance: f32,
    #[arg(long)]
    seed: Option<Seed>,
}

pub(crate) fn run(arg: &BenchMatmulArg) -> anyhow::Result<()> {
    let BenchMatmulArg {
        rows,
        inner,
        cols,
        iterations,
        tolerance,
        seed,
    } = *arg;
    ensure!(iterations > 0, "iterations must be positive");
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = seed.rng();
    let a = random_matrix(rows, inner, &mut rng);
    let b = random_matrix(inner, cols, &mut rng);
    tracing::info!(%seed, rows, inner, cols, iterations, "multiplying");

    let (serial, serial_time) = time(ExecutionStrategy::Serial, &a, &b, iterations)?;
    let (parallel, parallel_time) = time(ExecutionStrategy::Parallel, &a, &b, iterations)?;

    println!("Matrix multiply {rows}x{inner} * {inner}x{cols} ({iterations} iterations)");
    println!("  Serial:   {serial_time:?} per multiply");
    println!("  Parallel: {parallel_time:?} per multiply");
    println!(
        "  Speedup:  {:.2}x",
        serial_time.as_secs_f64() / parallel_time.as_secs_f64().max(f64::MIN_POSITIVE)
    );

    let diff = serial.max_abs_diff(&parallel).unwrap_or(f32::INFINITY);
    println!("  Max diff: {diff:e}");
    ensure!(
        diff <= tolerance,
        "serial and parallel results differ by {diff} (tolerance {tolerance})"
    );
    Ok(())
}

fn random_matrix<R>(rows: usize, cols: usize, rng: &mut R) -> Matrix
where
    R: RngCore,
{
    Matrix::from_fn(rows, cols, |_, _| rng.sample(StandardNormal))
}

fn time(
    strategy: ExecutionStrategy,
    a: &Matrix,
    b: &Matrix,
    iterations: u32,
) -> anyhow::Result<(Matrix, Duration)> {
    let start = Instant::now();
    let mut result = strategy.multiply(a, b)?;
    for _ in 1..iterations {
        result = strategy.multiply(a, b)?;
    }
    Ok((result, start.elapsed() / iterations))
}
