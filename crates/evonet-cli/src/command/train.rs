use std::{num::NonZeroUsize, panic, path::PathBuf, thread};

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use evonet_engine::{Brain, NetworkError};
use evonet_training::{genetic::GenerationSummary, seed::Seed};
use rand::Rng as _;
use serde::Serialize;

use crate::{
    config::{BrainKind, TrainConfig},
    util,
    world::Walker,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training config JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of generations to run
    #[arg(long)]
    generations: Option<usize>,
    /// Number of individuals
    #[arg(long)]
    population: Option<usize>,
    /// Run seed as 32 hex digits
    #[arg(long)]
    seed: Option<Seed>,
    /// Network representation (`scalar` or `packed`)
    #[arg(long)]
    brain: Option<BrainKind>,
    /// Output file path for the run report
    #[arg(long)]
    output: Option<PathBuf>,
}

impl TrainArg {
    fn apply_to(&self, config: &mut TrainConfig) {
        if let Some(generations) = self.generations {
            config.generations = generations;
        }
        if let Some(population) = self.population {
            config.population = population;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(brain) = self.brain {
            config.brain = brain;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct GenerationRecord {
    generation: usize,
    #[serde(flatten)]
    summary: GenerationSummary,
}

#[derive(Debug, Serialize)]
struct TrainReport<'a> {
    finished_at: DateTime<Utc>,
    config: &'a TrainConfig,
    final_fitness: Option<f64>,
    generations: Vec<GenerationRecord>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let mut config = match &arg.config {
        Some(path) => TrainConfig::open(path)?,
        None => TrainConfig::default(),
    };
    arg.apply_to(&mut config);
    config.validate()?;
    let seed = *config.seed.get_or_insert_with(|| rand::rng().random());

    tracing::info!(
        %seed,
        population = config.population,
        generations = config.generations,
        brain = %config.brain,
        "training started"
    );
    let generations = train(&config, seed)?;
    let final_fitness = generations.last().map(|r| r.summary.best_fitness);
    tracing::info!(?final_fitness, "training completed");

    let report = TrainReport {
        finished_at: Utc::now(),
        config: &config,
        final_fitness,
        generations,
    };
    util::save_report(&report, arg.output.as_deref())?;
    if let Some(path) = &arg.output {
        tracing::info!(path = %path.display(), "report saved");
    }
    Ok(())
}

fn train(config: &TrainConfig, seed: Seed) -> anyhow::Result<Vec<GenerationRecord>> {
    let threads = match config.threads {
        0 => thread::available_parallelism().map_or(1, NonZeroUsize::get),
        n => n,
    };
    let mut rng = seed.rng();
    let mut population = (0..config.population)
        .map(|_| Ok(Walker::new(config.random_brain(&mut rng)?, config.arena)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut history = Vec::with_capacity(config.generations);
    for generation in 0..config.generations {
        simulate(&mut population, threads)
            .with_context(|| format!("Episode failed in generation #{generation}"))?;
        let summary = config
            .evolution
            .evolve(&mut population, &mut rng)
            .with_context(|| format!("Evolution failed in generation #{generation}"))?;
        if let Some(stats) = &summary.fitness {
            tracing::info!(
                generation,
                best = stats.max,
                mean = stats.mean,
                median = stats.median,
                "generation finished"
            );
        }
        history.push(GenerationRecord {
            generation,
            summary,
        });
    }
    Ok(history)
}

/// Plays every walker's episode, spreading the population over `threads`
/// scoped threads. Brains are only read here.
fn simulate<B>(population: &mut [Walker<B>], threads: usize) -> Result<(), NetworkError>
where
    B: Brain + Send,
{
    let chunk_size = population.len().div_ceil(threads.max(1)).max(1);
    thread::scope(|s| {
        let handles = population
            .chunks_mut(chunk_size)
            .map(|chunk| s.spawn(move || chunk.iter_mut().try_for_each(Walker::run_episode)))
            .collect::<Vec<_>>();
        handles.into_iter().try_for_each(|handle| {
            handle
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload))
        })
    })
}
