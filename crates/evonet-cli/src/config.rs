use std::path::Path;

use anyhow::{Context, ensure};
use evonet_engine::{Activation, AnyBrain, LayerOptions, Network, PackedNetwork};
use evonet_training::{genetic::PopulationEvolver, seed::Seed};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{util, world};

/// Which network representation the population uses.
#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum BrainKind {
    #[default]
    Scalar,
    Packed,
}

/// The goal-seeking world every individual is dropped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub start: [f64; 2],
    pub goal: [f64; 2],
    /// Distance per second covered by one move action.
    pub speed: f64,
    /// Simulated seconds per tick.
    pub tick_seconds: f64,
    pub ticks_per_generation: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            start: [-8.0, 4.0],
            goal: [4.0, -2.0],
            speed: 10.0,
            tick_seconds: 1.0 / 60.0,
            // 3 simulated seconds
            ticks_per_generation: 180,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub generations: usize,
    pub population: usize,
    pub brain: BrainKind,
    pub activation: Activation,
    /// Hidden layer count for [`BrainKind::Scalar`]. Each is as wide as the input.
    pub hidden_layers: usize,
    /// Hidden layer widths for [`BrainKind::Packed`].
    pub hidden_sizes: Vec<usize>,
    pub layer_options: LayerOptions,
    pub evolution: PopulationEvolver,
    pub arena: ArenaConfig,
    /// Random when absent.
    pub seed: Option<Seed>,
    /// Worker threads for episode simulation. `0` uses the available parallelism.
    pub threads: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            generations: 50,
            population: 100,
            brain: BrainKind::Scalar,
            activation: Activation::Sigmoid,
            hidden_layers: 1,
            hidden_sizes: vec![world::INPUT_COUNT],
            layer_options: LayerOptions::default(),
            evolution: PopulationEvolver::default(),
            arena: ArenaConfig::default(),
            seed: None,
            threads: 0,
        }
    }
}

impl TrainConfig {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let config: Self = util::load_json("training config", path)?;
        config
            .validate()
            .with_context(|| format!("Invalid training config: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.population > 0, "population must not be empty");
        ensure!(
            self.arena.tick_seconds.is_finite() && self.arena.tick_seconds > 0.0,
            "tick length must be positive, got {}",
            self.arena.tick_seconds
        );
        self.evolution.validate()?;
        let killed = self.evolution.kill_count(self.population);
        ensure!(
            killed < self.population,
            "kill rate {} removes all {} individuals",
            self.evolution.kill_rate,
            self.population
        );
        Ok(())
    }

    /// Builds one randomized brain with the configured shape.
    pub fn random_brain<R>(&self, rng: &mut R) -> anyhow::Result<AnyBrain>
    where
        R: Rng + ?Sized,
    {
        let mut brain = match self.brain {
            BrainKind::Scalar => AnyBrain::from(
                Network::new(world::INPUT_COUNT, world::OUTPUT_COUNT, self.hidden_layers)?
                    .with_activation(self.activation),
            ),
            BrainKind::Packed => AnyBrain::from(PackedNetwork::new(
                world::INPUT_COUNT,
                world::OUTPUT_COUNT,
                &self.hidden_sizes,
                self.activation,
                self.layer_options,
            )?),
        };
        evonet_engine::Brain::randomize(&mut brain, rng);
        Ok(brain)
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use evonet_engine::Brain as _;

    use super::*;

    #[test]
    fn test_defaults_match_goal_seeker() {
        let config = TrainConfig::default();
        assert_eq!(config.population, 100);
        assert_eq!(config.evolution, PopulationEvolver::default());
        assert_eq!(config.hidden_layers, 1);
        assert_eq!(config.arena.ticks_per_generation, 180);
        assert_eq!(config.activation, Activation::Sigmoid);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrainConfig = serde_json::from_str(
            r#"{
                "population": 20,
                "brain": "packed",
                "activation": "relu",
                "evolution": { "kill_rate": 0.25 },
                "seed": "000000000000000000000000000000ff"
            }"#,
        )
        .unwrap();
        assert_eq!(config.population, 20);
        assert_eq!(config.brain, BrainKind::Packed);
        assert_eq!(config.activation, Activation::Relu);
        assert_eq!(config.evolution.kill_rate, 0.25);
        assert_eq!(config.evolution.mutation_amount, 1.0);
        assert_eq!(config.seed, Some(Seed::from(0xff)));
        assert_eq!(config.arena, ArenaConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let mut config = TrainConfig {
            population: 0,
            ..TrainConfig::default()
        };
        assert!(config.validate().is_err());

        config.population = 4;
        config.evolution.kill_rate = 1.0;
        assert!(config.validate().is_err());

        config.evolution.kill_rate = 0.5;
        config.evolution.mutation_chance = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_random_brain_shapes() {
        let mut rng = Seed::from(0).rng();
        let scalar = TrainConfig::default().random_brain(&mut rng).unwrap();
        assert!(scalar.is_scalar());
        assert_eq!(scalar.input_count(), world::INPUT_COUNT);
        assert_eq!(scalar.output_count(), world::OUTPUT_COUNT);

        let packed = TrainConfig {
            brain: BrainKind::Packed,
            hidden_sizes: vec![8, 6],
            ..TrainConfig::default()
        }
        .random_brain(&mut rng)
        .unwrap();
        assert!(packed.is_packed());
        assert_eq!(packed.output_count(), world::OUTPUT_COUNT);
    }

    #[test]
    fn test_brain_kind_from_str() {
        assert_eq!("packed".parse::<BrainKind>().unwrap(), BrainKind::Packed);
        assert_eq!("Scalar".parse::<BrainKind>().unwrap(), BrainKind::Scalar);
    }
}
