//! Population evolution for `evonet` networks.
//!
//! This crate improves a population of networks over generations with a simple
//! genetic algorithm: rank by fitness, drop the worst performers, and refill the
//! population with mutated clones of the survivors. There is no gradient descent
//! and no topology search; network shapes are fixed when the population is built.
//!
//! # How Training Works
//!
//! 1. **Population** - A simulation owns a set of individuals, each pairing a
//!    network with whatever per-agent state the simulation needs
//! 2. **Ticks** - On every decision tick an agent observes its world, its network
//!    picks an action, and the agent performs it ([`agent::run_tick`])
//! 3. **Fitness** - When every individual is done, the simulation reports a
//!    scalar fitness for each one
//! 4. **Evolution** - [`genetic::PopulationEvolver`] ranks, truncates and refills
//!    the population, then resets every individual for the next generation
//! 5. **Repeat**
//!
//! # Architecture
//!
//! ```text
//! Simulation (collaborator)
//!     ↓ inputs                ↑ action index
//! Brain (evonet-engine)
//!     ↓ fitness per individual
//! PopulationEvolver
//!     ↓ next generation's brains, reset + best signals
//! Simulation
//! ```
//!
//! The core never owns the simulation. It only needs, through the
//! [`genetic::Individual`] and [`agent::Agent`] traits, an input vector per tick,
//! a fitness value per individual, and somewhere to deliver the chosen action.
//!
//! # Example
//!
//! ```
//! use evonet_engine::Network;
//! use evonet_training::genetic::{Individual, PopulationEvolver};
//! use rand::SeedableRng as _;
//!
//! struct Creature {
//!     brain: Network,
//!     score: f64,
//!     best: bool,
//! }
//!
//! impl Individual for Creature {
//!     type Brain = Network;
//!     fn brain(&self) -> &Network { &self.brain }
//!     fn set_brain(&mut self, brain: Network) { self.brain = brain; }
//!     fn fitness(&self) -> f64 { self.score }
//!     fn reset(&mut self) { self.score = 0.0; self.best = false; }
//!     fn mark_best(&mut self) { self.best = true; }
//! }
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(0);
//! let mut population = (0..10)
//!     .map(|i| {
//!         let mut brain = Network::new(2, 2, 0)?;
//!         brain.randomize(&mut rng);
//!         Ok(Creature { brain, score: f64::from(i), best: false })
//!     })
//!     .collect::<Result<Vec<_>, evonet_engine::NetworkError>>()?;
//!
//! let summary = PopulationEvolver::default().evolve(&mut population, &mut rng)?;
//! assert_eq!(summary.killed, 5);
//! assert!(population[summary.best_slot].best);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Current Limitations
//!
//! - **Truncation only**: Selection is deterministic truncation; there is no
//!   tournament selection or fitness-proportional sampling
//! - **No crossover**: Offspring are mutated clones of a single parent
//! - **No elitism control**: Every survivor is carried over unchanged, so the
//!   number of preserved individuals is tied to the kill rate

pub mod agent;
pub mod genetic;
pub mod seed;
pub mod stats;
