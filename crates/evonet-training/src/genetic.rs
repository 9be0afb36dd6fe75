//! Truncation-selection genetic algorithm.
//!
//! One generation transition runs four steps, in order:
//!
//! 1. **Ranking** - Individuals are sorted ascending by fitness. The sort is
//!    stable and NaN fitness ranks below every number, including `-inf`
//! 2. **Truncation** - The `round(kill_rate * n)` lowest-ranked individuals are
//!    dropped from the survivor pool. Rounding is half-to-even, so `2.5` rounds
//!    to `2` and `3.5` to `4`
//! 3. **Refill** - Survivors are cloned and mutated, cycling through the survivor
//!    list in rank order, until the pool is back to `n` networks
//! 4. **Reset** - The pool is assigned back onto the individuals in order, every
//!    individual is reset, and the slot holding the highest-ranked survivor is
//!    marked best
//!
//! The evolver reads every fitness and replaces every network, so it must run
//! with exclusive access to the population: no evaluation of the outgoing
//! generation may overlap it.
//!
//! # Parameter Errors
//!
//! Parameters are checked, never clamped. An empty population, a kill rate or
//! mutation chance outside `[0, 1]`, a negative or non-finite mutation amount,
//! or a kill rate that would remove the whole population all fail with
//! [`EvolveError`] before anything is modified.

use std::cmp::Ordering;

use evonet_engine::Brain;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::stats::FitnessStats;

/// One member of a population, as seen by the evolver.
///
/// The individual is owned by the simulation; the evolver only reads its
/// fitness and brain, hands it a new brain, and signals reset and best.
pub trait Individual {
    type Brain: Brain;

    fn brain(&self) -> &Self::Brain;

    fn set_brain(&mut self, brain: Self::Brain);

    /// Fitness for the finished generation. Higher is better.
    ///
    /// Read once per individual per generation transition.
    fn fitness(&self) -> f64;

    /// Clears per-generation state (cached fitness, death flags, best marker,
    /// position, ...). Called on every individual after the new brains are
    /// assigned.
    fn reset(&mut self);

    /// Called on exactly one individual per generation, after [`Self::reset`].
    fn mark_best(&mut self);
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum EvolveError {
    #[display("population is empty")]
    EmptyPopulation,
    #[display("kill rate {kill_rate} is outside [0, 1]")]
    KillRate { kill_rate: f64 },
    #[display("mutation chance {chance} is outside [0, 1]")]
    MutationChance { chance: f64 },
    #[display("mutation amount {amount} must be finite and non-negative")]
    MutationAmount { amount: f64 },
    #[display("killing {killed} of {population} individuals leaves no survivors")]
    NoSurvivors { population: usize, killed: usize },
}

/// Evolution parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationEvolver {
    /// Fraction of the population removed each generation, in `[0, 1]`
    pub kill_rate: f64,
    /// Per-weight probability of mutating a refill clone, in `[0, 1]`
    pub mutation_chance: f64,
    /// Mutations add a value drawn uniformly from `[-mutation_amount, mutation_amount]`
    pub mutation_amount: f64,
}

impl Default for PopulationEvolver {
    fn default() -> Self {
        Self {
            kill_rate: 0.5,
            mutation_chance: 0.5,
            mutation_amount: 1.0,
        }
    }
}

impl PopulationEvolver {
    pub fn validate(&self) -> Result<(), EvolveError> {
        if !(0.0..=1.0).contains(&self.kill_rate) {
            return Err(EvolveError::KillRate {
                kill_rate: self.kill_rate,
            });
        }
        if !(0.0..=1.0).contains(&self.mutation_chance) {
            return Err(EvolveError::MutationChance {
                chance: self.mutation_chance,
            });
        }
        if !self.mutation_amount.is_finite() || self.mutation_amount < 0.0 {
            return Err(EvolveError::MutationAmount {
                amount: self.mutation_amount,
            });
        }
        Ok(())
    }

    /// Number of individuals removed from a population of `population`.
    ///
    /// `kill_rate * population` rounded half-to-even.
    #[must_use]
    pub fn kill_count(&self, population: usize) -> usize {
        #[expect(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let killed = (self.kill_rate * population as f64).round_ties_even() as usize;
        killed.min(population)
    }

    /// Produces the next generation's brains from brains ranked ascending by
    /// fitness (worst first).
    ///
    /// The first `kill_count` brains are dropped. The survivors keep their order
    /// and are followed by mutated clones of `survivors[0]`, `survivors[1]`, ...,
    /// wrapping around, until the result has the input's length.
    pub fn next_generation<B, R>(&self, mut ranked: Vec<B>, rng: &mut R) -> Result<Vec<B>, EvolveError>
    where
        B: Brain,
        R: Rng + ?Sized,
    {
        self.validate()?;
        let population = ranked.len();
        if population == 0 {
            return Err(EvolveError::EmptyPopulation);
        }
        let killed = self.kill_count(population);
        let survivors = population - killed;
        if survivors == 0 {
            return Err(EvolveError::NoSurvivors { population, killed });
        }

        ranked.drain(..killed);
        for i in 0..killed {
            let mut child = ranked[i % survivors].clone();
            child.mutate(self.mutation_chance, self.mutation_amount, rng);
            ranked.push(child);
        }
        Ok(ranked)
    }

    /// Runs one full generation transition on `individuals`.
    ///
    /// On return the slice is sorted ascending by the fitness it had on entry,
    /// every individual holds its next-generation brain and has been reset, and
    /// exactly one individual has been marked best.
    pub fn evolve<I, R>(
        &self,
        individuals: &mut [I],
        rng: &mut R,
    ) -> Result<GenerationSummary, EvolveError>
    where
        I: Individual,
        R: Rng + ?Sized,
    {
        self.validate()?;
        let population = individuals.len();
        if population == 0 {
            return Err(EvolveError::EmptyPopulation);
        }
        let killed = self.kill_count(population);
        if killed == population {
            return Err(EvolveError::NoSurvivors { population, killed });
        }

        let fitness = rank(individuals);
        let ranked = individuals
            .iter()
            .map(|i| i.brain().clone())
            .collect::<Vec<_>>();
        let next = self.next_generation(ranked, rng)?;

        for (individual, brain) in individuals.iter_mut().zip(next) {
            individual.set_brain(brain);
        }
        for individual in individuals.iter_mut() {
            individual.reset();
        }
        let survivors = population - killed;
        let best_slot = survivors - 1;
        individuals[best_slot].mark_best();

        let summary = GenerationSummary {
            population,
            killed,
            survivors,
            best_slot,
            best_fitness: fitness[population - 1],
            fitness: FitnessStats::new(fitness.iter().copied()),
        };
        tracing::debug!(
            population,
            killed,
            survivors,
            best_fitness = summary.best_fitness,
            "generation evolved"
        );
        Ok(summary)
    }
}

/// What happened during one [`PopulationEvolver::evolve`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub population: usize,
    pub killed: usize,
    pub survivors: usize,
    /// Index of the individual marked best.
    pub best_slot: usize,
    /// Fitness of the highest-ranked individual of the finished generation.
    pub best_fitness: f64,
    /// Statistics over the finished generation's fitness, NaN excluded.
    pub fitness: Option<FitnessStats>,
}

/// Total order used for ranking: NaN below everything, otherwise numeric order.
#[must_use]
pub fn compare_fitness(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Stably sorts `individuals` ascending by fitness and returns the fitness
/// values in the new order.
///
/// Each individual's fitness is read exactly once.
pub fn rank<I>(individuals: &mut [I]) -> Vec<f64>
where
    I: Individual,
{
    let fitness = individuals
        .iter()
        .map(Individual::fitness)
        .collect::<Vec<_>>();
    let mut order = (0..individuals.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| compare_fitness(fitness[a], fitness[b]));
    let ranked = order.iter().map(|&i| fitness[i]).collect();
    permute(individuals, &mut order);
    ranked
}

/// Reorders `items` so that `items[k]` becomes the element previously at
/// `order[k]`. `order` is consumed as scratch space.
fn permute<T>(items: &mut [T], order: &mut [usize]) {
    for start in 0..items.len() {
        let mut current = start;
        loop {
            let source = order[current];
            order[current] = current;
            if source == start {
                break;
            }
            items.swap(current, source);
            current = source;
        }
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use evonet_engine::Network;
    use rand::{SeedableRng as _, seq::SliceRandom as _};
    use rand_pcg::Pcg32;

    use super::*;

    #[derive(Debug)]
    struct TestIndividual {
        id: usize,
        brain: Network,
        fitness: f64,
        resets: usize,
        best: bool,
    }

    impl Individual for TestIndividual {
        type Brain = Network;

        fn brain(&self) -> &Network {
            &self.brain
        }

        fn set_brain(&mut self, brain: Network) {
            self.brain = brain;
        }

        fn fitness(&self) -> f64 {
            self.fitness
        }

        fn reset(&mut self) {
            self.resets += 1;
            self.best = false;
        }

        fn mark_best(&mut self) {
            self.best = true;
        }
    }

    fn population(rng: &mut Pcg32, fitness: &[f64]) -> Vec<TestIndividual> {
        fitness
            .iter()
            .enumerate()
            .map(|(id, &fitness)| {
                let mut brain = Network::new(3, 2, 1).unwrap();
                brain.randomize(rng);
                TestIndividual {
                    id,
                    brain,
                    fitness,
                    resets: 0,
                    best: false,
                }
            })
            .collect()
    }

    #[test]
    fn test_kill_count_rounds_half_to_even() {
        let evolver = |kill_rate| PopulationEvolver {
            kill_rate,
            ..PopulationEvolver::default()
        };
        assert_eq!(evolver(0.5).kill_count(10), 5);
        assert_eq!(evolver(0.25).kill_count(10), 2);
        assert_eq!(evolver(0.35).kill_count(10), 4);
        assert_eq!(evolver(0.5).kill_count(5), 2);
        assert_eq!(evolver(0.5).kill_count(7), 4);
        assert_eq!(evolver(0.0).kill_count(10), 0);
        assert_eq!(evolver(1.0).kill_count(10), 10);
    }

    #[test]
    fn test_ten_individuals_half_killed() {
        let mut rng = Pcg32::seed_from_u64(60);
        let mut fitness = (0..10).map(f64::from).collect::<Vec<_>>();
        fitness.shuffle(&mut rng);
        let mut individuals = population(&mut rng, &fitness);
        let by_fitness = |f: f64| {
            individuals
                .iter()
                .find(|i| i.fitness == f)
                .unwrap()
                .brain
                .clone()
        };
        let losers = (0..5).map(|f| by_fitness(f64::from(f))).collect::<Vec<_>>();
        let winners = (5..10).map(|f| by_fitness(f64::from(f))).collect::<Vec<_>>();

        let evolver = PopulationEvolver {
            kill_rate: 0.5,
            mutation_chance: 0.5,
            mutation_amount: 1.0,
        };
        let summary = evolver.evolve(&mut individuals, &mut rng).unwrap();

        assert_eq!(individuals.len(), 10);
        assert_eq!(summary.killed, 5);
        assert_eq!(summary.survivors, 5);
        assert_eq!(summary.best_fitness, 9.0);

        for loser in &losers {
            assert!(individuals.iter().all(|i| i.brain != *loser));
        }
        // Survivors keep their networks in rank order.
        for (slot, winner) in winners.iter().enumerate() {
            assert_eq!(individuals[slot].brain, *winner);
        }
        // Refill slots hold mutated clones, not verbatim survivors.
        for individual in &individuals[5..] {
            assert!(winners.iter().all(|w| individual.brain != *w));
        }

        assert!(individuals.iter().all(|i| i.resets == 1));
        let best = individuals.iter().filter(|i| i.best).collect::<Vec<_>>();
        assert_eq!(best.len(), 1);
        assert_eq!(summary.best_slot, 4);
        assert_eq!(best[0].brain, winners[4]);
    }

    #[test]
    fn test_refill_cycles_through_survivors() {
        let mut rng = Pcg32::seed_from_u64(61);
        let brains = (0..5)
            .map(|_| {
                let mut brain = Network::new(2, 2, 0).unwrap();
                brain.randomize(&mut rng);
                brain
            })
            .collect::<Vec<_>>();
        let evolver = PopulationEvolver {
            kill_rate: 0.6,
            mutation_chance: 0.0,
            mutation_amount: 1.0,
        };
        let next = evolver.next_generation(brains.clone(), &mut rng).unwrap();
        let expected = [3, 4, 3, 4, 3].map(|i| brains[i].clone());
        assert_eq!(next, expected);
    }

    #[test]
    fn test_zero_kill_rate_keeps_networks() {
        let mut rng = Pcg32::seed_from_u64(62);
        let mut individuals = population(&mut rng, &[3.0, 1.0, 2.0]);
        let originals = individuals
            .iter()
            .map(|i| (i.id, i.brain.clone()))
            .collect::<Vec<_>>();
        let evolver = PopulationEvolver {
            kill_rate: 0.0,
            ..PopulationEvolver::default()
        };
        let summary = evolver.evolve(&mut individuals, &mut rng).unwrap();
        assert_eq!(summary.killed, 0);
        assert_eq!(
            individuals.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 2, 0]
        );
        for individual in &individuals {
            let (_, brain) = originals.iter().find(|(id, _)| *id == individual.id).unwrap();
            assert_eq!(individual.brain, *brain);
        }
        assert_eq!(summary.best_slot, 2);
        assert!(individuals[2].best);
    }

    #[test]
    fn test_nan_fitness_ranks_lowest() {
        let mut rng = Pcg32::seed_from_u64(63);
        let mut individuals = population(
            &mut rng,
            &[1.0, f64::NAN, f64::NEG_INFINITY, f64::NAN, 0.5],
        );
        let ranked = rank(&mut individuals);
        assert_eq!(
            individuals.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![1, 3, 2, 4, 0]
        );
        assert!(ranked[0].is_nan() && ranked[1].is_nan());
        assert_eq!(&ranked[2..], &[f64::NEG_INFINITY, 0.5, 1.0]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let mut rng = Pcg32::seed_from_u64(64);
        let mut individuals = population(&mut rng, &[2.0, 1.0, 2.0, 1.0, 0.0, -0.0]);
        rank(&mut individuals);
        assert_eq!(
            individuals.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![4, 5, 1, 3, 0, 2]
        );
    }

    #[test]
    fn test_invalid_parameters_fail_without_modifying() {
        let mut rng = Pcg32::seed_from_u64(65);
        let mut individuals = population(&mut rng, &[1.0, 0.0]);
        let ids = |inds: &[TestIndividual]| inds.iter().map(|i| i.id).collect::<Vec<_>>();

        for (evolver, expected) in [
            (
                PopulationEvolver {
                    kill_rate: 1.5,
                    ..PopulationEvolver::default()
                },
                EvolveError::KillRate { kill_rate: 1.5 },
            ),
            (
                PopulationEvolver {
                    kill_rate: -0.1,
                    ..PopulationEvolver::default()
                },
                EvolveError::KillRate { kill_rate: -0.1 },
            ),
            (
                PopulationEvolver {
                    mutation_chance: 2.0,
                    ..PopulationEvolver::default()
                },
                EvolveError::MutationChance { chance: 2.0 },
            ),
            (
                PopulationEvolver {
                    mutation_amount: -1.0,
                    ..PopulationEvolver::default()
                },
                EvolveError::MutationAmount { amount: -1.0 },
            ),
            (
                PopulationEvolver {
                    kill_rate: 1.0,
                    ..PopulationEvolver::default()
                },
                EvolveError::NoSurvivors {
                    population: 2,
                    killed: 2,
                },
            ),
        ] {
            assert_eq!(evolver.evolve(&mut individuals, &mut rng), Err(expected));
            assert_eq!(ids(&individuals), vec![0, 1]);
            assert!(individuals.iter().all(|i| i.resets == 0));
        }

        let nan_rate = PopulationEvolver {
            kill_rate: f64::NAN,
            ..PopulationEvolver::default()
        };
        assert!(matches!(
            nan_rate.evolve(&mut individuals, &mut rng),
            Err(EvolveError::KillRate { .. })
        ));
    }

    #[test]
    fn test_empty_population() {
        let mut rng = Pcg32::seed_from_u64(66);
        let mut individuals: Vec<TestIndividual> = vec![];
        assert_eq!(
            PopulationEvolver::default().evolve(&mut individuals, &mut rng),
            Err(EvolveError::EmptyPopulation)
        );
        assert_eq!(
            PopulationEvolver::default().next_generation(Vec::<Network>::new(), &mut rng),
            Err(EvolveError::EmptyPopulation)
        );
    }

    #[test]
    fn test_single_individual_survives() {
        let mut rng = Pcg32::seed_from_u64(67);
        let mut individuals = population(&mut rng, &[4.0]);
        let brain = individuals[0].brain.clone();
        let summary = PopulationEvolver::default()
            .evolve(&mut individuals, &mut rng)
            .unwrap();
        // round_ties_even(0.5) == 0
        assert_eq!(summary.killed, 0);
        assert_eq!(individuals[0].brain, brain);
        assert!(individuals[0].best);
    }

    #[test]
    fn test_permute() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        permute(&mut items, &mut [2, 0, 1, 4, 3]);
        assert_eq!(items, vec!['c', 'a', 'b', 'e', 'd']);
    }

    #[test]
    fn test_params_from_json_with_defaults() {
        let evolver: PopulationEvolver = serde_json::from_str(r#"{"kill_rate": 0.25}"#).unwrap();
        assert_eq!(
            evolver,
            PopulationEvolver {
                kill_rate: 0.25,
                ..PopulationEvolver::default()
            }
        );
    }
}
