//! The genetic search loop.
//!
//! [`GaEngine`] evolves a population of operation permutations toward lower
//! makespan: evaluate → track best → notify observers → tournament selection
//! → order crossover → swap mutation → replace. Generations are strictly
//! sequential (each population depends entirely on the previous one), which
//! keeps the convergence history monotone; fitness evaluation within one
//! generation is pure and may run in parallel without changing results.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::decode::decode;
use crate::error::Error;
use crate::ga::config::GaConfig;
use crate::ga::operators::{order_crossover, random_permutation, swap_mutation};
use crate::model::{Instance, Schedule};

/// Per-generation progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best makespan found so far (across all generations).
    pub best_makespan: u64,
    /// Mean makespan of the current population.
    pub mean_makespan: f64,
    /// Number of genomes in the population.
    pub population_size: usize,
}

/// A registered progress callback.
///
/// Observers are invoked synchronously at the end of every generation, from
/// whichever thread runs the search. An observer that panics is caught and
/// reported; it never alters the search outcome. Observers needing to update
/// UI or network state should hand the event off to their own queue.
pub type ProgressObserver = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Result of one GA search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaOutcome {
    /// The best genome found during the entire run.
    pub best_genome: Vec<usize>,
    /// Makespan of `best_genome` (same as `schedule.makespan()`).
    pub best_makespan: u64,
    /// The decoded schedule of the best genome.
    pub schedule: Schedule,
    /// Number of generations actually executed.
    pub generations: usize,
    /// Whether the run was cancelled externally.
    pub cancelled: bool,
    /// Best makespan so far, one entry per executed generation.
    /// Non-increasing by construction.
    pub convergence_history: Vec<u64>,
}

/// Executes the genetic search.
///
/// One engine corresponds to one solve session: it owns its configuration
/// and observer registrations, and each [`solve`](GaEngine::solve) call owns
/// its population and random source. Engines share no mutable state, so
/// separate engines may solve concurrently.
///
/// # Usage
///
/// ```
/// use flexshop::ga::{GaConfig, GaEngine};
/// use flexshop::model::{generate, InstanceSpec};
///
/// let instance = generate(&InstanceSpec::new(3, 3).with_seed(7)).unwrap();
/// let engine = GaEngine::new(GaConfig::default().with_generations(20).with_seed(42));
/// let outcome = engine.solve(&instance).unwrap();
/// assert!(outcome.schedule.verify(&instance));
/// ```
pub struct GaEngine {
    config: GaConfig,
    observers: Vec<ProgressObserver>,
}

impl GaEngine {
    /// Creates an engine with the given configuration.
    ///
    /// The configuration is validated when a solve starts, not here, so a
    /// misconfigured engine fails fast with a typed error instead of a panic.
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Registers a progress observer for this session.
    pub fn add_observer<F>(&mut self, observer: F)
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
    }

    /// Registers an already-shared observer (used by the solver facade to
    /// fan one callback out to several strategies).
    pub fn add_shared_observer(&mut self, observer: ProgressObserver) {
        self.observers.push(observer);
    }

    /// Runs the search to the configured generation count.
    ///
    /// # Errors
    /// [`Error::InvalidConfiguration`] or [`Error::InvalidInstance`], both
    /// detected before any generation runs.
    pub fn solve(&self, instance: &Instance) -> Result<GaOutcome, Error> {
        self.solve_with_cancel(instance, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The token is checked at the top of every generation; once set, the
    /// best result found so far is returned with `cancelled = true`. Nothing
    /// inside a single generation is interrupted.
    ///
    /// # Errors
    /// Same as [`solve`](GaEngine::solve).
    pub fn solve_with_cancel(
        &self,
        instance: &Instance,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaOutcome, Error> {
        self.config.validate()?;
        instance.validate()?;

        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::seed_from_u64(rand::random()),
        };

        let n = instance.total_operations();
        let mut population: Vec<Vec<usize>> = (0..self.config.population_size)
            .map(|_| random_permutation(n, &mut rng))
            .collect();

        let mut best: Option<(Vec<usize>, u64)> = None;
        let mut history = Vec::with_capacity(self.config.generations);
        let mut cancelled = false;

        for generation in 0..self.config.generations {
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let fitness = self.evaluate(&population, instance);

            let (gen_best, &gen_best_fitness) = fitness
                .iter()
                .enumerate()
                .min_by_key(|&(_, &f)| f)
                .expect("population is never empty");
            if best.as_ref().map_or(true, |(_, b)| gen_best_fitness < *b) {
                best = Some((population[gen_best].clone(), gen_best_fitness));
            }

            let best_makespan = best.as_ref().expect("best is set above").1;
            history.push(best_makespan);

            let mean_makespan =
                fitness.iter().map(|&f| f as f64).sum::<f64>() / fitness.len() as f64;
            self.emit(&ProgressEvent {
                generation,
                best_makespan,
                mean_makespan,
                population_size: population.len(),
            });

            population = self.next_generation(&population, &fitness, &mut rng);
        }

        // generations = 0, or cancelled before the first evaluation: the
        // initial population still yields a best individual.
        let (best_genome, best_makespan) = match best {
            Some(found) => found,
            None => {
                let fitness = self.evaluate(&population, instance);
                let (idx, &fit) = fitness
                    .iter()
                    .enumerate()
                    .min_by_key(|&(_, &f)| f)
                    .expect("population is never empty");
                (population[idx].clone(), fit)
            }
        };

        let schedule = decode(&best_genome, instance, self.config.machine_selection);
        debug_assert!(schedule.verify(instance), "decoded best schedule is infeasible");

        Ok(GaOutcome {
            generations: history.len(),
            cancelled,
            convergence_history: history,
            best_makespan,
            schedule,
            best_genome,
        })
    }

    /// Decodes every genome and returns its makespan as fitness.
    fn evaluate(&self, population: &[Vec<usize>], instance: &Instance) -> Vec<u64> {
        #[cfg(feature = "parallel")]
        if self.config.parallel {
            use rayon::prelude::*;
            return population
                .par_iter()
                .map(|genome| decode(genome, instance, self.config.machine_selection).makespan())
                .collect();
        }

        population
            .iter()
            .map(|genome| decode(genome, instance, self.config.machine_selection).makespan())
            .collect()
    }

    /// Selection → crossover → mutation; the children replace the population.
    fn next_generation(
        &self,
        population: &[Vec<usize>],
        fitness: &[u64],
        rng: &mut SmallRng,
    ) -> Vec<Vec<usize>> {
        let pop_size = population.len();

        // Tournament of 3: distinct entrants per tournament, tournaments
        // repeated with replacement until the pool is full.
        let selected: Vec<&Vec<usize>> = (0..pop_size)
            .map(|_| &population[tournament(fitness, rng)])
            .collect();

        let mut children = Vec::with_capacity(pop_size);
        let mut pairs = selected.chunks_exact(2);
        for pair in &mut pairs {
            if rng.random_range(0.0..1.0) < self.config.crossover_rate {
                let (c1, c2) = order_crossover(pair[0], pair[1], rng);
                children.push(c1);
                children.push(c2);
            } else {
                children.push(pair[0].clone());
                children.push(pair[1].clone());
            }
        }
        if let [leftover] = pairs.remainder() {
            // Odd population: the unpaired survivor passes through unchanged.
            children.push((*leftover).clone());
        }

        for child in &mut children {
            if rng.random_range(0.0..1.0) < self.config.mutation_rate {
                swap_mutation(child, rng);
            }
        }

        children
    }

    /// Notifies observers, isolating their failures from the search.
    fn emit(&self, event: &ProgressEvent) {
        for observer in &self.observers {
            if catch_unwind(AssertUnwindSafe(|| observer(event))).is_err() {
                eprintln!(
                    "progress observer panicked at generation {}; search continues",
                    event.generation
                );
            }
        }
    }
}

/// Picks the fittest of 3 individuals sampled without replacement
/// (or of the whole population when it is smaller than 3).
fn tournament(fitness: &[u64], rng: &mut SmallRng) -> usize {
    let entrants = fitness.len().min(3);
    index::sample(rng, fitness.len(), entrants)
        .iter()
        .min_by_key(|&idx| fitness[idx])
        .expect("tournament sample is never empty")
}
