//! Solver facade: named strategies behind one entry point.
//!
//! A [`SolverRegistry`] owns the strategies available in this process. The
//! registry doubles as the capability check: a strategy that cannot run is
//! simply never registered, so callers discover availability by listing ids
//! instead of hitting runtime errors.
//!
//! [`solve`](SolverRegistry::solve) runs exactly one strategy;
//! [`solve_many`](SolverRegistry::solve_many) runs several concurrently,
//! each with its own state, capturing per-strategy failures (including
//! panics) without aborting the siblings.

mod result;
mod strategy;

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub use result::SolutionResult;
pub use strategy::{GeneticStrategy, GreedyStrategy, SolveOptions, Strategy};

use crate::error::Error;
use crate::model::Instance;

/// Registry of named solve strategies.
///
/// # Usage
///
/// ```
/// use flexshop::model::{generate, InstanceSpec};
/// use flexshop::solver::{SolverRegistry, SolveOptions};
///
/// let instance = generate(&InstanceSpec::new(3, 3).with_seed(7)).unwrap();
/// let registry = SolverRegistry::with_defaults();
/// let result = registry.solve(&instance, "greedy", &SolveOptions::new()).unwrap();
/// assert!(result.schedule.verify(&instance));
/// ```
pub struct SolverRegistry {
    strategies: BTreeMap<String, Arc<dyn Strategy>>,
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl SolverRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Creates a registry with the built-in strategies
    /// (`genetic`, `greedy`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GeneticStrategy));
        registry.register(Arc::new(GreedyStrategy));
        registry
    }

    /// Registers a strategy under its own id, replacing any previous entry.
    pub fn register(&mut self, strategy: Arc<dyn Strategy>) {
        self.strategies.insert(strategy.id().to_string(), strategy);
    }

    /// Ids of all registered strategies, sorted.
    pub fn available(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    /// Whether a strategy id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.strategies.contains_key(id)
    }

    /// Runs one strategy on the instance.
    ///
    /// Instance and configuration are validated eagerly, before the strategy
    /// starts. A strategy panic is converted into
    /// [`Error::StrategyFailure`]; a strategy error propagates as-is.
    ///
    /// # Errors
    /// [`Error::InvalidInstance`], [`Error::InvalidConfiguration`],
    /// [`Error::UnknownStrategy`], or the strategy's own failure.
    pub fn solve(
        &self,
        instance: &Instance,
        strategy_id: &str,
        options: &SolveOptions,
    ) -> Result<SolutionResult, Error> {
        instance.validate()?;
        options.ga.validate()?;

        let strategy = self
            .strategies
            .get(strategy_id)
            .ok_or_else(|| Error::UnknownStrategy(strategy_id.to_string()))?;

        run_isolated(strategy.as_ref(), instance, options)
    }

    /// Runs several strategies concurrently and collects every outcome.
    ///
    /// Each strategy gets its own thread and owns its own population, random
    /// source, and engine; nothing mutable is shared. A failing or panicking
    /// strategy yields an `Err` entry and never aborts the others; unknown
    /// ids yield [`Error::UnknownStrategy`] entries.
    ///
    /// # Errors
    /// Only eager validation failures ([`Error::InvalidInstance`],
    /// [`Error::InvalidConfiguration`]) abort the whole call.
    pub fn solve_many(
        &self,
        instance: &Instance,
        strategy_ids: &[&str],
        options: &SolveOptions,
    ) -> Result<BTreeMap<String, Result<SolutionResult, Error>>, Error> {
        instance.validate()?;
        options.ga.validate()?;

        let mut results = BTreeMap::new();
        std::thread::scope(|scope| {
            let handles: Vec<_> = strategy_ids
                .iter()
                .map(|&id| {
                    let strategy = self.strategies.get(id).cloned();
                    scope.spawn(move || {
                        let outcome = match strategy {
                            Some(strategy) => run_isolated(strategy.as_ref(), instance, options),
                            None => Err(Error::UnknownStrategy(id.to_string())),
                        };
                        (id.to_string(), outcome)
                    })
                })
                .collect();

            for handle in handles {
                // A worker thread only panics if the panic machinery itself
                // failed; treat it as an unnamed strategy failure.
                if let Ok((id, outcome)) = handle.join() {
                    results.insert(id, outcome);
                }
            }
        });

        Ok(results)
    }
}

/// Runs a strategy, converting panics into [`Error::StrategyFailure`].
fn run_isolated(
    strategy: &dyn Strategy,
    instance: &Instance,
    options: &SolveOptions,
) -> Result<SolutionResult, Error> {
    match catch_unwind(AssertUnwindSafe(|| strategy.solve(instance, options))) {
        Ok(outcome) => outcome,
        Err(payload) => Err(Error::StrategyFailure {
            id: strategy.id().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "strategy panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::GaConfig;
    use crate::model::{generate, InstanceSpec, Operation};
    use std::sync::Mutex;

    struct FailingStrategy;

    impl Strategy for FailingStrategy {
        fn id(&self) -> &str {
            "failing"
        }

        fn solve(
            &self,
            _instance: &Instance,
            _options: &SolveOptions,
        ) -> Result<SolutionResult, Error> {
            Err(Error::StrategyFailure {
                id: self.id().to_string(),
                message: "deliberate failure".to_string(),
            })
        }
    }

    struct PanickingStrategy;

    impl Strategy for PanickingStrategy {
        fn id(&self) -> &str {
            "panicking"
        }

        fn solve(
            &self,
            _instance: &Instance,
            _options: &SolveOptions,
        ) -> Result<SolutionResult, Error> {
            panic!("deliberate panic");
        }
    }

    fn test_instance() -> Instance {
        generate(&InstanceSpec::new(3, 3).with_seed(17)).unwrap()
    }

    fn quick_options() -> SolveOptions {
        SolveOptions::new().with_ga(
            GaConfig::default()
                .with_population_size(10)
                .with_generations(10)
                .with_seed(42),
        )
    }

    #[test]
    fn test_default_registry_contents() {
        let registry = SolverRegistry::with_defaults();
        assert_eq!(registry.available(), vec!["genetic", "greedy"]);
        assert!(registry.contains("genetic"));
        assert!(!registry.contains("simulated_annealing"));
    }

    #[test]
    fn test_solve_genetic() {
        let instance = test_instance();
        let registry = SolverRegistry::with_defaults();
        let result = registry
            .solve(&instance, "genetic", &quick_options())
            .unwrap();

        assert_eq!(result.algorithm, "genetic");
        assert!(result.schedule.verify(&instance));
        assert_eq!(result.convergence_history.len(), 10);
    }

    #[test]
    fn test_solve_unknown_strategy() {
        let instance = test_instance();
        let registry = SolverRegistry::with_defaults();
        let err = registry
            .solve(&instance, "branch_and_bound", &quick_options())
            .unwrap_err();
        assert_eq!(err, Error::UnknownStrategy("branch_and_bound".to_string()));
    }

    #[test]
    fn test_solve_rejects_invalid_config_eagerly() {
        let instance = test_instance();
        let registry = SolverRegistry::with_defaults();
        let options = SolveOptions::new().with_ga(GaConfig::default().with_population_size(0));
        assert!(matches!(
            registry.solve(&instance, "genetic", &options).unwrap_err(),
            Error::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn test_solve_rejects_invalid_instance_eagerly() {
        let instance = Instance {
            name: "broken".into(),
            num_jobs: 1,
            num_machines: 1,
            operations: vec![Operation::new(0, 0, vec![], vec![])],
        };
        let registry = SolverRegistry::with_defaults();
        assert!(matches!(
            registry
                .solve(&instance, "greedy", &quick_options())
                .unwrap_err(),
            Error::InvalidInstance(_)
        ));
    }

    #[test]
    fn test_solve_converts_panic_to_failure() {
        let instance = test_instance();
        let mut registry = SolverRegistry::new();
        registry.register(Arc::new(PanickingStrategy));

        let err = registry
            .solve(&instance, "panicking", &quick_options())
            .unwrap_err();
        assert_eq!(
            err,
            Error::StrategyFailure {
                id: "panicking".to_string(),
                message: "deliberate panic".to_string(),
            }
        );
    }

    #[test]
    fn test_solve_many_all_strategies() {
        let instance = test_instance();
        let registry = SolverRegistry::with_defaults();
        let results = registry
            .solve_many(&instance, &["genetic", "greedy"], &quick_options())
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results["genetic"].is_ok());
        assert!(results["greedy"].is_ok());
    }

    #[test]
    fn test_solve_many_isolates_failures() {
        let instance = test_instance();
        let mut registry = SolverRegistry::with_defaults();
        registry.register(Arc::new(FailingStrategy));
        registry.register(Arc::new(PanickingStrategy));

        let results = registry
            .solve_many(
                &instance,
                &["genetic", "failing", "panicking"],
                &quick_options(),
            )
            .unwrap();

        let genetic = results["genetic"].as_ref().unwrap();
        assert!(genetic.schedule.verify(&instance));

        assert!(matches!(
            results["failing"].as_ref().unwrap_err(),
            Error::StrategyFailure { .. }
        ));
        assert!(matches!(
            results["panicking"].as_ref().unwrap_err(),
            Error::StrategyFailure { .. }
        ));
    }

    #[test]
    fn test_solve_many_unknown_id_entry() {
        let instance = test_instance();
        let registry = SolverRegistry::with_defaults();
        let results = registry
            .solve_many(&instance, &["greedy", "missing"], &quick_options())
            .unwrap();

        assert!(results["greedy"].is_ok());
        assert_eq!(
            results["missing"].as_ref().unwrap_err(),
            &Error::UnknownStrategy("missing".to_string())
        );
    }

    #[test]
    fn test_solve_many_rejects_invalid_config_eagerly() {
        let instance = test_instance();
        let registry = SolverRegistry::with_defaults();
        let options = SolveOptions::new().with_ga(GaConfig::default().with_population_size(1));
        assert!(matches!(
            registry
                .solve_many(&instance, &["genetic"], &options)
                .unwrap_err(),
            Error::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn test_observers_receive_events_through_facade() {
        let instance = test_instance();
        let registry = SolverRegistry::with_defaults();

        let generations: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&generations);
        let mut options = quick_options();
        options.register_progress_observer(move |event| {
            sink.lock().unwrap().push(event.generation);
        });

        registry.solve(&instance, "genetic", &options).unwrap();
        let seen = generations.lock().unwrap();
        assert_eq!(*seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_concurrent_runs_match_sequential_runs() {
        let instance = test_instance();
        let registry = SolverRegistry::with_defaults();
        let options = quick_options();

        let concurrent = registry
            .solve_many(&instance, &["genetic", "greedy"], &options)
            .unwrap();
        let sequential_genetic = registry.solve(&instance, "genetic", &options).unwrap();
        let sequential_greedy = registry.solve(&instance, "greedy", &options).unwrap();

        // Seeded runs share no state, so concurrency cannot change results.
        assert_eq!(
            concurrent["genetic"].as_ref().unwrap().schedule,
            sequential_genetic.schedule
        );
        assert_eq!(
            concurrent["greedy"].as_ref().unwrap().schedule,
            sequential_greedy.schedule
        );
    }
}
