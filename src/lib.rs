//! Flexible job-shop scheduling engine.
//!
//! Solves the Flexible Job-Shop Scheduling Problem (FJSP): jobs are ordered
//! sequences of operations, each operation may run on any of several
//! eligible machines at a machine-specific processing time, and the goal is
//! an assignment plus timing that minimizes the makespan while respecting
//! job precedence and machine exclusivity.
//!
//! # Modules
//!
//! - **[`model`]**: `Instance`/`Operation` problem description, `Schedule`
//!   placements, random instance generation
//! - **[`graph`]**: disjunctive graph builder for precedence/conflict
//!   reasoning and external visualization
//! - **[`decode`]**: deterministic greedy decoding of permutation genomes
//!   into feasible schedules
//! - **[`ga`]**: the permutation genetic algorithm — tournament selection,
//!   order crossover, swap mutation, per-generation progress events
//! - **[`solver`]**: strategy registry facade with concurrent multi-strategy
//!   solving and per-strategy failure isolation
//!
//! # Example
//!
//! ```
//! use flexshop::model::{generate, InstanceSpec};
//! use flexshop::solver::{SolveOptions, SolverRegistry};
//! use flexshop::ga::GaConfig;
//!
//! let instance = generate(&InstanceSpec::new(3, 3).with_seed(7)).unwrap();
//!
//! let options = SolveOptions::new()
//!     .with_ga(GaConfig::default().with_generations(50).with_seed(42));
//! let registry = SolverRegistry::with_defaults();
//!
//! let results = registry
//!     .solve_many(&instance, &["genetic", "greedy"], &options)
//!     .unwrap();
//! for (id, outcome) in &results {
//!     if let Ok(result) = outcome {
//!         println!("{id}: makespan {}", result.makespan);
//!     }
//! }
//! ```
//!
//! # References
//!
//! - Brandimarte (1993), "Routing and scheduling in a flexible job shop by
//!   tabu search"
//! - Balas (1969), "Machine Sequencing via Disjunctive Graphs"
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"

pub mod decode;
pub mod error;
pub mod ga;
pub mod graph;
pub mod model;
pub mod solver;

pub use decode::{decode, MachineSelection};
pub use error::Error;
pub use ga::{GaConfig, GaEngine, GaOutcome, ProgressEvent};
pub use graph::DisjunctiveGraph;
pub use model::{generate, Instance, InstanceSpec, Operation, Schedule};
pub use solver::{SolutionResult, SolveOptions, SolverRegistry, Strategy};
