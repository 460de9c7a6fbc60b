//! Solve strategies and per-solve options.
//!
//! A [`Strategy`] is one way of turning an instance into a
//! [`SolutionResult`]. Strategies share no mutable state, so the registry
//! can run several of them concurrently over the same instance.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use crate::error::Error;
use crate::ga::{GaConfig, GaEngine, ProgressEvent, ProgressObserver};
use crate::model::{Instance, Schedule, ScheduledOperation};
use crate::solver::result::{objectives_for, SolutionResult};

/// One solving strategy behind the facade.
///
/// Implementations must be self-contained: everything a solve needs arrives
/// through the instance and options, and nothing outlives the call.
pub trait Strategy: Send + Sync {
    /// Registry identifier (e.g. `"genetic"`).
    fn id(&self) -> &str;

    /// Solves the instance.
    ///
    /// # Errors
    /// Any [`Error`]; inside `solve_many` a failure is captured per strategy.
    fn solve(&self, instance: &Instance, options: &SolveOptions) -> Result<SolutionResult, Error>;
}

/// Per-solve options shared by all strategies of one facade call.
///
/// Owns the GA configuration, the registered progress observers, and an
/// optional cancellation token. Observer registrations are per solve
/// session; concurrent solves never share registrations unless the caller
/// explicitly reuses one `SolveOptions`.
#[derive(Clone, Default)]
pub struct SolveOptions {
    /// Genetic engine parameters (ignored by one-shot strategies).
    pub ga: GaConfig,
    /// Cancellation token, checked between generations.
    pub cancel: Option<Arc<AtomicBool>>,
    observers: Vec<ProgressObserver>,
}

impl SolveOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the GA configuration.
    pub fn with_ga(mut self, config: GaConfig) -> Self {
        self.ga = config;
        self
    }

    /// Sets a cancellation token.
    pub fn with_cancel(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Registers a progress observer for this solve session.
    ///
    /// The callback receives one event per generation; a panicking observer
    /// is isolated and never alters the search.
    pub fn register_progress_observer<F>(&mut self, observer: F)
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        self.observers.push(Arc::new(observer));
    }

    pub(crate) fn observers(&self) -> &[ProgressObserver] {
        &self.observers
    }
}

/// The genetic search strategy (id `"genetic"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneticStrategy;

impl Strategy for GeneticStrategy {
    fn id(&self) -> &str {
        "genetic"
    }

    fn solve(&self, instance: &Instance, options: &SolveOptions) -> Result<SolutionResult, Error> {
        let started = Instant::now();

        let mut engine = GaEngine::new(options.ga.clone());
        for observer in options.observers() {
            engine.add_shared_observer(Arc::clone(observer));
        }

        let outcome = engine.solve_with_cancel(instance, options.cancel.clone())?;
        let objectives = objectives_for(&outcome.schedule, instance);

        Ok(SolutionResult {
            makespan: outcome.best_makespan,
            schedule: outcome.schedule,
            objectives,
            algorithm: self.id().to_string(),
            computation_time: started.elapsed(),
            iterations: outcome.generations,
            convergence_history: outcome.convergence_history,
        })
    }
}

/// Deterministic earliest-completion-time list scheduler (id `"greedy"`).
///
/// Repeatedly dispatches, among each job's next unscheduled operation, the
/// one that can finish soonest on its best machine. One pass, no search;
/// useful as a fast baseline and as the second registry entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn id(&self) -> &str {
        "greedy"
    }

    fn solve(&self, instance: &Instance, _options: &SolveOptions) -> Result<SolutionResult, Error> {
        let started = Instant::now();
        instance.validate()?;

        let job_ops: Vec<Vec<usize>> = (0..instance.num_jobs)
            .map(|job| {
                instance
                    .job_operations(job)
                    .into_iter()
                    .map(|(index, _)| index)
                    .collect()
            })
            .collect();

        let mut machine_free = vec![0u64; instance.num_machines];
        let mut job_ready = vec![0u64; instance.num_jobs];
        let mut next_op = vec![0usize; instance.num_jobs];

        let n = instance.total_operations();
        let mut slots: Vec<Option<ScheduledOperation>> = vec![None; n];

        for _ in 0..n {
            // Pick the ready operation with the earliest achievable
            // completion time; ties go to the lowest job id.
            let mut choice: Option<(u64, usize, usize, usize, u64)> = None;
            for job in 0..instance.num_jobs {
                if next_op[job] >= job_ops[job].len() {
                    continue;
                }
                let op_index = job_ops[job][next_op[job]];
                let op = &instance.operations[op_index];

                let mut best = (op.eligible_machines[0], op.processing_times[0]);
                let mut best_end = machine_free[best.0].max(job_ready[job])
                    + op.setup_time
                    + best.1;
                for (&machine, &time) in
                    op.eligible_machines.iter().zip(&op.processing_times).skip(1)
                {
                    let end = machine_free[machine].max(job_ready[job]) + op.setup_time + time;
                    if end < best_end {
                        best_end = end;
                        best = (machine, time);
                    }
                }

                if choice.map_or(true, |(end, best_job, ..)| (best_end, job) < (end, best_job)) {
                    choice = Some((best_end, job, op_index, best.0, best.1));
                }
            }

            let (end, job, op_index, machine, processing_time) =
                choice.expect("an unscheduled job always has a ready operation");
            let op = &instance.operations[op_index];

            machine_free[machine] = end;
            job_ready[job] = end;
            next_op[job] += 1;

            slots[op_index] = Some(ScheduledOperation {
                job_id: op.job_id,
                operation_id: op.operation_id,
                machine,
                start: end - processing_time,
                end,
            });
        }

        let schedule = Schedule::new(
            slots
                .into_iter()
                .map(|slot| slot.expect("every operation was dispatched"))
                .collect(),
        );
        debug_assert!(schedule.verify(instance), "greedy schedule is infeasible");

        let makespan = schedule.makespan();
        let objectives = objectives_for(&schedule, instance);

        Ok(SolutionResult {
            schedule,
            makespan,
            objectives,
            algorithm: self.id().to_string(),
            computation_time: started.elapsed(),
            iterations: n,
            convergence_history: Vec::new(),
        })
    }
}
