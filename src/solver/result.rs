//! Uniform solve results.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{Instance, Schedule};

/// Result of one strategy solving one instance.
///
/// Created once per solve invocation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionResult {
    /// The decoded schedule of the best solution found.
    pub schedule: Schedule,
    /// Completion time of the last operation.
    pub makespan: u64,
    /// Named objective values (see [`objectives_for`]).
    pub objectives: BTreeMap<String, f64>,
    /// Id of the strategy that produced this result.
    pub algorithm: String,
    /// Wall-clock time spent solving.
    pub computation_time: Duration,
    /// Iterations executed (GA generations, or dispatch steps).
    pub iterations: usize,
    /// Best makespan so far per generation; empty for one-shot strategies.
    pub convergence_history: Vec<u64>,
}

/// Computes the objective map for a schedule:
/// `makespan`, `total_flow_time` (sum of job completion times), and
/// `mean_machine_utilization` (busy time / makespan, averaged over machines
/// that run at least one operation).
pub(crate) fn objectives_for(schedule: &Schedule, instance: &Instance) -> BTreeMap<String, f64> {
    let makespan = schedule.makespan();

    let total_flow_time: u64 = (0..instance.num_jobs)
        .filter_map(|job| schedule.job_completion(job))
        .sum();

    let busy: Vec<u64> = (0..instance.num_machines)
        .map(|m| schedule.machine_busy_time(m))
        .filter(|&b| b > 0)
        .collect();
    let mean_utilization = if makespan == 0 || busy.is_empty() {
        0.0
    } else {
        busy.iter().map(|&b| b as f64 / makespan as f64).sum::<f64>() / busy.len() as f64
    };

    let mut objectives = BTreeMap::new();
    objectives.insert("makespan".to_string(), makespan as f64);
    objectives.insert("total_flow_time".to_string(), total_flow_time as f64);
    objectives.insert("mean_machine_utilization".to_string(), mean_utilization);
    objectives
}
