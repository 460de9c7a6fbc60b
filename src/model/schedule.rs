//! Concrete schedules: machine assignments and time intervals.
//!
//! A [`Schedule`] is a derived artifact — the decoder produces a fresh one
//! per genome, nothing mutates it in place. It carries its own feasibility
//! verifier so tests and debug builds can check machine exclusivity and job
//! precedence directly against the instance.

use serde::{Deserialize, Serialize};

use crate::model::Instance;

/// One operation placed on a machine with a concrete time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOperation {
    /// Job the operation belongs to.
    pub job_id: usize,
    /// Position of the operation within its job.
    pub operation_id: usize,
    /// Machine the operation was assigned to.
    pub machine: usize,
    /// Start time (setup included).
    pub start: u64,
    /// End time; `end - start` is the processing time.
    pub end: u64,
}

/// A complete schedule for an instance.
///
/// Assignments are indexed like `Instance::operations`, so
/// `assignments()[i]` is the placement of operation `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    assignments: Vec<ScheduledOperation>,
    makespan: u64,
}

impl Schedule {
    /// Builds a schedule from per-operation assignments.
    pub(crate) fn new(assignments: Vec<ScheduledOperation>) -> Self {
        let makespan = assignments.iter().map(|a| a.end).max().unwrap_or(0);
        Self {
            assignments,
            makespan,
        }
    }

    /// Completion time of the last operation to finish.
    pub fn makespan(&self) -> u64 {
        self.makespan
    }

    /// All placements, in instance operation order.
    pub fn assignments(&self) -> &[ScheduledOperation] {
        &self.assignments
    }

    /// Intervals assigned to one machine, sorted by start time.
    pub fn machine_intervals(&self, machine: usize) -> Vec<(u64, u64)> {
        let mut intervals: Vec<(u64, u64)> = self
            .assignments
            .iter()
            .filter(|a| a.machine == machine)
            .map(|a| (a.start, a.end))
            .collect();
        intervals.sort_unstable();
        intervals
    }

    /// Completion time of a job's last operation, if the job is present.
    pub fn job_completion(&self, job_id: usize) -> Option<u64> {
        self.assignments
            .iter()
            .filter(|a| a.job_id == job_id)
            .map(|a| a.end)
            .max()
    }

    /// Total busy time of one machine.
    pub fn machine_busy_time(&self, machine: usize) -> u64 {
        self.assignments
            .iter()
            .filter(|a| a.machine == machine)
            .map(|a| a.end - a.start)
            .sum()
    }

    /// Checks that the schedule is feasible for `instance`:
    /// no machine runs two operations at once, every job's operations run in
    /// `operation_id` order, and every assignment uses an eligible machine.
    pub fn verify(&self, instance: &Instance) -> bool {
        if self.assignments.len() != instance.total_operations() {
            return false;
        }

        for (assignment, op) in self.assignments.iter().zip(&instance.operations) {
            if assignment.job_id != op.job_id || assignment.operation_id != op.operation_id {
                return false;
            }
            if !op.eligible_machines.contains(&assignment.machine) {
                return false;
            }
            if assignment.end < assignment.start {
                return false;
            }
        }

        for machine in 0..instance.num_machines {
            let intervals = self.machine_intervals(machine);
            for pair in intervals.windows(2) {
                if pair[1].0 < pair[0].1 {
                    return false;
                }
            }
        }

        for job in 0..instance.num_jobs {
            let ops = instance.job_operations(job);
            for pair in ops.windows(2) {
                let prev = &self.assignments[pair[0].0];
                let next = &self.assignments[pair[1].0];
                if next.start < prev.end {
                    return false;
                }
            }
        }

        true
    }
}
