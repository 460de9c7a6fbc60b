//! Unified FJSP instance model.
//!
//! An [`Instance`] describes jobs, operations, eligible machines, and
//! machine-specific processing times. Instances are immutable after
//! construction: [`Instance::new`] validates every structural invariant and
//! rejects malformed data with [`Error::InvalidInstance`] before any
//! consumer sees it.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One indivisible unit of work belonging to a job.
///
/// `eligible_machines` and `processing_times` are positionally aligned:
/// running this operation on `eligible_machines[k]` takes
/// `processing_times[k]` time units. `operation_id` is the operation's
/// zero-based position within its job, so ordering within a job is total
/// and implicit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Id of the job this operation belongs to.
    pub job_id: usize,
    /// Zero-based position within the job's operation sequence.
    pub operation_id: usize,
    /// Machines this operation may run on. Never empty in a valid instance.
    pub eligible_machines: Vec<usize>,
    /// Processing time per eligible machine, aligned by index.
    pub processing_times: Vec<u64>,
    /// Setup time applied before the operation starts.
    #[serde(default)]
    pub setup_time: u64,
}

impl Operation {
    /// Creates an operation with zero setup time.
    pub fn new(
        job_id: usize,
        operation_id: usize,
        eligible_machines: Vec<usize>,
        processing_times: Vec<u64>,
    ) -> Self {
        Self {
            job_id,
            operation_id,
            eligible_machines,
            processing_times,
            setup_time: 0,
        }
    }

    /// Sets the setup time.
    pub fn with_setup_time(mut self, setup_time: u64) -> Self {
        self.setup_time = setup_time;
        self
    }

    /// Shortest processing time over all eligible machines.
    ///
    /// Used as the fixed weight of conjunctive graph edges (the minimal
    /// precedence gap this operation imposes on its successor).
    pub fn min_processing_time(&self) -> u64 {
        self.processing_times.iter().copied().min().unwrap_or(0)
    }
}

/// An immutable FJSP instance.
///
/// # Invariants (enforced by [`Instance::new`] / [`Instance::validate`])
///
/// - `num_jobs > 0`, `num_machines > 0`
/// - every job id in `[0, num_jobs)` owns a contiguous operation sequence
///   with ids `0..k`, `k >= 1`
/// - every operation has at least one eligible machine, with one processing
///   time per machine, and every machine id lies in `[0, num_machines)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name, used in results and exports.
    pub name: String,
    /// Number of jobs.
    pub num_jobs: usize,
    /// Number of machines.
    pub num_machines: usize,
    /// All operations, across all jobs.
    pub operations: Vec<Operation>,
}

impl Instance {
    /// Creates a validated instance.
    ///
    /// # Errors
    /// [`Error::InvalidInstance`] if any structural invariant is violated.
    pub fn new(
        name: impl Into<String>,
        num_jobs: usize,
        num_machines: usize,
        operations: Vec<Operation>,
    ) -> Result<Self, Error> {
        let instance = Self {
            name: name.into(),
            num_jobs,
            num_machines,
            operations,
        };
        instance.validate()?;
        Ok(instance)
    }

    /// Checks every structural invariant.
    ///
    /// Run eagerly by [`Instance::new`], the graph builder, and the solver
    /// facade; a failure is reported to the caller, never corrected.
    ///
    /// # Errors
    /// [`Error::InvalidInstance`] naming the first violation found.
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_jobs == 0 {
            return Err(Error::invalid_instance("num_jobs must be positive"));
        }
        if self.num_machines == 0 {
            return Err(Error::invalid_instance("num_machines must be positive"));
        }

        let mut ops_per_job = vec![Vec::new(); self.num_jobs];
        for (index, op) in self.operations.iter().enumerate() {
            if op.job_id >= self.num_jobs {
                return Err(Error::invalid_instance(format!(
                    "operation {index} references job {} outside [0, {})",
                    op.job_id, self.num_jobs
                )));
            }
            if op.eligible_machines.is_empty() {
                return Err(Error::invalid_instance(format!(
                    "operation {index} (job {}) has no eligible machines",
                    op.job_id
                )));
            }
            if op.eligible_machines.len() != op.processing_times.len() {
                return Err(Error::invalid_instance(format!(
                    "operation {index} (job {}) has {} machines but {} processing times",
                    op.job_id,
                    op.eligible_machines.len(),
                    op.processing_times.len()
                )));
            }
            for &machine in &op.eligible_machines {
                if machine >= self.num_machines {
                    return Err(Error::invalid_instance(format!(
                        "operation {index} (job {}) references machine {machine} outside [0, {})",
                        op.job_id, self.num_machines
                    )));
                }
            }
            ops_per_job[op.job_id].push(op.operation_id);
        }

        for (job, mut ids) in ops_per_job.into_iter().enumerate() {
            if ids.is_empty() {
                return Err(Error::invalid_instance(format!(
                    "job {job} has no operations"
                )));
            }
            ids.sort_unstable();
            for (expected, actual) in ids.iter().enumerate() {
                if *actual != expected {
                    return Err(Error::invalid_instance(format!(
                        "job {job} operation ids are not contiguous from 0 (found {actual}, expected {expected})"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Total operation count across all jobs (the genome length).
    pub fn total_operations(&self) -> usize {
        self.operations.len()
    }

    /// Operations of one job, as `(operation index, operation)` pairs in
    /// `operation_id` order.
    pub fn job_operations(&self, job_id: usize) -> Vec<(usize, &Operation)> {
        let mut ops: Vec<(usize, &Operation)> = self
            .operations
            .iter()
            .enumerate()
            .filter(|(_, op)| op.job_id == job_id)
            .collect();
        ops.sort_by_key(|(_, op)| op.operation_id);
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_job_instance() -> Instance {
        Instance::new(
            "two_jobs",
            2,
            2,
            vec![
                Operation::new(0, 0, vec![0, 1], vec![3, 5]),
                Operation::new(0, 1, vec![0, 1], vec![4, 2]),
                Operation::new(1, 0, vec![0, 1], vec![3, 5]),
                Operation::new(1, 1, vec![0, 1], vec![4, 2]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_valid_instance() {
        let instance = two_job_instance();
        assert_eq!(instance.total_operations(), 4);
        assert_eq!(instance.job_operations(1).len(), 2);
        assert!(instance.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_jobs() {
        let err = Instance::new("bad", 0, 2, vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_zero_machines() {
        let err = Instance::new("bad", 1, 0, vec![Operation::new(0, 0, vec![0], vec![1])])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_empty_machine_list() {
        let err =
            Instance::new("bad", 1, 2, vec![Operation::new(0, 0, vec![], vec![])]).unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_mismatched_times() {
        let err = Instance::new("bad", 1, 2, vec![Operation::new(0, 0, vec![0, 1], vec![3])])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_machine_out_of_range() {
        let err = Instance::new("bad", 1, 2, vec![Operation::new(0, 0, vec![2], vec![3])])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_gap_in_operation_ids() {
        let err = Instance::new(
            "bad",
            1,
            2,
            vec![
                Operation::new(0, 0, vec![0], vec![3]),
                Operation::new(0, 2, vec![1], vec![4]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_job_without_operations() {
        let err = Instance::new("bad", 2, 2, vec![Operation::new(0, 0, vec![0], vec![3])])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_min_processing_time() {
        let op = Operation::new(0, 0, vec![1, 0], vec![7, 4]);
        assert_eq!(op.min_processing_time(), 4);
    }

    #[test]
    fn test_serde_round_trip() {
        let instance = two_job_instance();
        let json = serde_json::to_string(&instance).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(instance, back);
    }
}
