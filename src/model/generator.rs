//! Random FJSP instance construction.
//!
//! [`InstanceSpec`] describes the shape of an instance — job/machine counts,
//! operations per job, processing time range, and a flexibility ratio that
//! controls how many machines each operation may run on. [`generate`] turns a
//! spec into a validated [`Instance`].

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Instance, Operation};

/// Shape parameters for a random FJSP instance.
///
/// # Builder Pattern
///
/// ```
/// use flexshop::model::InstanceSpec;
///
/// let spec = InstanceSpec::new(3, 3)
///     .with_max_operations_per_job(4)
///     .with_processing_times(1, 10)
///     .with_flexibility(0.7)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSpec {
    /// Number of jobs. Must be positive.
    pub num_jobs: usize,
    /// Number of machines. Must be positive.
    pub num_machines: usize,
    /// Upper bound on operations per job; each job draws from `1..=max`.
    pub max_operations_per_job: usize,
    /// Minimum processing time (inclusive).
    pub min_processing_time: u64,
    /// Maximum processing time (inclusive).
    pub max_processing_time: u64,
    /// Fraction of machines eligible per operation, in `[0, 1]`.
    ///
    /// Each operation gets `max(1, num_machines * flexibility)` eligible
    /// machines, sampled without replacement.
    pub flexibility: f64,
    /// Random seed. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl InstanceSpec {
    /// Creates a spec with the default shape: up to 5 operations per job,
    /// processing times in `1..=10`, flexibility 0.5.
    pub fn new(num_jobs: usize, num_machines: usize) -> Self {
        Self {
            num_jobs,
            num_machines,
            max_operations_per_job: 5,
            min_processing_time: 1,
            max_processing_time: 10,
            flexibility: 0.5,
            seed: None,
        }
    }

    /// Sets the operations-per-job upper bound.
    pub fn with_max_operations_per_job(mut self, max: usize) -> Self {
        self.max_operations_per_job = max;
        self
    }

    /// Sets the inclusive processing time range.
    pub fn with_processing_times(mut self, min: u64, max: u64) -> Self {
        self.min_processing_time = min;
        self.max_processing_time = max;
        self
    }

    /// Sets the flexibility ratio, clamped to `[0, 1]`.
    pub fn with_flexibility(mut self, flexibility: f64) -> Self {
        self.flexibility = flexibility.clamp(0.0, 1.0);
        self
    }

    /// Sets the random seed for reproducible generation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the spec.
    ///
    /// # Errors
    /// [`Error::InvalidInstance`] on non-positive counts, an empty time
    /// range, or an out-of-range flexibility.
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_jobs == 0 {
            return Err(Error::invalid_instance("num_jobs must be positive"));
        }
        if self.num_machines == 0 {
            return Err(Error::invalid_instance("num_machines must be positive"));
        }
        if self.max_operations_per_job == 0 {
            return Err(Error::invalid_instance(
                "max_operations_per_job must be positive",
            ));
        }
        if self.min_processing_time > self.max_processing_time {
            return Err(Error::invalid_instance(format!(
                "processing time range {}..={} is empty",
                self.min_processing_time, self.max_processing_time
            )));
        }
        if !(0.0..=1.0).contains(&self.flexibility) {
            return Err(Error::invalid_instance(format!(
                "flexibility {} outside [0, 1]",
                self.flexibility
            )));
        }
        Ok(())
    }
}

/// Generates a random instance from `spec`.
///
/// The result always satisfies [`Instance::validate`]; every operation gets
/// at least one eligible machine regardless of flexibility.
///
/// # Errors
/// [`Error::InvalidInstance`] if the spec itself is malformed.
pub fn generate(spec: &InstanceSpec) -> Result<Instance, Error> {
    spec.validate()?;

    let mut rng = match spec.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::seed_from_u64(rand::random()),
    };

    let eligible_count = ((spec.num_machines as f64 * spec.flexibility) as usize)
        .clamp(1, spec.num_machines);

    let mut operations = Vec::new();
    for job_id in 0..spec.num_jobs {
        let op_count = rng.random_range(1..=spec.max_operations_per_job);
        for operation_id in 0..op_count {
            let machines = index::sample(&mut rng, spec.num_machines, eligible_count).into_vec();
            let times = machines
                .iter()
                .map(|_| rng.random_range(spec.min_processing_time..=spec.max_processing_time))
                .collect();
            operations.push(Operation::new(job_id, operation_id, machines, times));
        }
    }

    Instance::new(
        format!("random_fjsp_{}x{}", spec.num_jobs, spec.num_machines),
        spec.num_jobs,
        spec.num_machines,
        operations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_instance_is_valid() {
        let spec = InstanceSpec::new(4, 3).with_seed(42);
        let instance = generate(&spec).unwrap();

        assert_eq!(instance.num_jobs, 4);
        assert_eq!(instance.num_machines, 3);
        assert!(instance.validate().is_ok());
        assert!(instance.total_operations() >= 4);
        for op in &instance.operations {
            assert!(!op.eligible_machines.is_empty());
            for &t in &op.processing_times {
                assert!((1..=10).contains(&t));
            }
        }
    }

    #[test]
    fn test_zero_flexibility_still_yields_one_machine() {
        let spec = InstanceSpec::new(2, 4).with_flexibility(0.0).with_seed(7);
        let instance = generate(&spec).unwrap();
        for op in &instance.operations {
            assert_eq!(op.eligible_machines.len(), 1);
        }
    }

    #[test]
    fn test_full_flexibility_uses_all_machines() {
        let spec = InstanceSpec::new(2, 3).with_flexibility(1.0).with_seed(7);
        let instance = generate(&spec).unwrap();
        for op in &instance.operations {
            assert_eq!(op.eligible_machines.len(), 3);
        }
    }

    #[test]
    fn test_same_seed_same_instance() {
        let spec = InstanceSpec::new(3, 3).with_seed(99);
        assert_eq!(generate(&spec).unwrap(), generate(&spec).unwrap());
    }

    #[test]
    fn test_rejects_zero_jobs() {
        let err = generate(&InstanceSpec::new(0, 3)).unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_zero_machines() {
        let err = generate(&InstanceSpec::new(3, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidInstance(_)));
    }

    #[test]
    fn test_rejects_empty_time_range() {
        let spec = InstanceSpec::new(2, 2).with_processing_times(5, 3);
        assert!(matches!(
            generate(&spec).unwrap_err(),
            Error::InvalidInstance(_)
        ));
    }

    #[test]
    fn test_flexibility_clamped_by_builder() {
        let spec = InstanceSpec::new(2, 2).with_flexibility(2.5);
        assert!((spec.flexibility - 1.0).abs() < 1e-12);
    }
}
