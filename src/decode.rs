//! Genome decoding: permutation → feasible schedule.
//!
//! The decoder is a deterministic greedy simulation. It walks the genome in
//! listed order, keeps one free-time clock per machine and one ready-time
//! clock per job, and places each operation at the earliest instant both
//! clocks allow. Feasibility is guaranteed by construction: every operation
//! starts after its job predecessor and after its machine's prior occupant,
//! so no backtracking is ever needed.
//!
//! A genome that omits or duplicates operation indices is a caller contract
//! violation; the search engine only ever produces true permutations, and
//! debug builds assert it.

use serde::{Deserialize, Serialize};

use crate::model::{Instance, Schedule, ScheduledOperation};

/// How the decoder picks a machine for a flexible operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineSelection {
    /// Always the first entry of `eligible_machines`. Replicates the fixed
    /// tie-break of the reference behavior; discards machine flexibility.
    #[default]
    FirstEligible,
    /// Scan all eligible machines and pick the one with the earliest
    /// completion time, ties to the earliest listed. Still single-pass.
    EarliestCompletion,
}

/// Decodes `genome` into a concrete schedule for `instance`.
///
/// Single pass, no backtracking. For each operation, with the chosen machine
/// and its aligned processing time:
/// `start = max(machine_free, job_ready) + setup_time`,
/// `end = start + processing_time`; both clocks advance to `end`.
pub fn decode(genome: &[usize], instance: &Instance, policy: MachineSelection) -> Schedule {
    let n = instance.total_operations();
    debug_assert!(is_permutation(genome, n), "genome must be a permutation of 0..{n}");

    let mut machine_free = vec![0u64; instance.num_machines];
    let mut job_ready = vec![0u64; instance.num_jobs];
    let mut slots: Vec<Option<ScheduledOperation>> = vec![None; n];

    for &op_index in genome {
        let op = &instance.operations[op_index];

        let (machine, processing_time) = match policy {
            MachineSelection::FirstEligible => (op.eligible_machines[0], op.processing_times[0]),
            MachineSelection::EarliestCompletion => {
                let mut choice = (op.eligible_machines[0], op.processing_times[0]);
                let mut best_end = completion_on(
                    machine_free[choice.0],
                    job_ready[op.job_id],
                    op.setup_time,
                    choice.1,
                );
                for (&machine, &time) in op
                    .eligible_machines
                    .iter()
                    .zip(&op.processing_times)
                    .skip(1)
                {
                    let end = completion_on(
                        machine_free[machine],
                        job_ready[op.job_id],
                        op.setup_time,
                        time,
                    );
                    if end < best_end {
                        best_end = end;
                        choice = (machine, time);
                    }
                }
                choice
            }
        };

        let start = machine_free[machine].max(job_ready[op.job_id]) + op.setup_time;
        let end = start + processing_time;
        machine_free[machine] = end;
        job_ready[op.job_id] = end;

        slots[op_index] = Some(ScheduledOperation {
            job_id: op.job_id,
            operation_id: op.operation_id,
            machine,
            start,
            end,
        });
    }

    let assignments = slots
        .into_iter()
        .map(|slot| slot.expect("genome covers every operation index"))
        .collect();
    Schedule::new(assignments)
}

fn completion_on(machine_free: u64, job_ready: u64, setup: u64, processing: u64) -> u64 {
    machine_free.max(job_ready) + setup + processing
}

fn is_permutation(genome: &[usize], n: usize) -> bool {
    if genome.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &g in genome {
        if g >= n || seen[g] {
            return false;
        }
        seen[g] = true;
    }
    true
}
