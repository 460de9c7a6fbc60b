//! Disjunctive graph representation.
//!
//! Derives, from an [`Instance`], the directed graph that encodes both
//! conjunctive relations (operation order within a job, wired through a
//! virtual source and sink) and disjunctive relations (pairs of operations
//! from different jobs that compete for a machine, stored as two opposite
//! directed edges tagged with the shared machine).
//!
//! The disjunctive edges encode *choice*, not structure: a concrete schedule
//! corresponds to picking one direction per machine-sharing pair such that
//! the chosen edges plus the conjunctive subgraph stay acyclic. Edges are
//! added for every pair sharing *any* eligible machine — one tagged pair per
//! shared machine — which makes this a superset graph suited to
//! visualization, not a realized-conflict graph.
//!
//! # Reference
//! Balas (1969), "Machine Sequencing via Disjunctive Graphs"

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::Instance;

/// Node role in the disjunctive graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Virtual start node, predecessor of every job's first operation.
    Source,
    /// Virtual end node, successor of every job's last operation.
    Sink,
    /// A real operation.
    Operation {
        /// Owning job.
        job_id: usize,
        /// Position within the job.
        operation_id: usize,
    },
}

/// A graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node id; also the index into the node list.
    pub id: usize,
    /// Role of this node.
    pub kind: NodeKind,
}

/// Edge role in the disjunctive graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Fixed precedence edge; `weight` is the minimal processing time of the
    /// source operation (0 out of the virtual source).
    Conjunctive {
        /// Minimal precedence gap imposed by the source node.
        weight: u64,
    },
    /// One direction of a machine-conflict pair; its opposite twin always
    /// exists. Resolving the conflict means activating exactly one of them.
    Disjunctive {
        /// Machine licensing the conflict.
        machine: usize,
    },
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node id.
    pub from: usize,
    /// Target node id.
    pub to: usize,
    /// Conjunctive or disjunctive role.
    pub kind: EdgeKind,
}

/// Disjunctive graph over an instance's operations.
///
/// Node ids are stable: [`DisjunctiveGraph::SOURCE`],
/// [`DisjunctiveGraph::SINK`], then one node per operation in instance
/// order (`operation_node`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisjunctiveGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl DisjunctiveGraph {
    /// Id of the virtual source node.
    pub const SOURCE: usize = 0;
    /// Id of the virtual sink node.
    pub const SINK: usize = 1;

    /// Builds the disjunctive graph for `instance`.
    ///
    /// Pure function of the instance; fails only when the instance itself
    /// violates its invariants.
    ///
    /// # Errors
    /// [`Error::InvalidInstance`] from the eager validation pass.
    pub fn build(instance: &Instance) -> Result<Self, Error> {
        instance.validate()?;

        let mut nodes = Vec::with_capacity(instance.total_operations() + 2);
        nodes.push(Node {
            id: Self::SOURCE,
            kind: NodeKind::Source,
        });
        nodes.push(Node {
            id: Self::SINK,
            kind: NodeKind::Sink,
        });
        for (index, op) in instance.operations.iter().enumerate() {
            nodes.push(Node {
                id: Self::operation_node(index),
                kind: NodeKind::Operation {
                    job_id: op.job_id,
                    operation_id: op.operation_id,
                },
            });
        }

        let mut edges = Vec::new();

        // Conjunctive chain per job: source -> first -> ... -> last -> sink.
        for job in 0..instance.num_jobs {
            let ops = instance.job_operations(job);

            let (first_index, _) = ops[0];
            edges.push(Edge {
                from: Self::SOURCE,
                to: Self::operation_node(first_index),
                kind: EdgeKind::Conjunctive { weight: 0 },
            });

            for pair in ops.windows(2) {
                let (from_index, from_op) = pair[0];
                let (to_index, _) = pair[1];
                edges.push(Edge {
                    from: Self::operation_node(from_index),
                    to: Self::operation_node(to_index),
                    kind: EdgeKind::Conjunctive {
                        weight: from_op.min_processing_time(),
                    },
                });
            }

            let (last_index, last_op) = ops[ops.len() - 1];
            edges.push(Edge {
                from: Self::operation_node(last_index),
                to: Self::SINK,
                kind: EdgeKind::Conjunctive {
                    weight: last_op.min_processing_time(),
                },
            });
        }

        // Disjunctive pairs: operations of different jobs sharing a machine,
        // one opposite-directed pair per shared machine.
        for machine in 0..instance.num_machines {
            let on_machine: Vec<usize> = instance
                .operations
                .iter()
                .enumerate()
                .filter(|(_, op)| op.eligible_machines.contains(&machine))
                .map(|(index, _)| index)
                .collect();

            for (pos, &a) in on_machine.iter().enumerate() {
                for &b in &on_machine[pos + 1..] {
                    if instance.operations[a].job_id == instance.operations[b].job_id {
                        continue;
                    }
                    edges.push(Edge {
                        from: Self::operation_node(a),
                        to: Self::operation_node(b),
                        kind: EdgeKind::Disjunctive { machine },
                    });
                    edges.push(Edge {
                        from: Self::operation_node(b),
                        to: Self::operation_node(a),
                        kind: EdgeKind::Disjunctive { machine },
                    });
                }
            }
        }

        Ok(Self { nodes, edges })
    }

    /// Node id of operation `index` (its position in `Instance::operations`).
    pub const fn operation_node(index: usize) -> usize {
        index + 2
    }

    /// All nodes, id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges, conjunctive first, then disjunctive grouped by machine.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Conjunctive edges only.
    pub fn conjunctive_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| matches!(e.kind, EdgeKind::Conjunctive { .. }))
    }

    /// Disjunctive edges only.
    pub fn disjunctive_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| matches!(e.kind, EdgeKind::Disjunctive { .. }))
    }
}
