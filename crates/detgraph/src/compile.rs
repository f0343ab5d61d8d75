// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph validation and deterministic scheduling.
//!
//! Compiling turns the node table and edge list into an [`ExecutionPlan`]:
//!
//! 1. Kahn's algorithm proves the graph acyclic and yields the order. The
//!    ready frontier is a `BTreeSet`, so when several nodes become ready at
//!    once the smallest id is scheduled first. The order depends only on ids
//!    and edges, never on hashing or container iteration order.
//! 2. Every edge is checked: both endpoints exist, both port indices are in
//!    range, and the port types are equal.
//! 3. Each node's port shapes and incoming bindings are captured in a
//!    [`PlanStep`], so execution never re-queries the node's ports.

use crate::edge::{Edge, OutputKey};
use crate::error::{CompileError, EdgeEnd};
use crate::node::{Node, NodeId};
use crate::port::{PortDescriptor, PortIndex, ValueType};
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

/// Feeds one input slot from a cached output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputBinding {
    /// Input slot on the node being evaluated
    pub slot: PortIndex,
    /// Output that supplies the slot
    pub source: OutputKey,
}

/// One scheduled node
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    /// Node to evaluate
    pub node: NodeId,
    /// Declared input types, used to default-initialise unwired slots
    pub input_types: Vec<ValueType>,
    /// Declared output types, used to size and pre-fill the outputs
    pub output_types: Vec<ValueType>,
    /// Incoming edges in edge-list order; a later binding to the same slot
    /// overwrites an earlier one
    pub bindings: Vec<InputBinding>,
}

/// Validated, ordered schedule for one graph revision
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionPlan {
    revision: u64,
    order: Vec<NodeId>,
    steps: Vec<PlanStep>,
}

impl ExecutionPlan {
    /// Graph revision this plan was compiled against
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Node ids in execution order
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Scheduled steps in execution order
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }
}

struct PortShape {
    inputs: Vec<PortDescriptor>,
    outputs: Vec<PortDescriptor>,
}

/// Validate the graph and build its execution plan
pub(crate) fn compile<C>(
    nodes: &IndexMap<NodeId, Box<dyn Node<C>>>,
    edges: &[Edge],
    revision: u64,
) -> Result<ExecutionPlan, CompileError> {
    let order = schedule(nodes.keys().copied(), edges)?;

    let mut shapes: BTreeMap<NodeId, PortShape> = nodes
        .iter()
        .map(|(id, node)| {
            let shape = PortShape {
                inputs: node.inputs(),
                outputs: node.outputs(),
            };
            (*id, shape)
        })
        .collect();

    validate_edges(&shapes, edges)?;

    let mut bindings: BTreeMap<NodeId, Vec<InputBinding>> = BTreeMap::new();
    for edge in edges {
        bindings.entry(edge.to_node).or_default().push(InputBinding {
            slot: edge.to_port,
            source: edge.source_key(),
        });
    }

    let mut steps = Vec::with_capacity(order.len());
    for &id in &order {
        let Some(shape) = shapes.remove(&id) else {
            // schedule() only emits ids it was given
            continue;
        };
        steps.push(PlanStep {
            node: id,
            input_types: shape.inputs.into_iter().map(|p| p.value_type).collect(),
            output_types: shape.outputs.into_iter().map(|p| p.value_type).collect(),
            bindings: bindings.remove(&id).unwrap_or_default(),
        });
    }

    Ok(ExecutionPlan {
        revision,
        order,
        steps,
    })
}

/// Kahn's algorithm with a smallest-id-first frontier.
///
/// Only edges whose endpoints are both present take part; dangling edges are
/// reported by edge validation instead of showing up as a phantom cycle.
pub(crate) fn schedule(
    node_ids: impl IntoIterator<Item = NodeId>,
    edges: &[Edge],
) -> Result<Vec<NodeId>, CompileError> {
    let mut in_degree: BTreeMap<NodeId, usize> =
        node_ids.into_iter().map(|id| (id, 0)).collect();
    let mut successors: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();

    for edge in edges {
        if !in_degree.contains_key(&edge.from_node) {
            continue;
        }
        let Some(degree) = in_degree.get_mut(&edge.to_node) else {
            continue;
        };
        *degree += 1;
        successors.entry(edge.from_node).or_default().push(edge.to_node);
    }

    let mut ready: BTreeSet<NodeId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();

    let mut order = Vec::with_capacity(in_degree.len());
    while let Some(id) = ready.pop_first() {
        order.push(id);
        for next in successors.get(&id).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.insert(*next);
                }
            }
        }
    }

    if order.len() != in_degree.len() {
        let unresolved = in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(id, _)| id)
            .collect();
        return Err(CompileError::Cycle { unresolved });
    }

    Ok(order)
}

fn validate_edges(shapes: &BTreeMap<NodeId, PortShape>, edges: &[Edge]) -> Result<(), CompileError> {
    for edge in edges {
        let source = shapes.get(&edge.from_node).ok_or(CompileError::MissingNode {
            edge: *edge,
            node: edge.from_node,
        })?;
        let target = shapes.get(&edge.to_node).ok_or(CompileError::MissingNode {
            edge: *edge,
            node: edge.to_node,
        })?;

        let from = source
            .outputs
            .get(usize::from(edge.from_port))
            .ok_or(CompileError::PortOutOfRange {
                edge: *edge,
                end: EdgeEnd::Source,
                index: edge.from_port,
                len: source.outputs.len(),
            })?;
        let to = target
            .inputs
            .get(usize::from(edge.to_port))
            .ok_or(CompileError::PortOutOfRange {
                edge: *edge,
                end: EdgeEnd::Target,
                index: edge.to_port,
                len: target.inputs.len(),
            })?;

        if !from.can_connect(to) {
            return Err(CompileError::TypeMismatch {
                edge: *edge,
                from: from.value_type.clone(),
                to: to.value_type.clone(),
            });
        }
    }
    Ok(())
}
