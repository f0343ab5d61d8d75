// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors reported by compile and execute.
//!
//! Structural and sequencing problems are ordinary, recoverable states for a
//! graph that is being edited, so they are returned as values and never panic.

use crate::edge::Edge;
use crate::node::NodeId;
use crate::port::{PortIndex, ValueType};
use thiserror::Error;

/// Which end of an edge a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    /// The source node's output port
    Source,
    /// The target node's input port
    Target,
}

/// Error when compiling a graph. The graph is left not compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The graph contains a directed cycle
    #[error("Graph contains a cycle through {} node(s): {:?}", .unresolved.len(), .unresolved)]
    Cycle {
        /// Nodes that could not be scheduled, ascending
        unresolved: Vec<NodeId>,
    },

    /// An edge references a node that is not in the graph
    #[error("Edge {edge} references missing node {node}")]
    MissingNode {
        /// Offending edge
        edge: Edge,
        /// The missing endpoint
        node: NodeId,
    },

    /// An edge references a port index the node does not declare
    #[error("Edge {edge}: {end:?} port {index} out of range (node declares {len})")]
    PortOutOfRange {
        /// Offending edge
        edge: Edge,
        /// Which end is out of range
        end: EdgeEnd,
        /// Requested port index
        index: PortIndex,
        /// Number of ports the node declares on that side
        len: usize,
    },

    /// An edge connects ports of different value types
    #[error("Edge {edge} connects {from} output to {to} input")]
    TypeMismatch {
        /// Offending edge
        edge: Edge,
        /// Source port type
        from: ValueType,
        /// Target port type
        to: ValueType,
    },
}

/// Error when executing a graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteError {
    /// The graph was never compiled, or was mutated since the last compile
    #[error("Graph is not compiled")]
    NotCompiled,

    /// A node in the execution order is gone from the node table
    #[error("Node {0} in the execution order no longer exists")]
    MissingNode(NodeId),
}

/// Any graph error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Compile failure
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Execute failure
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
