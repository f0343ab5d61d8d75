// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions and the composite output key.

use crate::node::NodeId;
use crate::port::PortIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed wire from one node's output port to another node's input port.
///
/// Edges are not validated when added; the compiler checks that both nodes
/// exist, both port indices are in range and the port types match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node
    pub from_node: NodeId,
    /// Index into the source node's outputs
    pub from_port: PortIndex,
    /// Target node
    pub to_node: NodeId,
    /// Index into the target node's inputs
    pub to_port: PortIndex,
}

impl Edge {
    /// Create a new edge
    pub fn new(from_node: NodeId, from_port: PortIndex, to_node: NodeId, to_port: PortIndex) -> Self {
        Self {
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }

    /// Check if this edge touches a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }

    /// Cache key of the output this edge reads
    pub fn source_key(&self) -> OutputKey {
        OutputKey::new(self.from_node, self.from_port)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.out[{}] -> {}.in[{}]",
            self.from_node, self.from_port, self.to_node, self.to_port
        )
    }
}

/// Composite (node, output port) key, packed as `node << 32 | port`.
///
/// Ordering is by node id, then port index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputKey(u64);

impl OutputKey {
    /// Pack a node id and output port index
    pub fn new(node: NodeId, port: PortIndex) -> Self {
        Self((u64::from(node.0) << 32) | u64::from(port))
    }

    /// Node part of the key
    pub fn node(self) -> NodeId {
        NodeId((self.0 >> 32) as u32)
    }

    /// Port part of the key
    pub fn port(self) -> PortIndex {
        (self.0 & 0xFFFF) as PortIndex
    }

    /// Packed representation
    pub fn packed(self) -> u64 {
        self.0
    }
}
