// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node contract and identifiers.

use crate::port::PortDescriptor;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node within one graph.
///
/// Assigned by the graph starting at 1, strictly increasing and never reused
/// for the lifetime of that graph, even after the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Raw id value
    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node category (display and tooling only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Produces values without inputs (constants, context readers)
    Source,
    /// Arithmetic
    Math,
    /// Comparisons, gates and flow
    Logic,
    /// Masks and filters
    Filter,
    /// Blends between inputs
    Blend,
    /// Terminal nodes consumed by a sampler or UI
    Output,
    /// Custom/user-defined
    #[default]
    Custom,
}

/// A pure unit of computation with typed input and output ports.
///
/// Implementations must keep [`inputs`](Node::inputs) and
/// [`outputs`](Node::outputs) stable for the lifetime of the instance, and
/// [`evaluate`](Node::evaluate) must depend only on the context and the input
/// values. Nodes that need time, randomness or coordinates read them from the
/// context `C`; they never consult a clock or mutable state of their own.
pub trait Node<C>: Send {
    /// Display name
    fn name(&self) -> &str {
        "Node"
    }

    /// Category
    fn category(&self) -> NodeCategory {
        NodeCategory::Custom
    }

    /// Ordered input ports
    fn inputs(&self) -> Vec<PortDescriptor>;

    /// Ordered output ports
    fn outputs(&self) -> Vec<PortDescriptor>;

    /// Compute outputs from the context and input values.
    ///
    /// `inputs` has one slot per declared input; unwired slots hold
    /// [`Value::empty`] of the declared type. `outputs` has one slot per
    /// declared output, pre-filled the same way; slots left untouched are
    /// cached as empty values.
    fn evaluate(&self, ctx: &C, inputs: &[Value], outputs: &mut [Value]);
}

impl<C> fmt::Debug for dyn Node<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("category", &self.category())
            .finish_non_exhaustive()
    }
}
