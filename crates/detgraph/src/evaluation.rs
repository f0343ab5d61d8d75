// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph evaluation and the per-pass output cache.

use crate::compile::ExecutionPlan;
use crate::edge::OutputKey;
use crate::error::ExecuteError;
use crate::node::{Node, NodeId};
use crate::port::PortIndex;
use crate::value::Value;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Outputs produced by the most recent pass, keyed by (node, port)
#[derive(Debug, Clone, Default)]
pub struct OutputCache {
    values: BTreeMap<OutputKey, Value>,
}

impl OutputCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached output
    pub fn get(&self, key: OutputKey) -> Option<&Value> {
        self.values.get(&key)
    }

    /// Store an output, replacing any earlier value for the key
    pub fn insert(&mut self, key: OutputKey, value: Value) {
        self.values.insert(key, value);
    }

    /// Drop every output of one node
    pub fn remove_node(&mut self, node: NodeId) {
        self.values.retain(|key, _| key.node() != node);
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of cached outputs
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All outputs, ascending by node id then port index
    pub fn iter(&self) -> impl Iterator<Item = (OutputKey, &Value)> {
        self.values.iter().map(|(key, value)| (*key, value))
    }
}

/// Run one pass of `plan` over `nodes`, writing into `cache`.
///
/// The cache is cleared first. If a scheduled node is missing the pass stops
/// there; outputs of nodes that already ran stay in the cache but must not be
/// trusted.
pub(crate) fn run<C>(
    plan: &ExecutionPlan,
    nodes: &IndexMap<NodeId, Box<dyn Node<C>>>,
    ctx: &C,
    cache: &mut OutputCache,
) -> Result<(), ExecuteError> {
    cache.clear();

    for step in plan.steps() {
        debug_assert!(
            nodes.contains_key(&step.node),
            "execution order references removed node {}",
            step.node
        );
        let Some(node) = nodes.get(&step.node) else {
            tracing::error!(node = %step.node, "Node in execution order no longer exists");
            return Err(ExecuteError::MissingNode(step.node));
        };

        let mut inputs: Vec<Value> = step.input_types.iter().cloned().map(Value::empty).collect();
        for binding in &step.bindings {
            let slot = inputs.get_mut(usize::from(binding.slot));
            if let (Some(slot), Some(value)) = (slot, cache.get(binding.source)) {
                *slot = value.clone();
            }
        }

        let mut outputs: Vec<Value> = step.output_types.iter().cloned().map(Value::empty).collect();
        node.evaluate(ctx, &inputs, &mut outputs);

        tracing::trace!(
            node = %step.node,
            name = node.name(),
            inputs = inputs.len(),
            outputs = outputs.len(),
            "Evaluated node"
        );

        for (port, value) in (0..=PortIndex::MAX).zip(outputs) {
            cache.insert(OutputKey::new(step.node, port), value);
        }
    }

    Ok(())
}
