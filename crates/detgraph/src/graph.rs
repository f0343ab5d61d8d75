// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure owning nodes, edges, the compiled plan and outputs.

use crate::compile::{self, ExecutionPlan};
use crate::edge::{Edge, OutputKey};
use crate::error::{CompileError, ExecuteError};
use crate::evaluation::{self, OutputCache};
use crate::node::{Node, NodeId};
use crate::port::PortIndex;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a graph instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphId(pub Uuid);

impl GraphId {
    /// Create a new random graph ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference to a node that remembers which graph it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeHandle {
    /// Owning graph
    pub graph: GraphId,
    /// Node within that graph
    pub node: NodeId,
}

/// A deterministic compute graph.
///
/// Build it with [`add_node`](Self::add_node) and [`add_edge`](Self::add_edge),
/// call [`compile`](Self::compile) after structural changes, then
/// [`execute`](Self::execute) once per tick and read results with
/// [`output`](Self::output).
///
/// Every structural mutation invalidates the compiled plan, and `execute`
/// refuses to run until `compile` succeeds again.
pub struct Graph<C> {
    /// Graph name (diagnostics only)
    pub name: String,
    id: GraphId,
    next_id: u32,
    revision: u64,
    nodes: IndexMap<NodeId, Box<dyn Node<C>>>,
    edges: Vec<Edge>,
    plan: Option<ExecutionPlan>,
    outputs: OutputCache,
    passes: u64,
}

impl<C> Graph<C> {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: GraphId::new(),
            next_id: 1,
            revision: 0,
            nodes: IndexMap::new(),
            edges: Vec::new(),
            plan: None,
            outputs: OutputCache::new(),
            passes: 0,
        }
    }

    /// Identifier of this graph instance
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Take ownership of a node and assign it the next id.
    ///
    /// # Panics
    ///
    /// Panics once `u32::MAX - 1` ids have been handed out. Use
    /// [`Graph::try_add_node`] to handle that case instead.
    pub fn add_node(&mut self, node: impl Node<C> + 'static) -> NodeId {
        self.add_boxed_node(Box::new(node))
    }

    /// Take ownership of an already boxed node
    ///
    /// # Panics
    ///
    /// Panics once `u32::MAX - 1` ids have been handed out.
    pub fn add_boxed_node(&mut self, node: Box<dyn Node<C>>) -> NodeId {
        match self.try_add_boxed_node(node) {
            Some(id) => id,
            None => panic!("node id space exhausted for graph {:?}", self.name),
        }
    }

    /// Add a node, or hand nothing back if every id has been used.
    ///
    /// Ids are never reused, so this only fails after `u32::MAX - 1`
    /// additions over the life of the graph.
    pub fn try_add_node(&mut self, node: impl Node<C> + 'static) -> Option<NodeId> {
        self.try_add_boxed_node(Box::new(node))
    }

    /// Boxed form of [`Graph::try_add_node`]
    pub fn try_add_boxed_node(&mut self, node: Box<dyn Node<C>>) -> Option<NodeId> {
        let next_id = self.next_id.checked_add(1)?;
        let id = NodeId(self.next_id);
        self.next_id = next_id;
        self.nodes.insert(id, node);
        self.invalidate();
        Some(id)
    }

    /// Remove a node and every edge touching it.
    ///
    /// Removing an absent id is a no-op and leaves the compiled state alone.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Box<dyn Node<C>>> {
        // shift_remove keeps the remaining ids in ascending order
        let node = self.nodes.shift_remove(&node_id)?;
        self.edges.retain(|e| !e.involves_node(node_id));
        self.outputs.remove_node(node_id);
        self.invalidate();
        Some(node)
    }

    /// Append an edge. No validation happens until compile.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
        self.invalidate();
    }

    /// Append an edge from its parts
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: PortIndex,
        to_node: NodeId,
        to_port: PortIndex,
    ) {
        self.add_edge(Edge::new(from_node, from_port, to_node, to_port));
    }

    /// Remove every edge equal to `edge`, returning how many were removed
    pub fn remove_edge(&mut self, edge: &Edge) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| e != edge);
        self.invalidate();
        before - self.edges.len()
    }

    /// Remove all nodes and edges. Ids are still never reused.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.outputs.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.plan = None;
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&dyn Node<C>> {
        self.nodes.get(&node_id).map(AsRef::as_ref)
    }

    /// Check if a node exists
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// All node IDs, ascending
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All edges, in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges whose target is `node_id`, in insertion order
    pub fn edges_into(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.to_node == node_id)
    }

    /// Edges whose source is `node_id`, in insertion order
    pub fn edges_from(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.from_node == node_id)
    }

    /// Handle for a node of this graph
    pub fn handle(&self, node_id: NodeId) -> Option<NodeHandle> {
        self.contains_node(node_id).then_some(NodeHandle {
            graph: self.id,
            node: node_id,
        })
    }

    /// Resolve a handle; handles from other graphs resolve to nothing
    pub fn resolve(&self, handle: NodeHandle) -> Option<&dyn Node<C>> {
        if handle.graph != self.id {
            return None;
        }
        self.node(handle.node)
    }

    /// Validate the graph and build a deterministic execution order.
    ///
    /// On failure the graph is left not compiled; any earlier plan is
    /// discarded. Outputs from earlier passes are dropped either way, so
    /// reads return nothing until the next execute.
    pub fn compile(&mut self) -> Result<(), CompileError> {
        self.plan = None;
        self.outputs.clear();
        match compile::compile(&self.nodes, &self.edges, self.revision) {
            Ok(plan) => {
                tracing::debug!(
                    graph = %self.name,
                    nodes = self.nodes.len(),
                    edges = self.edges.len(),
                    "Compiled graph"
                );
                self.plan = Some(plan);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(graph = %self.name, "Compile failed: {e}");
                Err(e)
            }
        }
    }

    /// Check if the graph has a plan for its current structure
    pub fn is_compiled(&self) -> bool {
        self.current_plan().is_some()
    }

    /// Compiled execution order, empty when not compiled
    pub fn execution_order(&self) -> &[NodeId] {
        self.current_plan().map_or(&[], ExecutionPlan::order)
    }

    /// Compiled plan, if the graph is compiled
    pub fn plan(&self) -> Option<&ExecutionPlan> {
        self.current_plan()
    }

    fn current_plan(&self) -> Option<&ExecutionPlan> {
        self.plan.as_ref().filter(|plan| plan.revision() == self.revision)
    }

    /// Run one evaluation pass.
    ///
    /// Refuses to run, leaving the previous outputs untouched, unless the
    /// graph was compiled after its last structural change. Every node sees
    /// the same `ctx`.
    pub fn execute(&mut self, ctx: &C) -> Result<(), ExecuteError> {
        let Some(plan) = self.plan.as_ref().filter(|plan| plan.revision() == self.revision) else {
            tracing::warn!(graph = %self.name, "Execute refused: graph is not compiled");
            return Err(ExecuteError::NotCompiled);
        };

        evaluation::run(plan, &self.nodes, ctx, &mut self.outputs)?;
        self.passes += 1;
        Ok(())
    }

    /// Output of the most recent pass
    pub fn output(&self, node_id: NodeId, port: PortIndex) -> Option<&Value> {
        self.outputs.get(OutputKey::new(node_id, port))
    }

    /// Every output of the most recent pass, ascending by (node, port)
    pub fn outputs(&self) -> impl Iterator<Item = (OutputKey, &Value)> {
        self.outputs.iter()
    }

    /// Check if any outputs are cached
    pub fn has_outputs(&self) -> bool {
        !self.outputs.is_empty()
    }

    /// Number of successful passes since construction
    pub fn pass_count(&self) -> u64 {
        self.passes
    }
}

impl<C> Default for Graph<C> {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl<C> fmt::Debug for Graph<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("compiled", &self.is_compiled())
            .field("passes", &self.passes)
            .finish_non_exhaustive()
    }
}
