// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic node-graph execution engine.
//!
//! This crate provides the compute-graph core shared by:
//! - Animation graphs (bone kinematics, blend trees)
//! - AI behavior graphs (utility scoring, action selection)
//! - UI logic graphs (conditions, data binding, actions)
//! - World generation graphs (noise, erosion, biomes)
//!
//! ## Architecture
//!
//! A [`Graph`] owns typed [`Node`]s and the [`Edge`]s between their ports.
//! Compiling validates the wiring and fixes a topological order; executing
//! evaluates every node once, in that order, against a caller-supplied
//! context.
//!
//! ## Determinism
//!
//! For the same nodes, edges and context content, every pass produces
//! bit-identical outputs on every platform:
//! - Ties in the topological sort are broken by ascending node id
//! - When several edges feed one input, the last edge added wins
//! - Nodes are pure functions of `(context, inputs)`
//!
//! ```
//! use detgraph::library::{AddNode, ConstantNode};
//! use detgraph::Graph;
//!
//! let mut graph: Graph<()> = Graph::new("sum");
//! let a = graph.add_node(ConstantNode::new(2.0));
//! let b = graph.add_node(ConstantNode::new(3.0));
//! let c = graph.add_node(AddNode);
//! graph.connect(a, 0, c, 0);
//! graph.connect(b, 0, c, 1);
//!
//! graph.compile()?;
//! graph.execute(&())?;
//! assert_eq!(graph.output(c, 0).and_then(|v| v.first()), Some(5.0));
//! # Ok::<(), detgraph::GraphError>(())
//! ```

pub mod compile;
pub mod context;
pub mod edge;
pub mod error;
pub mod evaluation;
pub mod graph;
pub mod library;
pub mod node;
pub mod port;
pub mod value;

pub use compile::{ExecutionPlan, InputBinding, PlanStep};
pub use context::TickContext;
pub use edge::{Edge, OutputKey};
pub use error::{CompileError, EdgeEnd, ExecuteError, GraphError, Result};
pub use evaluation::OutputCache;
pub use graph::{Graph, GraphId, NodeHandle};
pub use node::{Node, NodeCategory, NodeId};
pub use port::{PortDescriptor, PortIndex, ValueType};
pub use value::Value;
