// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reference graphs the runner can build.

use crate::settings::Scenario;
use detgraph::library::{AddNode, CompareNode, CompareOp, ConstantNode, GateNode, MultiplyNode, TimeNode};
use detgraph::{Graph, NodeId, PortIndex, TickContext};

/// A named output to report after the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// Label used in the report
    pub label: &'static str,
    /// Node to read
    pub node: NodeId,
    /// Output port to read
    pub port: PortIndex,
}

/// A built graph and the outputs worth reporting
#[derive(Debug)]
pub struct BuiltScenario {
    /// The graph, not yet compiled
    pub graph: Graph<TickContext>,
    /// Outputs to report
    pub probes: Vec<Probe>,
}

impl Scenario {
    /// Build this scenario's graph
    pub fn build(&self) -> BuiltScenario {
        match self {
            Self::Sum { a, b } => {
                let mut graph = Graph::new("sum");
                let a = graph.add_node(ConstantNode::new(*a));
                let b = graph.add_node(ConstantNode::new(*b));
                let sum = graph.add_node(AddNode);
                graph.connect(a, 0, sum, 0);
                graph.connect(b, 0, sum, 1);
                BuiltScenario {
                    graph,
                    probes: vec![Probe {
                        label: "sum",
                        node: sum,
                        port: 0,
                    }],
                }
            }
            Self::Threshold { rate, limit, label } => {
                let mut graph = Graph::new("threshold");
                let time = graph.add_node(TimeNode);
                let rate = graph.add_node(ConstantNode::new(*rate));
                let scaled = graph.add_node(MultiplyNode);
                let limit = graph.add_node(ConstantNode::new(*limit));
                let compare = graph.add_node(CompareNode::new(CompareOp::Greater));
                let gate = graph.add_node(GateNode::new(label.clone()));
                graph.connect(time, 0, scaled, 0);
                graph.connect(rate, 0, scaled, 1);
                graph.connect(scaled, 0, compare, 0);
                graph.connect(limit, 0, compare, 1);
                graph.connect(compare, 0, gate, 0);
                BuiltScenario {
                    graph,
                    probes: vec![
                        Probe {
                            label: "elapsed",
                            node: time,
                            port: 0,
                        },
                        Probe {
                            label: "scaled",
                            node: scaled,
                            port: 0,
                        },
                        Probe {
                            label: "signal",
                            node: gate,
                            port: 0,
                        },
                    ],
                }
            }
        }
    }
}
