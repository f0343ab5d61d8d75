// SPDX-License-Identifier: MIT OR Apache-2.0
//! End-to-end compile/execute scenarios.

use detgraph::library::{AddNode, CompareNode, CompareOp, ConstantNode, GateNode, LerpNode, TextNode, TimeNode};
use detgraph::{
    CompileError, Edge, EdgeEnd, ExecuteError, Graph, Node, NodeId, PortDescriptor, TickContext, Value,
    ValueType,
};

fn first(graph: &Graph<impl Sized>, node: NodeId, port: u16) -> Option<f32> {
    graph.output(node, port).and_then(Value::first)
}

/// A(2.0) and B(3.0) feeding C = A + B
fn sum_graph() -> (Graph<()>, NodeId, NodeId, NodeId) {
    let mut graph = Graph::new("sum");
    let a = graph.add_node(ConstantNode::new(2.0));
    let b = graph.add_node(ConstantNode::new(3.0));
    let c = graph.add_node(AddNode);
    graph.connect(a, 0, c, 0);
    graph.connect(b, 0, c, 1);
    (graph, a, b, c)
}

fn position(order: &[NodeId], id: NodeId) -> usize {
    order.iter().position(|n| *n == id).unwrap()
}

#[test]
fn test_sum_scenario() {
    let (mut graph, a, b, c) = sum_graph();
    graph.compile().unwrap();

    let order = graph.execution_order();
    assert!(position(order, a) < position(order, c));
    assert!(position(order, b) < position(order, c));

    graph.execute(&()).unwrap();
    assert_eq!(first(&graph, c, 0), Some(5.0));

    graph.execute(&()).unwrap();
    assert_eq!(first(&graph, c, 0), Some(5.0));
}

#[test]
fn test_self_referential_loop_fails() {
    let (mut graph, a, _b, c) = sum_graph();
    // A declares no inputs; the loop is rejected before port validation
    graph.connect(c, 0, a, 0);

    let err = graph.compile().unwrap_err();
    assert!(matches!(err, CompileError::Cycle { .. }));
    assert!(!graph.is_compiled());
    assert_eq!(graph.execute(&()), Err(ExecuteError::NotCompiled));
    for id in graph.node_ids().collect::<Vec<_>>() {
        assert!(graph.output(id, 0).is_none());
    }
}

#[test]
fn test_cycle_recovers_after_removing_edge() {
    let mut graph: Graph<()> = Graph::new("cycle");
    let a = graph.add_node(AddNode);
    let b = graph.add_node(AddNode);
    let back = Edge::new(b, 0, a, 0);
    graph.connect(a, 0, b, 0);
    graph.add_edge(back);

    assert_eq!(
        graph.compile(),
        Err(CompileError::Cycle {
            unresolved: vec![a, b]
        })
    );

    graph.remove_edge(&back);
    graph.compile().unwrap();
    assert_eq!(graph.execution_order(), &[a, b]);
}

#[test]
fn test_signal_to_bool_mismatch() {
    let mut graph: Graph<()> = Graph::new("mismatch");
    let d = graph.add_node(GateNode::new("d"));
    let e = graph.add_node(GateNode::new("e"));
    graph.connect(d, 0, e, 0);

    assert_eq!(
        graph.compile(),
        Err(CompileError::TypeMismatch {
            edge: Edge::new(d, 0, e, 0),
            from: ValueType::Signal,
            to: ValueType::Bool,
        })
    );
    assert!(!graph.is_compiled());
}

#[test]
fn test_port_out_of_range() {
    let (mut graph, a, _b, c) = sum_graph();
    graph.connect(a, 0, c, 2);
    assert_eq!(
        graph.compile(),
        Err(CompileError::PortOutOfRange {
            edge: Edge::new(a, 0, c, 2),
            end: EdgeEnd::Target,
            index: 2,
            len: 2,
        })
    );

    let (mut graph, a, _b, c) = sum_graph();
    graph.connect(a, 1, c, 0);
    assert!(matches!(
        graph.compile(),
        Err(CompileError::PortOutOfRange {
            end: EdgeEnd::Source,
            ..
        })
    ));
}

#[test]
fn test_edge_to_missing_node() {
    let (mut graph, a, _b, _c) = sum_graph();
    let ghost = NodeId(77);
    graph.connect(a, 0, ghost, 0);
    assert_eq!(
        graph.compile(),
        Err(CompileError::MissingNode {
            edge: Edge::new(a, 0, ghost, 0),
            node: ghost,
        })
    );
}

#[test]
fn test_compile_is_idempotent() {
    let (mut graph, ..) = sum_graph();
    graph.compile().unwrap();
    let first_order = graph.execution_order().to_vec();
    graph.compile().unwrap();
    assert_eq!(graph.execution_order(), first_order.as_slice());

    let mut broken: Graph<()> = Graph::new("broken");
    let d = broken.add_node(GateNode::new("d"));
    broken.connect(d, 0, d, 0);
    let first_err = broken.compile().unwrap_err();
    assert_eq!(broken.compile().unwrap_err(), first_err);
}

#[test]
fn test_empty_graph_compiles() {
    let mut graph: Graph<()> = Graph::new("empty");
    graph.compile().unwrap();
    assert!(graph.is_compiled());
    graph.execute(&()).unwrap();
    assert!(!graph.has_outputs());
}

#[test]
fn test_ties_break_by_ascending_id() {
    let mut graph: Graph<()> = Graph::new("ties");
    let ids: Vec<_> = (0..4).map(|_| graph.add_node(AddNode)).collect();
    // Only constraint: the last node runs before the first
    graph.connect(ids[3], 0, ids[0], 0);
    graph.compile().unwrap();
    assert_eq!(graph.execution_order(), &[ids[1], ids[2], ids[3], ids[0]]);
}

#[test]
fn test_order_independent_of_edge_insertion_order() {
    let build = |reverse: bool| {
        let mut graph: Graph<()> = Graph::new("edges");
        let ids: Vec<_> = (0..5).map(|_| graph.add_node(AddNode)).collect();
        let mut edges = vec![
            Edge::new(ids[4], 0, ids[2], 0),
            Edge::new(ids[3], 0, ids[2], 1),
            Edge::new(ids[1], 0, ids[0], 0),
        ];
        if reverse {
            edges.reverse();
        }
        for edge in edges {
            graph.add_edge(edge);
        }
        graph.compile().unwrap();
        graph.execution_order().to_vec()
    };
    assert_eq!(build(false), build(true));
}

#[test]
fn test_last_edge_into_slot_wins() {
    let mut graph: Graph<()> = Graph::new("fan-in");
    let one = graph.add_node(ConstantNode::new(1.0));
    let seven = graph.add_node(ConstantNode::new(7.0));
    let sum = graph.add_node(AddNode);
    graph.connect(one, 0, sum, 0);
    graph.connect(seven, 0, sum, 0);
    graph.compile().unwrap();
    graph.execute(&()).unwrap();
    assert_eq!(first(&graph, sum, 0), Some(7.0));

    graph.remove_edge(&Edge::new(one, 0, sum, 0));
    graph.connect(one, 0, sum, 0);
    graph.compile().unwrap();
    graph.execute(&()).unwrap();
    assert_eq!(first(&graph, sum, 0), Some(1.0));
}

#[test]
fn test_unwired_inputs_are_typed_defaults() {
    struct Probe;

    impl Node<()> for Probe {
        fn inputs(&self) -> Vec<PortDescriptor> {
            vec![
                PortDescriptor::new("Pose", ValueType::custom("BoneTransform")),
                PortDescriptor::new("Label", ValueType::String),
            ]
        }

        fn outputs(&self) -> Vec<PortDescriptor> {
            vec![
                PortDescriptor::new("Echo", ValueType::custom("BoneTransform")),
                PortDescriptor::new("Untouched", ValueType::Vector3),
            ]
        }

        fn evaluate(&self, _ctx: &(), inputs: &[Value], outputs: &mut [Value]) {
            assert_eq!(inputs.len(), 2);
            assert_eq!(outputs.len(), 2);
            outputs[0] = inputs[0].clone();
        }
    }

    let mut graph = Graph::new("defaults");
    let probe = graph.add_node(Probe);
    graph.compile().unwrap();
    graph.execute(&()).unwrap();

    assert_eq!(graph.output(probe, 0), Some(&Value::empty(ValueType::custom("BoneTransform"))));
    assert_eq!(graph.output(probe, 1), Some(&Value::empty(ValueType::Vector3)));
    assert!(graph.output(probe, 2).is_none());
}

#[test]
fn test_execute_never_compiled() {
    let (mut graph, _a, _b, c) = sum_graph();
    assert_eq!(graph.execute(&()), Err(ExecuteError::NotCompiled));
    assert!(!graph.has_outputs());
    assert!(graph.output(c, 0).is_none());
    assert_eq!(graph.pass_count(), 0);
}

#[test]
fn test_execute_after_mutation_keeps_previous_outputs() {
    let (mut graph, a, b, c) = sum_graph();
    graph.compile().unwrap();
    graph.execute(&()).unwrap();

    let d = graph.add_node(ConstantNode::new(10.0));
    assert_eq!(graph.execute(&()), Err(ExecuteError::NotCompiled));
    assert_eq!(first(&graph, c, 0), Some(5.0));
    assert_eq!(first(&graph, a, 0), Some(2.0));
    assert_eq!(first(&graph, b, 0), Some(3.0));
    assert!(graph.output(d, 0).is_none());
    assert_eq!(graph.pass_count(), 1);
}

#[test]
fn test_recompile_after_edit_clears_outputs() {
    let (mut graph, a, b, c) = sum_graph();
    graph.compile().unwrap();
    graph.execute(&()).unwrap();
    assert_eq!(first(&graph, c, 0), Some(5.0));

    graph.remove_edge(&Edge::new(a, 0, c, 0));
    graph.compile().unwrap();
    assert!(graph.output(c, 0).is_none());
    assert!(graph.output(a, 0).is_none());
    assert!(graph.output(b, 0).is_none());
    assert!(!graph.has_outputs());

    graph.execute(&()).unwrap();
    assert_eq!(first(&graph, c, 0), Some(3.0));
}

#[test]
fn test_failed_recompile_clears_outputs() {
    let (mut graph, a, _b, c) = sum_graph();
    graph.compile().unwrap();
    graph.execute(&()).unwrap();

    graph.connect(c, 0, a, 0);
    assert!(graph.compile().is_err());
    assert!(graph.output(c, 0).is_none());
    assert!(!graph.has_outputs());
}

#[test]
fn test_removed_node_is_isolated() {
    let (mut graph, a, b, c) = sum_graph();
    graph.compile().unwrap();
    graph.execute(&()).unwrap();

    graph.remove_node(a);
    assert!(graph.node(a).is_none());
    assert!(graph.edges().iter().all(|e| !e.involves_node(a)));
    assert!(graph.output(a, 0).is_none());

    graph.compile().unwrap();
    assert!(!graph.execution_order().contains(&a));
    graph.execute(&()).unwrap();
    assert!(graph.output(a, 0).is_none());
    // Input 0 is now unwired
    assert_eq!(first(&graph, c, 0), Some(3.0));
    assert_eq!(first(&graph, b, 0), Some(3.0));
}

#[test]
fn test_two_builds_are_bit_identical() {
    let build = || {
        let mut graph = Graph::new("tick");
        let time = graph.add_node(TimeNode);
        let rate = graph.add_node(ConstantNode::new(0.37));
        let blend = graph.add_node(LerpNode::default());
        let limit = graph.add_node(ConstantNode::new(1.0));
        let compare = graph.add_node(CompareNode::new(CompareOp::Greater));
        let gate = graph.add_node(GateNode::new("overflow"));
        graph.add_node(TextNode::new("hud"));
        graph.connect(time, 0, blend, 0);
        graph.connect(rate, 0, blend, 1);
        graph.connect(blend, 0, compare, 0);
        graph.connect(limit, 0, compare, 1);
        graph.connect(compare, 0, gate, 0);
        graph.compile().unwrap();
        graph
    };

    let mut first_graph = build();
    let mut second_graph = build();
    let mut ctx = TickContext::new(0, 1.0 / 30.0, 0xACE);
    for _ in 0..90 {
        first_graph.execute(&ctx).unwrap();
        second_graph.execute(&ctx).unwrap();
        second_graph.execute(&ctx).unwrap();

        let a: Vec<_> = first_graph.outputs().collect();
        let b: Vec<_> = second_graph.outputs().collect();
        assert_eq!(a.len(), b.len());
        for ((key_a, value_a), (key_b, value_b)) in a.iter().zip(&b) {
            assert_eq!(key_a, key_b);
            assert!(value_a.bit_eq(value_b), "{key_a:?} diverged");
        }
        ctx = ctx.next();
    }
    assert_eq!(first_graph.execution_order(), second_graph.execution_order());
}
