// SPDX-License-Identifier: MIT OR Apache-2.0
//! Comparison, signal and context-reading nodes.

use crate::context::TickContext;
use crate::node::{Node, NodeCategory};
use crate::port::{PortDescriptor, ValueType};
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompareOp {
    /// `A < B`
    Less,
    /// `A <= B`
    LessEqual,
    /// `A > B`
    #[default]
    Greater,
    /// `A >= B`
    GreaterEqual,
    /// `A == B`
    Equal,
}

impl CompareOp {
    /// Apply the operator
    pub fn apply(self, a: f32, b: f32) -> bool {
        match self {
            Self::Less => a < b,
            Self::LessEqual => a <= b,
            Self::Greater => a > b,
            Self::GreaterEqual => a >= b,
            Self::Equal => a == b,
        }
    }
}

/// Compares two floats, producing a `Bool`
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareNode {
    /// Operator
    pub op: CompareOp,
}

impl CompareNode {
    /// Create a compare node
    pub fn new(op: CompareOp) -> Self {
        Self { op }
    }
}

impl<C> Node<C> for CompareNode {
    fn name(&self) -> &str {
        "Compare"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Logic
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        vec![
            PortDescriptor::new("A", ValueType::Float),
            PortDescriptor::new("B", ValueType::Float),
        ]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        vec![PortDescriptor::new("Result", ValueType::Bool)]
    }

    fn evaluate(&self, _ctx: &C, inputs: &[Value], outputs: &mut [Value]) {
        let a = inputs.first().map_or(0.0, |v| v.first_or(0.0));
        let b = inputs.get(1).map_or(0.0, |v| v.first_or(0.0));
        outputs[0] = Value::bool(self.op.apply(a, b));
    }
}

/// Turns a `Bool` condition into a labelled `Signal`.
///
/// The signal carries `1.0` when the condition holds and `0.0` otherwise, and
/// always carries the label as text. An unwired condition is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateNode {
    /// Label attached to the emitted signal
    pub label: String,
}

impl GateNode {
    /// Create a gate with a label
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl<C> Node<C> for GateNode {
    fn name(&self) -> &str {
        "Gate"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Logic
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        vec![PortDescriptor::new("Condition", ValueType::Bool)]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        vec![PortDescriptor::new("Signal", ValueType::Signal)]
    }

    fn evaluate(&self, _ctx: &C, inputs: &[Value], outputs: &mut [Value]) {
        let active = inputs.first().is_some_and(Value::as_bool);
        outputs[0] = Value::new(ValueType::Signal, vec![if active { 1.0 } else { 0.0 }])
            .with_text(self.label.clone());
    }
}

/// Constant string source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextNode {
    /// Emitted text
    pub text: String,
}

impl TextNode {
    /// Create a text node
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl<C> Node<C> for TextNode {
    fn name(&self) -> &str {
        "Text"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Source
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        Vec::new()
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        vec![PortDescriptor::new("Text", ValueType::String)]
    }

    fn evaluate(&self, _ctx: &C, _inputs: &[Value], outputs: &mut [Value]) {
        outputs[0] = Value::string(self.text.clone());
    }
}

/// Reads time from a [`TickContext`].
///
/// Outputs elapsed seconds (`Float`), the tick number (`Int`) and the seed
/// (`Seed`). Tick and seed are 64-bit, so both are split into four 16-bit
/// limbs, low first; `first()` on the tick is exact below 65536.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeNode;

impl Node<TickContext> for TimeNode {
    fn name(&self) -> &str {
        "Time"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Source
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        Vec::new()
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        vec![
            PortDescriptor::new("Elapsed", ValueType::Float),
            PortDescriptor::new("Tick", ValueType::Int),
            PortDescriptor::new("Seed", ValueType::Seed),
        ]
    }

    fn evaluate(&self, ctx: &TickContext, _inputs: &[Value], outputs: &mut [Value]) {
        outputs[0] = Value::float(ctx.elapsed() as f32);
        outputs[1] = Value::new(ValueType::Int, limbs(ctx.tick));
        outputs[2] = Value::new(ValueType::Seed, limbs(ctx.seed));
    }
}

/// Split into 16-bit limbs, low first; f32 holds each exactly
fn limbs(value: u64) -> Vec<f32> {
    (0..4).map(|i| f32::from((value >> (16 * i)) as u16)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_ops() {
        assert!(CompareOp::Less.apply(1.0, 2.0));
        assert!(CompareOp::LessEqual.apply(2.0, 2.0));
        assert!(CompareOp::Greater.apply(3.0, 2.0));
        assert!(!CompareOp::GreaterEqual.apply(1.0, 2.0));
        assert!(CompareOp::Equal.apply(2.0, 2.0));
    }

    #[test]
    fn test_gate_unwired_is_inactive() {
        let gate = GateNode::new("show_panel");
        let mut outputs = vec![Value::empty(ValueType::Signal)];
        Node::<()>::evaluate(&gate, &(), &[Value::empty(ValueType::Bool)], &mut outputs);
        assert_eq!(outputs[0].value_type, ValueType::Signal);
        assert_eq!(outputs[0].first(), Some(0.0));
        assert_eq!(outputs[0].text.as_deref(), Some("show_panel"));

        Node::<()>::evaluate(&gate, &(), &[Value::bool(true)], &mut outputs);
        assert_eq!(outputs[0].first(), Some(1.0));
    }

    #[test]
    fn test_time_reads_context() {
        let ctx = TickContext::new(30, 0.5, 0x0003_0002);
        let mut outputs = vec![
            Value::empty(ValueType::Float),
            Value::empty(ValueType::Int),
            Value::empty(ValueType::Seed),
        ];
        TimeNode.evaluate(&ctx, &[], &mut outputs);
        assert_eq!(outputs[0].first(), Some(15.0));
        assert_eq!(outputs[1].first(), Some(30.0));
        assert_eq!(outputs[2].data, vec![2.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_time_tick_exact_past_f32_precision() {
        // 2^24 + 1 is the first integer an f32 cannot hold
        let tick = (1u64 << 24) + 1;
        let ctx = TickContext::new(tick, 1.0, 0);
        let mut outputs = vec![
            Value::empty(ValueType::Float),
            Value::empty(ValueType::Int),
            Value::empty(ValueType::Seed),
        ];
        TimeNode.evaluate(&ctx, &[], &mut outputs);
        assert_eq!(outputs[1].data, vec![1.0, 256.0, 0.0, 0.0]);

        let rebuilt = outputs[1]
            .data
            .iter()
            .enumerate()
            .fold(0u64, |acc, (i, limb)| acc | ((*limb as u64) << (16 * i)));
        assert_eq!(rebuilt, tick);
    }
}
