// SPDX-License-Identifier: MIT OR Apache-2.0
//! Float arithmetic nodes.
//!
//! Unwired or short inputs read as `0.0`, except [`LerpNode`]'s alpha, which
//! falls back to the node's own default weight.

use crate::node::{Node, NodeCategory};
use crate::port::{PortDescriptor, ValueType};
use crate::value::Value;

fn float_port(name: &str) -> PortDescriptor {
    PortDescriptor::new(name, ValueType::Float)
}

fn input(inputs: &[Value], index: usize) -> f32 {
    inputs.get(index).map_or(0.0, |v| v.first_or(0.0))
}

/// Constant float source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNode {
    /// Emitted value
    pub value: f32,
}

impl ConstantNode {
    /// Create a constant node
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl<C> Node<C> for ConstantNode {
    fn name(&self) -> &str {
        "Constant"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Source
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        Vec::new()
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        vec![float_port("Value")]
    }

    fn evaluate(&self, _ctx: &C, _inputs: &[Value], outputs: &mut [Value]) {
        outputs[0] = Value::float(self.value);
    }
}

/// `A + B`
#[derive(Debug, Clone, Copy, Default)]
pub struct AddNode;

impl<C> Node<C> for AddNode {
    fn name(&self) -> &str {
        "Add"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Math
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        vec![float_port("A"), float_port("B")]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        vec![float_port("Sum")]
    }

    fn evaluate(&self, _ctx: &C, inputs: &[Value], outputs: &mut [Value]) {
        outputs[0] = Value::float(input(inputs, 0) + input(inputs, 1));
    }
}

/// `A * B`
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiplyNode;

impl<C> Node<C> for MultiplyNode {
    fn name(&self) -> &str {
        "Multiply"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Math
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        vec![float_port("A"), float_port("B")]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        vec![float_port("Product")]
    }

    fn evaluate(&self, _ctx: &C, inputs: &[Value], outputs: &mut [Value]) {
        outputs[0] = Value::float(input(inputs, 0) * input(inputs, 1));
    }
}

/// `A * (1 - alpha) + B * alpha`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LerpNode {
    /// Weight used when the alpha input is unwired
    pub default_alpha: f32,
}

impl Default for LerpNode {
    fn default() -> Self {
        Self { default_alpha: 0.5 }
    }
}

impl<C> Node<C> for LerpNode {
    fn name(&self) -> &str {
        "Lerp"
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Blend
    }

    fn inputs(&self) -> Vec<PortDescriptor> {
        vec![float_port("A"), float_port("B"), float_port("Alpha")]
    }

    fn outputs(&self) -> Vec<PortDescriptor> {
        vec![float_port("Result")]
    }

    fn evaluate(&self, _ctx: &C, inputs: &[Value], outputs: &mut [Value]) {
        let a = input(inputs, 0);
        let b = input(inputs, 1);
        let alpha = inputs
            .get(2)
            .map_or(self.default_alpha, |v| v.first_or(self.default_alpha));
        outputs[0] = Value::float(a * (1.0 - alpha) + b * alpha);
    }
}
