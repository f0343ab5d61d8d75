// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port declarations for node inputs/outputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a port within a node's input or output list
pub type PortIndex = u16;

/// Data type that can flow through ports.
///
/// Two ports may be wired together only when their types are equal. There are
/// no implicit conversions: a `Float` output cannot feed an `Int` input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueType {
    /// Boolean value (one component, 0.0 or 1.0)
    Bool,
    /// Integer value stored as a float component
    Int,
    /// Floating point value
    Float,
    /// 2D vector
    Vector2,
    /// 3D vector
    Vector3,
    /// 4D vector
    Vector4,
    /// Color (RGBA)
    Color,
    /// Text value, carried in the value's text field
    String,
    /// Edge-triggered signal (UI logic, behavior triggers)
    Signal,
    /// Random seed (world generation)
    Seed,
    /// Library-defined type, e.g. `"BoneTransform"` or `"HeightField"`
    Custom(String),
}

impl ValueType {
    /// Create a library-defined type tag
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Short display name for diagnostics
    pub fn name(&self) -> &str {
        match self {
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Vector4 => "Vector4",
            Self::Color => "Color",
            Self::String => "String",
            Self::Signal => "Signal",
            Self::Seed => "Seed",
            Self::Custom(name) => name,
        }
    }

    /// Check if an output of this type may feed an input of `other`
    pub fn can_connect_to(&self, other: &ValueType) -> bool {
        self == other
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declares one input or output port of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortDescriptor {
    /// Port name (diagnostics only)
    pub name: String,
    /// Data type
    pub value_type: ValueType,
}

impl PortDescriptor {
    /// Create a new port descriptor
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }

    /// Check if this (output) port may feed the given (input) port
    pub fn can_connect(&self, input: &PortDescriptor) -> bool {
        self.value_type.can_connect_to(&input.value_type)
    }
}
