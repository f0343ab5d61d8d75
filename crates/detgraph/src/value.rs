// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed payloads passed between ports.
//!
//! The engine only ever looks at a value's [`ValueType`] tag. How many numeric
//! components a value carries, and what they mean, is decided by the node
//! library that produces and consumes it.

use crate::port::ValueType;
use serde::{Deserialize, Serialize};

/// A typed payload flowing along an edge or held in the output cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    /// Type tag
    pub value_type: ValueType,
    /// Numeric components
    pub data: Vec<f32>,
    /// Text payload for text-carrying types
    pub text: Option<String>,
}

impl Value {
    /// The default value of a type: no components, no text
    pub fn empty(value_type: ValueType) -> Self {
        Self {
            value_type,
            data: Vec::new(),
            text: None,
        }
    }

    /// Create a value from numeric components
    pub fn new(value_type: ValueType, data: Vec<f32>) -> Self {
        Self {
            value_type,
            data,
            text: None,
        }
    }

    /// Single `Float` component
    pub fn float(value: f32) -> Self {
        Self::new(ValueType::Float, vec![value])
    }

    /// Single `Int` component
    pub fn int(value: i32) -> Self {
        Self::new(ValueType::Int, vec![value as f32])
    }

    /// Single `Bool` component (1.0 or 0.0)
    pub fn bool(value: bool) -> Self {
        Self::new(ValueType::Bool, vec![if value { 1.0 } else { 0.0 }])
    }

    /// `String` value with no numeric components
    pub fn string(text: impl Into<String>) -> Self {
        Self {
            value_type: ValueType::String,
            data: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// Attach a text payload
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Check whether this value carries no components and no text
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.text.is_none()
    }

    /// First numeric component, if present
    pub fn first(&self) -> Option<f32> {
        self.data.first().copied()
    }

    /// First component, or `default` when the value is short
    pub fn first_or(&self, default: f32) -> f32 {
        self.first().unwrap_or(default)
    }

    /// First component read as a boolean (non-zero is true)
    pub fn as_bool(&self) -> bool {
        self.first().is_some_and(|v| v != 0.0)
    }

    /// Bitwise equality, treating `NaN` payloads and signed zeros exactly.
    ///
    /// Determinism checks compare with this rather than `==`.
    pub fn bit_eq(&self, other: &Value) -> bool {
        self.value_type == other.value_type
            && self.text == other.text
            && self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
