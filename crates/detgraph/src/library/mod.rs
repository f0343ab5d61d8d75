// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reference node library.
//!
//! Small, context-agnostic nodes for wiring up graphs in tests and tools.
//! Production node sets (bone kinematics, utility scoring, terrain noise)
//! live with their subsystems and only depend on the [`Node`](crate::Node)
//! contract.

pub mod logic;
pub mod math;

pub use logic::{CompareNode, CompareOp, GateNode, TextNode, TimeNode};
pub use math::{AddNode, ConstantNode, LerpNode, MultiplyNode};
