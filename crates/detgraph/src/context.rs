// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ready-made per-pass context.
//!
//! A graph is generic over its context type, so callers can pass whatever
//! their subsystem needs. `TickContext` covers the common case of a fixed-step
//! simulation tick.

use serde::{Deserialize, Serialize};

/// Fixed-step tick context
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickContext {
    /// Simulation tick number
    pub tick: u64,
    /// Seconds per tick
    pub delta_time: f32,
    /// Deterministic random seed
    pub seed: u64,
}

impl TickContext {
    /// Create a context for the given tick
    pub fn new(tick: u64, delta_time: f32, seed: u64) -> Self {
        Self {
            tick,
            delta_time,
            seed,
        }
    }

    /// Elapsed simulation time at this tick.
    ///
    /// Computed from the tick count rather than accumulated, so the value for
    /// a given tick does not depend on how many passes ran before it.
    pub fn elapsed(&self) -> f64 {
        self.tick as f64 * f64::from(self.delta_time)
    }

    /// Context for the following tick
    pub fn next(&self) -> Self {
        Self {
            tick: self.tick + 1,
            ..*self
        }
    }
}

impl Default for TickContext {
    fn default() -> Self {
        Self::new(0, 1.0 / 60.0, 0)
    }
}
