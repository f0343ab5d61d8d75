// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tick loop with pass-to-pass verification.

use crate::scenario::BuiltScenario;
use crate::settings::{RunnerSettings, SettingsError};
use detgraph::{GraphError, OutputKey, TickContext, Value};
use thiserror::Error;

/// Run errors
#[derive(Debug, Error)]
pub enum RunError {
    /// Compile or execute failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Settings could not be loaded
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// A repeated pass produced different outputs
    #[error("Tick {tick}: repeated pass diverged at node {} port {}", .key.node(), .key.port())]
    Diverged {
        /// Tick at which the passes differed
        tick: u64,
        /// First differing output
        key: OutputKey,
    },
}

/// Final probe values after the last tick
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Ticks executed
    pub ticks: u64,
    /// Passes executed, including verification passes
    pub passes: u64,
    /// `(label, value)` for every probe that produced output
    pub probes: Vec<(&'static str, Value)>,
}

/// Compile the scenario graph and run it for the configured ticks
pub fn run(settings: &RunnerSettings, built: BuiltScenario) -> Result<RunReport, RunError> {
    let BuiltScenario { mut graph, probes } = built;
    graph.compile().map_err(GraphError::from)?;
    tracing::info!(
        graph = %graph.name,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Running {} ticks",
        settings.ticks
    );

    let mut ctx = TickContext::new(0, settings.delta_time, settings.seed);
    for _ in 0..settings.ticks {
        graph.execute(&ctx).map_err(GraphError::from)?;

        if settings.verify_passes {
            let first: Vec<(OutputKey, Value)> = graph.outputs().map(|(k, v)| (k, v.clone())).collect();
            graph.execute(&ctx).map_err(GraphError::from)?;
            if let Some(key) = first_divergence(&first, graph.outputs()) {
                tracing::error!(tick = ctx.tick, "Repeated pass diverged");
                return Err(RunError::Diverged { tick: ctx.tick, key });
            }
        }

        ctx = ctx.next();
    }

    let probes = probes
        .iter()
        .filter_map(|probe| {
            graph
                .output(probe.node, probe.port)
                .map(|value| (probe.label, value.clone()))
        })
        .collect();

    Ok(RunReport {
        ticks: settings.ticks,
        passes: graph.pass_count(),
        probes,
    })
}

fn first_divergence<'a>(
    expected: &[(OutputKey, Value)],
    actual: impl Iterator<Item = (OutputKey, &'a Value)>,
) -> Option<OutputKey> {
    let mut actual = actual.peekable();
    for (key, value) in expected {
        match actual.next() {
            Some((other_key, other)) if other_key == *key && other.bit_eq(value) => {}
            _ => return Some(*key),
        }
    }
    actual.peek().map(|(key, _)| *key)
}
