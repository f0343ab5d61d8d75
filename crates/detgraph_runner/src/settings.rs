// SPDX-License-Identifier: MIT OR Apache-2.0
//! Runner settings.
//!
//! Settings are stored as RON. A missing file is not an error: the runner
//! falls back to defaults so it can be launched without any setup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Default settings file name
pub const SETTINGS_FILE_NAME: &str = "detgraph.ron";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for these settings
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing the settings failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Which reference graph to build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scenario {
    /// Two constants feeding an adder
    Sum {
        /// First operand
        a: f32,
        /// Second operand
        b: f32,
    },
    /// Elapsed time scaled by a rate, compared against a limit, gating a
    /// labelled signal
    Threshold {
        /// Multiplier applied to elapsed seconds
        rate: f32,
        /// Value the scaled time must exceed
        limit: f32,
        /// Signal label
        label: String,
    },
}

impl Default for Scenario {
    fn default() -> Self {
        Self::Threshold {
            rate: 0.5,
            limit: 1.0,
            label: "overflow".to_string(),
        }
    }
}

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    /// Number of ticks to execute
    pub ticks: u64,
    /// Seconds per tick
    pub delta_time: f32,
    /// Seed passed through the tick context
    pub seed: u64,
    /// Run every tick twice and require bit-identical outputs
    pub verify_passes: bool,
    /// Graph to build
    pub scenario: Scenario,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            ticks: 120,
            delta_time: 1.0 / 60.0,
            seed: 0,
            verify_passes: true,
            scenario: Scenario::default(),
        }
    }
}

impl RunnerSettings {
    /// Load settings from a RON file, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Parse settings from RON text
    pub fn from_ron(content: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(content)?)
    }

    /// Serialize settings to pretty RON
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}
