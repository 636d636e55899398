//! Run configuration.
//!
//! Values are resolved in three layers: built-in defaults, then an optional
//! YAML file, then explicit command-line flags (which may themselves come
//! from environment variables through clap).
//!
//! ```yaml
//! qubits: 50
//! layers: 5
//! shots: 1000
//! noise: 0.001
//! seed: 42
//! threads: 4
//! format: json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use qharness_sim::{DEFAULT_MAX_GATES, DEFAULT_MAX_QUBITS, DEFAULT_MAX_SHOTS};

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// `key: value` lines.
    #[default]
    Text,
    /// A single JSON object.
    Json,
}

/// Errors raised while loading or checking the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid YAML for [`RunConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A value is outside its allowed range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything a `run` needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Number of qubits.
    pub qubits: u32,
    /// Number of ansatz layers.
    pub layers: u32,
    /// Number of shots.
    pub shots: u64,
    /// Depolarizing probability on rotation gates.
    pub noise: f64,
    /// Base seed; drawn at random when absent.
    pub seed: Option<u64>,
    /// Sampling worker threads.
    pub threads: usize,
    /// Upper bound on `shots`.
    pub max_shots: u64,
    /// Upper bound on `qubits`.
    pub max_qubits: u32,
    /// Upper bound on the gates the ansatz may emit.
    pub max_gates: u64,
    /// Report rendering.
    pub format: ReportFormat,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            qubits: 50,
            layers: 5,
            shots: 1000,
            noise: 0.001,
            seed: None,
            threads: 1,
            max_shots: DEFAULT_MAX_SHOTS,
            max_qubits: DEFAULT_MAX_QUBITS,
            max_gates: DEFAULT_MAX_GATES,
            format: ReportFormat::Text,
        }
    }
}

impl RunConfig {
    /// Parse a YAML document; missing keys keep their defaults.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Load a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    /// Check settings that the simulation crate does not validate itself.
    ///
    /// Qubit and layer counts, noise probability and shot count are checked
    /// by the builder, injector and sampler against these bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::Invalid("threads must be at least 1".into()));
        }
        if self.max_shots == 0 {
            return Err(ConfigError::Invalid("max_shots must be at least 1".into()));
        }
        if self.max_qubits == 0 {
            return Err(ConfigError::Invalid("max_qubits must be at least 1".into()));
        }
        Ok(())
    }
}
