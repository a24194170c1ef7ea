//! Project configuration (`linkrank.toml`).
//!
//! Only the `[rank]` table is read. Every key is optional; unset keys take
//! the estimator defaults, and command-line flags override the file.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{RankError, check_damping};
use crate::estimate::{DEFAULT_DAMPING, DEFAULT_MAX_ITER, DEFAULT_SAMPLES, IterationConfig};

/// Conventional config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "linkrank.toml";

/// Top-level contents of `linkrank.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub rank: RankConfig,
}

/// Estimator settings (`[rank]` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Seed for the sampling estimator; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            samples: default_samples(),
            seed: None,
            max_iter: default_max_iter(),
        }
    }
}

impl RankConfig {
    /// Reject out-of-range settings. Nothing is clamped.
    ///
    /// # Errors
    ///
    /// [`RankError::InvalidDamping`] or [`RankError::InvalidSampleCount`].
    pub fn validate(&self) -> Result<(), RankError> {
        check_damping(self.damping)?;
        if self.samples == 0 {
            return Err(RankError::InvalidSampleCount(self.samples));
        }
        Ok(())
    }

    /// Power-iteration settings derived from this config.
    #[must_use]
    pub fn iteration(&self) -> IterationConfig {
        IterationConfig {
            damping: self.damping,
            max_iter: self.max_iter,
        }
    }
}

/// Load a config file. A missing file yields the defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

const fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

const fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

const fn default_max_iter() -> usize {
    DEFAULT_MAX_ITER
}
