//! Tunable parameters for the filter pipeline.
//!
//! [`FilterConfig`] collects the worker count and every constant used by the
//! threshold and colour-adjustment filters. It can be built in code, or
//! loaded from YAML where missing keys fall back to the defaults:
//!
//! ```yaml
//! workers: 8
//! black_threshold: 40
//! ```
//!
//! # Example
//!
//! ```rust
//! use convkit_ops::FilterConfig;
//!
//! let cfg = FilterConfig::from_yaml_str("workers: 8\nblack_threshold: 40\n").unwrap();
//! assert_eq!(cfg.workers, 8);
//! assert_eq!(cfg.black_threshold, 40);
//! assert_eq!(cfg.white_threshold, 200);
//! ```

use crate::partition::DEFAULT_WORKERS;
use crate::{OpsError, OpsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Parameters shared by all pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Row partitions per convolution (must be >= 1).
    pub workers: usize,
    /// Average below which `black_below` blacks a pixel out.
    pub black_threshold: u8,
    /// Average above which `white_above` whitens a pixel.
    pub white_threshold: u8,
    /// Strength of the saturate filter.
    pub saturate_weight: f32,
    /// Strength of the desaturate filter.
    pub desaturate_weight: f32,
    /// Added per channel by the brighten filter.
    pub brighten_amount: i32,
    /// Subtracted per channel by the darken filter.
    pub darken_amount: i32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            black_threshold: 60,
            white_threshold: 200,
            saturate_weight: 0.5,
            desaturate_weight: 0.5,
            brighten_amount: 50,
            darken_amount: 50,
        }
    }
}

impl FilterConfig {
    /// Loads and validates a YAML config file.
    pub fn from_file(path: impl AsRef<Path>) -> OpsResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading filter config");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses and validates YAML.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        let config: FilterConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> OpsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks value ranges that the type system cannot express.
    pub fn validate(&self) -> OpsResult<()> {
        if self.workers == 0 {
            return Err(OpsError::Config("workers must be >= 1".into()));
        }
        for (name, weight) in [
            ("saturate_weight", self.saturate_weight),
            ("desaturate_weight", self.desaturate_weight),
        ] {
            if !weight.is_finite() {
                return Err(OpsError::Config(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Returns a copy with a different worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}
