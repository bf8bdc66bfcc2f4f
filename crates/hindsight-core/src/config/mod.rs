//! Configuration: one `#[serde(default)]` section per pipeline stage, loaded from TOML.

mod clustering_config;
pub mod defaults;
mod detection_config;
mod observability_config;
mod tiering_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use clustering_config::ClusteringConfig;
pub use detection_config::DetectionConfig;
pub use observability_config::ObservabilityConfig;
pub use tiering_config::TieringConfig;

use crate::errors::{HindsightError, HindsightResult};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HindsightConfig {
    pub detection: DetectionConfig,
    pub clustering: ClusteringConfig,
    pub tiering: TieringConfig,
    pub observability: ObservabilityConfig,
}

impl HindsightConfig {
    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml(source: &str) -> HindsightResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| HindsightError::ConfigError {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> HindsightResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| HindsightError::ConfigError {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml(&source)
    }

    /// Reject values the pipeline cannot operate with.
    pub fn validate(&self) -> HindsightResult<()> {
        let unit_ranged = [
            ("clustering.similarity_threshold", self.clustering.similarity_threshold),
            ("tiering.anchor_threshold", self.tiering.anchor_threshold),
            (
                "detection.repeat_similarity_threshold",
                self.detection.repeat_similarity_threshold,
            ),
            ("detection.escalation_bonus", self.detection.escalation_bonus),
        ];
        for (name, value) in unit_ranged {
            if !(0.0..=1.0).contains(&value) {
                return Err(HindsightError::ConfigError {
                    reason: format!("{name} must be within [0, 1], got {value}"),
                });
            }
        }
        if self.detection.lookback_window == 0 {
            return Err(HindsightError::ConfigError {
                reason: "detection.lookback_window must be at least 1".to_string(),
            });
        }
        if self.clustering.repetition_threshold == 0 {
            return Err(HindsightError::ConfigError {
                reason: "clustering.repetition_threshold must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
