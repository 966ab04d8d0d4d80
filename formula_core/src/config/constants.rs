//! Tunable combat constants

use super::ConfigError;
use crate::types::BASIS_POINTS;
use serde::{Deserialize, Serialize};

/// Tunable combat constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub hit: HitConstants,
    #[serde(default)]
    pub trace: TraceConstants,
    #[serde(default)]
    pub targets: TargetConstants,
}

impl CombatConstants {
    /// Reject constants the dispatcher cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hit.min_rate > self.hit.max_rate {
            return Err(ConfigError::ValidationError(format!(
                "hit.min_rate ({}) exceeds hit.max_rate ({})",
                self.hit.min_rate, self.hit.max_rate
            )));
        }
        if self.hit.min_rate < 0 || self.hit.max_rate > BASIS_POINTS {
            return Err(ConfigError::ValidationError(format!(
                "hit rate bounds must lie within 0..={}",
                BASIS_POINTS
            )));
        }
        if self.targets.default_count < 1 {
            return Err(ConfigError::ValidationError(
                "targets.default_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate constants from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::parse_toml(content)?;
        constants.validate()?;
        Ok(constants)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitConstants {
    /// Lowest hit rate a formula may report, in basis points
    #[serde(default = "default_min_rate")]
    pub min_rate: i64,
    /// Highest hit rate a formula may report, in basis points
    #[serde(default = "default_max_rate")]
    pub max_rate: i64,
}

impl Default for HitConstants {
    fn default() -> Self {
        HitConstants {
            min_rate: default_min_rate(),
            max_rate: default_max_rate(),
        }
    }
}

impl HitConstants {
    pub fn clamp(&self, rate: i64) -> i64 {
        rate.clamp(self.min_rate, self.max_rate)
    }
}

fn default_min_rate() -> i64 {
    0
}
fn default_max_rate() -> i64 {
    BASIS_POINTS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceConstants {
    /// Whether new contexts carry a trace sink
    #[serde(default = "default_trace_enabled")]
    pub enabled: bool,
}

impl Default for TraceConstants {
    fn default() -> Self {
        TraceConstants {
            enabled: default_trace_enabled(),
        }
    }
}

fn default_trace_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetConstants {
    /// Targets reported to formulas when the caller sets none
    #[serde(default = "default_target_count")]
    pub default_count: i64,
}

impl Default for TargetConstants {
    fn default() -> Self {
        TargetConstants {
            default_count: default_target_count(),
        }
    }
}

fn default_target_count() -> i64 {
    1
}
