//! Pipeline configuration.
//!
//! Serializable so runners can load it from job config files; every field
//! has the documented default, so an empty `[pipeline]` section is valid.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must contain only positive window sizes")]
    ZeroWindow(&'static str),

    #[error("date_column must not be empty")]
    EmptyDateColumn,
}

/// A cross-asset ratio, matched by exact column names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatioPair {
    pub numerator: String,
    pub denominator: String,
}

/// Everything the pipeline is parameterized on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Name of the date column.
    #[serde(default = "default_date_column")]
    pub date_column: String,

    /// Windows for the moving-average stage. The set keeps them ordered.
    #[serde(default = "default_ma_windows")]
    pub moving_average_windows: BTreeSet<usize>,

    /// Window for the volatility stage.
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,

    /// Ratio columns to attempt, in order.
    #[serde(default = "default_ratio_pairs")]
    pub ratio_pairs: Vec<RatioPair>,
}

fn default_date_column() -> String {
    "Date".to_string()
}

fn default_ma_windows() -> BTreeSet<usize> {
    BTreeSet::from([7, 30, 90])
}

fn default_volatility_window() -> usize {
    30
}

fn default_ratio_pairs() -> Vec<RatioPair> {
    vec![
        RatioPair {
            numerator: "Gold".to_string(),
            denominator: "Oil".to_string(),
        },
        RatioPair {
            numerator: "S&P 500".to_string(),
            denominator: "NASDAQ".to_string(),
        },
    ]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            date_column: default_date_column(),
            moving_average_windows: default_ma_windows(),
            volatility_window: default_volatility_window(),
            ratio_pairs: default_ratio_pairs(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.date_column.trim().is_empty() {
            return Err(ConfigError::EmptyDateColumn);
        }
        if self.moving_average_windows.contains(&0) {
            return Err(ConfigError::ZeroWindow("moving_average_windows"));
        }
        if self.volatility_window == 0 {
            return Err(ConfigError::ZeroWindow("volatility_window"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.date_column, "Date");
        assert_eq!(
            config.moving_average_windows,
            BTreeSet::from([7, 30, 90])
        );
        assert_eq!(config.volatility_window, 30);
        assert_eq!(config.ratio_pairs.len(), 2);
        assert_eq!(config.ratio_pairs[0].numerator, "Gold");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_windows_are_rejected() {
        let mut config = PipelineConfig::default();
        config.moving_average_windows.insert(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroWindow("moving_average_windows"))
        );

        let config = PipelineConfig {
            volatility_window: 0,
            ..PipelineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroWindow("volatility_window"))
        );
    }

    #[test]
    fn empty_date_column_is_rejected() {
        let config = PipelineConfig {
            date_column: "  ".to_string(),
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyDateColumn));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: PipelineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn round_trips_through_serde() {
        let config = PipelineConfig {
            date_column: "day".to_string(),
            moving_average_windows: BTreeSet::from([5]),
            volatility_window: 10,
            ratio_pairs: vec![RatioPair {
                numerator: "BTC".to_string(),
                denominator: "ETH".to_string(),
            }],
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
