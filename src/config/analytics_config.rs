//! Analytics configuration - tunable thresholds, weights, and report limits
//!
//! Every section defaults independently via `#[serde(default)]`, so a config
//! file may set a single key and inherit the rest.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Root configuration for the analytics engine.
///
/// Load with [`AnalyticsConfig::load`], which searches:
/// 1. `$CROPSIGHT_CONFIG` env var
/// 2. `./cropsight.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    /// Health-score component weights and status thresholds
    #[serde(default)]
    pub health: HealthConfig,

    /// Insight rule trigger thresholds
    #[serde(default)]
    pub insights: InsightConfig,

    /// Report window and list-size limits
    #[serde(default)]
    pub report: ReportConfig,
}

impl AnalyticsConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("CROPSIGHT_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded analytics config from CROPSIGHT_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from CROPSIGHT_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "CROPSIGHT_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("cropsight.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded analytics config from ./cropsight.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./cropsight.toml, using defaults");
                }
            }
        }

        info!("No cropsight.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),
}

// ============================================================================
// Health Scoring
// ============================================================================

/// Health-score weights and status thresholds.
///
/// Weights should sum to 1.0; they are applied as-is, so an operator can
/// deliberately over- or under-weight the composite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HealthConfig {
    /// Vigor component weight
    pub vigor_weight: f64,
    /// Pest component weight
    pub pest_weight: f64,
    /// Soil moisture component weight
    pub moisture_weight: f64,
    /// Weed pressure component weight
    pub weed_weight: f64,
    /// Score assigned to fields with no measurement in the window
    pub neutral_score: f64,
    /// Scores strictly above this are Healthy
    pub healthy_above: f64,
    /// Scores strictly above this (and not Healthy) are Warning
    pub warning_above: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            vigor_weight: 0.4,
            pest_weight: 0.3,
            moisture_weight: 0.2,
            weed_weight: 0.1,
            neutral_score: 50.0,
            healthy_above: 75.0,
            warning_above: 40.0,
        }
    }
}

// ============================================================================
// Insight Rules
// ============================================================================

/// Trigger thresholds for the insight rules, in rule order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InsightConfig {
    /// Pest-presence rate (percent) above which "High Pest Activity" fires
    pub pest_rate_warning_pct: f64,
    /// Fertilized-vs-unfertilized height uplift (percent) above which
    /// "Fertilizer Impact" fires
    pub fertilizer_uplift_pct: f64,
    /// Dry-soil rate (percent) above which "Water Stress Risk" fires
    pub dry_rate_warning_pct: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            pest_rate_warning_pct: 20.0,
            fertilizer_uplift_pct: 10.0,
            dry_rate_warning_pct: 30.0,
        }
    }
}

// ============================================================================
// Report Limits
// ============================================================================

/// Report window default and top-N list limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Window length used when the caller does not pass one (days)
    pub default_window_days: i64,
    /// Crop varieties listed in dashboard stats
    pub top_varieties: usize,
    /// Pest types listed in the pest distribution
    pub top_pest_types: usize,
    /// Fields listed as hotspots
    pub top_hotspots: usize,
    /// Action gaps listed per gap kind
    pub max_action_gaps: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_window_days: 30,
            top_varieties: 10,
            top_pest_types: 5,
            top_hotspots: 10,
            max_action_gaps: 5,
        }
    }
}
