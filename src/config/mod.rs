//! Analytics Configuration Module
//!
//! Rule thresholds, health-score weights, and report limits as
//! operator-tunable TOML values. Built-in defaults reproduce the dashboard's
//! original constants, so behavior is unchanged when no config file is
//! present.
//!
//! ## Loading Order
//!
//! 1. `CROPSIGHT_CONFIG` environment variable (path to TOML file)
//! 2. `cropsight.toml` in the current working directory
//! 3. Built-in defaults

mod analytics_config;

pub use analytics_config::*;
