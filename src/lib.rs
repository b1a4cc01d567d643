//! CropSight: Field-Observation Analytics
//!
//! Read-side analytics and insight generation over agricultural
//! field-observation snapshots.
//!
//! ## Architecture
//!
//! - **Aggregator**: windowed dashboard statistics
//! - **Trend Analyzer**: moisture and growth time series
//! - **Health Scorer**: composite 0-100 score per field
//! - **Effectiveness Analyzer**: spray/follow-up outcome pairing
//! - **Insight Generator**: rule engine for narrative insights
//!
//! The caller resolves authorization upstream and hands the engine an
//! already-filtered [`Snapshot`] (or any [`ObservationScope`]), together with
//! "today" from its own clock. Every report is a pure function of those
//! inputs.

pub mod config;
pub mod engine;
pub mod error;
pub mod scope;
pub mod types;

// Re-export the engine and its configuration
pub use config::{AnalyticsConfig, ConfigError, HealthConfig, InsightConfig, ReportConfig};
pub use engine::AnalyticsEngine;
pub use error::EngineError;
pub use scope::{ObservationScope, ReportWindow, Snapshot};

// Re-export commonly used data-model types
pub use types::{
    CropManagement, CropMeasurement, FieldRecord, HealthStatus, Observation, PestSeverity,
    RiskLevel, SoilMoistureLevel, Vigor, WeedPressure,
};

// Re-export report shapes
pub use types::{
    AdvancedReport, DashboardStats, FieldHealth, GrowthAnalysis, Insight, InsightKind,
    MoisturePoint, Trend,
};
