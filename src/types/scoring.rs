//! Categorical scoring tables: severity, vigor, moisture, weed pressure
//!
//! One closed enumeration per categorical label set, each with its ordinal
//! rank and health-score table. The health scorer and the effectiveness
//! analyzer both read from here, so there is exactly one ordinal mapping in
//! the crate.

use serde::{Deserialize, Serialize};

// ============================================================================
// Pest Severity
// ============================================================================

/// Observed pest severity, ordered None < Low < Medium < High.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PestSeverity {
    None,
    Low,
    Medium,
    High,
}

impl PestSeverity {
    /// Ordinal rank used for numeric comparison (None=0 .. High=3).
    pub fn ordinal(self) -> u8 {
        match self {
            PestSeverity::None => 0,
            PestSeverity::Low => 1,
            PestSeverity::Medium => 2,
            PestSeverity::High => 3,
        }
    }

    /// Health-score contribution when pests are present.
    ///
    /// An unknown severity with pests present scores the neutral 50 — see
    /// `pest_health_score`.
    pub fn health_score(self) -> f64 {
        match self {
            PestSeverity::Low => 70.0,
            PestSeverity::Medium => 40.0,
            PestSeverity::High => 10.0,
            // "None" recorded while pests are present reads as severity
            // unknown, same as an absent label.
            PestSeverity::None => 50.0,
        }
    }

    /// Display label, matching the collector-facing vocabulary.
    pub fn as_str(self) -> &'static str {
        match self {
            PestSeverity::None => "None",
            PestSeverity::Low => "Low",
            PestSeverity::Medium => "Medium",
            PestSeverity::High => "High",
        }
    }

    /// Parse a free-form label; unrecognized input is `None` (unknown).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" => Some(PestSeverity::None),
            "low" => Some(PestSeverity::Low),
            "medium" | "med" => Some(PestSeverity::Medium),
            "high" => Some(PestSeverity::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for PestSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pest component of the health score.
///
/// Full score when no pests were seen (or the question went unanswered);
/// otherwise the severity table, with unknown severity at the neutral 50.
pub fn pest_health_score(pest_present: Option<bool>, severity: Option<PestSeverity>) -> f64 {
    if pest_present == Some(true) {
        severity.map_or(50.0, PestSeverity::health_score)
    } else {
        100.0
    }
}

// ============================================================================
// Vigor
// ============================================================================

/// Collector-assessed plant vigor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vigor {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Vigor {
    /// Health-score contribution; unknown vigor scores 50 (see `vigor_health_score`).
    pub fn health_score(self) -> f64 {
        match self {
            Vigor::Poor => 20.0,
            Vigor::Fair => 50.0,
            Vigor::Good => 80.0,
            Vigor::Excellent => 100.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Vigor::Poor => "Poor",
            Vigor::Fair => "Fair",
            Vigor::Good => "Good",
            Vigor::Excellent => "Excellent",
        }
    }

    /// Parse a free-form label; unrecognized input is `None` (unknown).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "poor" => Some(Vigor::Poor),
            "fair" => Some(Vigor::Fair),
            "good" => Some(Vigor::Good),
            "excellent" => Some(Vigor::Excellent),
            _ => None,
        }
    }
}

impl std::fmt::Display for Vigor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vigor component of the health score; neutral 50 when not assessed.
pub fn vigor_health_score(vigor: Option<Vigor>) -> f64 {
    vigor.map_or(50.0, Vigor::health_score)
}

// ============================================================================
// Soil Moisture Level
// ============================================================================

/// Soil moisture bucket: Dry (< 30%), Moist (30-70%), Wet (> 70%).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SoilMoistureLevel {
    Dry,
    Moist,
    Wet,
}

impl SoilMoistureLevel {
    /// Health-score contribution. Too wet costs less than too dry; an
    /// unassessed level scores full (see `moisture_health_score`).
    pub fn health_score(self) -> f64 {
        match self {
            SoilMoistureLevel::Dry => 30.0,
            SoilMoistureLevel::Moist => 100.0,
            SoilMoistureLevel::Wet => 70.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SoilMoistureLevel::Dry => "Dry",
            SoilMoistureLevel::Moist => "Moist",
            SoilMoistureLevel::Wet => "Wet",
        }
    }

    /// Parse a free-form label; unrecognized input is `None` (unknown).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dry" => Some(SoilMoistureLevel::Dry),
            "moist" => Some(SoilMoistureLevel::Moist),
            "wet" => Some(SoilMoistureLevel::Wet),
            _ => None,
        }
    }
}

impl std::fmt::Display for SoilMoistureLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moisture component of the health score; full score when unset.
pub fn moisture_health_score(level: Option<SoilMoistureLevel>) -> f64 {
    level.map_or(100.0, SoilMoistureLevel::health_score)
}

// ============================================================================
// Weed Pressure
// ============================================================================

/// Collector-assessed weed pressure, ordered Low < Medium < High.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeedPressure {
    Low,
    Medium,
    High,
}

impl WeedPressure {
    /// Health-score contribution; unknown pressure scores 80 (see `weed_health_score`).
    pub fn health_score(self) -> f64 {
        match self {
            WeedPressure::Low => 100.0,
            WeedPressure::Medium => 60.0,
            WeedPressure::High => 20.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeedPressure::Low => "Low",
            WeedPressure::Medium => "Medium",
            WeedPressure::High => "High",
        }
    }

    /// Parse a free-form label; unrecognized input is `None` (unknown).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(WeedPressure::Low),
            "medium" | "med" => Some(WeedPressure::Medium),
            "high" => Some(WeedPressure::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for WeedPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weed component of the health score; 80 when not assessed.
pub fn weed_health_score(pressure: Option<WeedPressure>) -> f64 {
    pressure.map_or(80.0, WeedPressure::health_score)
}

// ============================================================================
// Health Status & Risk Level
// ============================================================================

/// Per-field health bucket derived from the composite score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Warning => "Warning",
            HealthStatus::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scope-wide risk flag for the advanced-analytics summary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RiskLevel {
    #[default]
    Low,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}
