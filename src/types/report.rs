//! Report shapes for the five engine entry points
//!
//! Every report is an immutable record constructed once per call, so tests
//! can compare whole reports by equality. Field names follow the dashboard
//! API contract the web client consumes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{HealthStatus, PestSeverity, RiskLevel};

// ============================================================================
// Dashboard Statistics
// ============================================================================

/// Windowed dashboard statistics (counts, distributions, averages).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    /// Fields visible in the caller's scope
    pub total_fields: usize,
    /// All-time observation count in scope
    pub total_observations: usize,
    /// Observations inside the report window
    pub observations_in_period: usize,
    /// Distinct crop varieties across all-time observations
    pub unique_crop_varieties: usize,
    /// Growth-stage histogram, count descending (ties: label ascending)
    pub growth_stages: Vec<StageCount>,
    /// Per-day observation counts, ascending by date; empty days omitted
    pub observations_over_time: Vec<DailyCount>,
    /// Top-10 crop varieties, count descending (ties: first seen wins)
    pub crop_varieties: Vec<VarietyCount>,
    /// Fertilizer application ratio over the window
    pub fertilizer_usage: UsageStats,
    /// Pesticide spray ratio over the window
    pub pesticide_usage: UsageStats,
    /// Average measurements over the window
    pub avg_measurements: AverageMeasurements,
    /// Fertilized vs. unfertilized average-height comparison
    pub fertilizer_performance: FertilizerStats,
}

/// One growth-stage histogram bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageCount {
    pub growth_stage: String,
    pub count: usize,
}

/// Observation count for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Observation count for one crop variety.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VarietyCount {
    pub crop_variety: String,
    pub count: usize,
}

/// Applied-vs-total ratio for a management action.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageStats {
    /// Records where the action was explicitly taken
    pub applied: usize,
    /// Records considered (window observation count)
    pub total: usize,
    /// `applied / total`, 0 when total is 0
    pub ratio: f64,
}

impl UsageStats {
    pub fn new(applied: usize, total: usize) -> Self {
        let ratio = if total > 0 {
            applied as f64 / total as f64
        } else {
            0.0
        };
        Self { applied, total, ratio }
    }
}

/// Window-wide measurement averages; `None` when no record carries a metric.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AverageMeasurements {
    pub avg_height: Option<f64>,
    pub avg_diameter: Option<f64>,
    pub avg_leaves: Option<f64>,
    pub avg_moisture: Option<f64>,
}

/// Average crop height split by fertilizer application.
///
/// Each side is independently 0 when no matching measurements exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FertilizerStats {
    pub fertilized: f64,
    pub unfertilized: f64,
}

// ============================================================================
// Trends
// ============================================================================

/// One moisture-trend bucket: all readings taken on one date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoisturePoint {
    pub date: NaiveDate,
    pub avg_moisture: f64,
    pub count: usize,
}

/// One growth-trend bucket; per-metric averages skip unrecorded values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    pub avg_height: Option<f64>,
    pub avg_diameter: Option<f64>,
    pub avg_leaves: Option<f64>,
    pub avg_population: Option<f64>,
    pub count: usize,
}

/// Growth time series plus the fertilizer comparison for the same selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GrowthAnalysis {
    pub trends: Vec<GrowthPoint>,
    pub fertilizer_stats: FertilizerStats,
}

// ============================================================================
// Insights
// ============================================================================

/// Insight category, mirroring the dashboard's card styling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Alert,
    Warning,
    Success,
    Info,
}

/// Direction an insight's metric is moving.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
    Neutral,
}

/// One human-readable insight entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub metric: String,
    pub trend: Trend,
}

// ============================================================================
// Advanced Analytics
// ============================================================================

/// Composite health score for one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldHealth {
    pub field_id: String,
    /// Composite score in [0, 100]
    pub score: f64,
    pub status: HealthStatus,
}

/// Pest situation across the window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PestDistribution {
    /// Window observation count
    pub total: usize,
    /// Records with pests explicitly present
    pub pest_present: usize,
    pub high_severity: usize,
    pub med_severity: usize,
    pub low_severity: usize,
    /// Mean affected-area percentage over records that reported one
    pub avg_area_affected: Option<f64>,
    /// Top-5 pest types by count (missing labels grouped as "Unknown")
    pub top_types: Vec<PestTypeCount>,
    /// Daily pest-presence rate (percent), ascending by date
    pub progression: Vec<PestPressurePoint>,
    /// Top-10 fields by average affected area, descending
    pub hotspots: Vec<FieldHotspot>,
    /// Intervention-effectiveness block
    pub effectiveness: EffectivenessReport,
}

/// Observation count for one pest type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PestTypeCount {
    pub pest_type: String,
    pub count: usize,
}

/// Pest-presence rate for one calendar date (0-100).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PestPressurePoint {
    pub date: NaiveDate,
    pub pest_presence_rate: f64,
}

/// Per-field pest pressure ranking entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldHotspot {
    pub field_id: String,
    /// Mean affected-area percentage (unrecorded areas count as 0)
    pub avg_affected: f64,
    /// Worst severity seen in the window
    pub max_severity: Option<PestSeverity>,
    pub observation_count: usize,
}

/// Outcome of pairing sprayed observations with their follow-up visits.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EffectivenessReport {
    /// Sprayed observations that had a follow-up visit
    pub total_checks: usize,
    /// Checks where severity dropped
    pub reduced_severity: usize,
    /// Checks where affected area dropped
    pub reduced_area: usize,
    /// `reduced_severity / total_checks * 100`, 0 when no checks
    pub severity_reduction_rate: f64,
    /// `reduced_area / total_checks * 100`, 0 when no checks
    pub area_reduction_rate: f64,
    /// High-severity pairs where treatment did not help
    pub ineffective_alerts: Vec<IneffectiveTreatment>,
    /// Averaged before/after pest state for charting
    pub comparison: TreatmentComparison,
}

/// A spray that left severity at High on the follow-up visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IneffectiveTreatment {
    pub field_id: String,
    pub pesticide: Option<String>,
    /// Date of the follow-up observation
    pub date: NaiveDate,
}

/// Averaged pest state before and after treatment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TreatmentComparison {
    pub before: TreatmentSnapshot,
    pub after: TreatmentSnapshot,
    /// Pairs contributing to the averages
    pub count: usize,
}

/// Mean severity ordinal and affected area for one side of the comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TreatmentSnapshot {
    pub avg_severity: f64,
    pub avg_area: f64,
}

/// Fertilizer reach across scoped fields in the window.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FertilizerCoverage {
    pub total_fields: usize,
    /// Distinct fields with at least one fertilized observation
    pub fertilized_fields: usize,
    /// `fertilized_fields / total_fields`, 0 when no fields
    pub coverage_ratio: f64,
    /// Mean fertilizer amount over fertilized records, 0 when none
    pub avg_amount_overall: f64,
    /// Usage per fertilizer type, count descending (ties: label ascending)
    pub usage_by_type: Vec<FertilizerTypeUsage>,
}

/// Usage statistics for one fertilizer type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerTypeUsage {
    pub fertilizer_type: String,
    pub count: usize,
    pub avg_amount: Option<f64>,
}

/// A risk condition with no matching intervention in the same observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionGap {
    pub field_id: String,
    /// Gap label, e.g. "Untreated Pest"
    pub issue: String,
    /// Severity label for the gap
    pub severity: String,
    pub date: NaiveDate,
}

/// Roll-up block for the advanced report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsSummary {
    /// Mean of all per-field health scores, 0 when the scope has no fields
    pub avg_health: f64,
    pub risk_level: RiskLevel,
}

/// The full advanced-analytics report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdvancedReport {
    /// One entry per scoped field, ascending by field id
    pub health_scores: Vec<FieldHealth>,
    pub pest_distribution: PestDistribution,
    pub fertilizer_coverage: FertilizerCoverage,
    /// Untreated-pest and water-stress gaps, at most 5 of each
    pub action_gaps: Vec<ActionGap>,
    pub summary: AnalyticsSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_stats_zero_denominator() {
        let u = UsageStats::new(0, 0);
        assert_eq!(u.ratio, 0.0);
    }

    #[test]
    fn usage_stats_ratio() {
        let u = UsageStats::new(3, 4);
        assert!((u.ratio - 0.75).abs() < 1e-12);
    }

    #[test]
    fn insight_kind_serializes_lowercase() {
        let insight = Insight {
            kind: InsightKind::Alert,
            title: "t".to_string(),
            message: "m".to_string(),
            metric: "1".to_string(),
            trend: Trend::Negative,
        };
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "alert");
        assert_eq!(json["trend"], "negative");
    }
}
