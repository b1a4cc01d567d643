//! Analytics engine: orchestrates the report computations
//!
//! [`AnalyticsEngine`] composes the sub-analyzers into the five report entry
//! points the API layer consumes:
//!
//! - **Aggregator**: windowed dashboard statistics
//! - **Trend Analyzer**: moisture and growth time series
//! - **Health Scorer**: composite per-field health scores
//! - **Effectiveness Analyzer**: spray/follow-up outcome pairing
//! - **Insight Generator**: rule-based narrative insights
//!
//! Every entry point is a pure function of (scope snapshot, caller clock,
//! parameters): the engine holds only configuration, performs no I/O, and
//! never mutates the snapshot. Per-field computations fan out with rayon and
//! are explicitly sorted before returning, so output order never depends on
//! scheduling.

pub mod aggregator;
pub mod effectiveness;
pub mod health;
pub mod insights;
pub mod trends;

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::AnalyticsConfig;
use crate::error::EngineError;
use crate::scope::{observations_in_window, ObservationScope, ReportWindow};
use crate::types::{
    ActionGap, AdvancedReport, AnalyticsSummary, DashboardStats, FertilizerCoverage,
    FertilizerTypeUsage, FieldHealth, FieldHotspot, FieldRecord, GrowthAnalysis, Insight,
    MoisturePoint, Observation, PestDistribution, PestPressurePoint, PestSeverity, PestTypeCount,
    RiskLevel, SoilMoistureLevel,
};

/// Label used when a grouping key (pest type, fertilizer type) was not
/// recorded.
const UNKNOWN_LABEL: &str = "Unknown";

/// The analytics engine. Cheap to construct; holds only configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    /// Engine with the given configuration.
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Dashboard statistics for the trailing window ending at `today`.
    pub fn dashboard_stats(
        &self,
        scope: &dyn ObservationScope,
        today: NaiveDate,
        days: i64,
    ) -> Result<DashboardStats, EngineError> {
        let window = ReportWindow::trailing(today, days)?;
        Ok(aggregator::dashboard_stats(scope, &window, &self.config.report))
    }

    /// Soil-moisture trend for the trailing window, optionally one field.
    pub fn moisture_trends(
        &self,
        scope: &dyn ObservationScope,
        today: NaiveDate,
        days: i64,
        field_id: Option<&str>,
    ) -> Result<Vec<MoisturePoint>, EngineError> {
        let window = ReportWindow::trailing(today, days)?;
        Ok(trends::moisture_trends(scope, &window, field_id))
    }

    /// All-time growth analysis for an optional variety/field selection.
    pub fn growth_analysis(
        &self,
        scope: &dyn ObservationScope,
        crop_variety: Option<&str>,
        field_id: Option<&str>,
    ) -> GrowthAnalysis {
        trends::growth_analysis(scope, crop_variety, field_id)
    }

    /// Narrative insights for the trailing window.
    pub fn insights(
        &self,
        scope: &dyn ObservationScope,
        today: NaiveDate,
        days: i64,
    ) -> Result<Vec<Insight>, EngineError> {
        let window = ReportWindow::trailing(today, days)?;
        let window_obs = observations_in_window(scope.observations(), &window);
        let fertilizer_performance = aggregator::fertilizer_performance(&window_obs);
        Ok(insights::generate(
            &window_obs,
            &fertilizer_performance,
            days,
            &self.config.insights,
        ))
    }

    /// The combined advanced-analytics report.
    pub fn advanced_analytics(
        &self,
        scope: &dyn ObservationScope,
        today: NaiveDate,
        days: i64,
    ) -> Result<AdvancedReport, EngineError> {
        let window = ReportWindow::trailing(today, days)?;
        let all = scope.observations();
        let window_obs = observations_in_window(all, &window);

        // Per-field window timelines; observations referencing fields outside
        // the scope's field list stay in scope-wide totals but are excluded
        // from the field-scoped breakdowns below.
        let mut by_field: HashMap<&str, Vec<&Observation>> = HashMap::new();
        for &obs in &window_obs {
            by_field.entry(obs.field_id.as_str()).or_default().push(obs);
        }

        let mut fields: Vec<&FieldRecord> = scope.fields().iter().collect();
        fields.sort_by(|a, b| a.field_id.cmp(&b.field_id));

        // Health scores are independent per field: fan out, then sort so the
        // output order is the field order, not the scheduling order.
        let health_cfg = &self.config.health;
        let mut health_scores: Vec<FieldHealth> = fields
            .par_iter()
            .map(|f| {
                let timeline = by_field
                    .get(f.field_id.as_str())
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                health::field_health(&f.field_id, timeline, &window, health_cfg)
            })
            .collect();
        health_scores.sort_by(|a, b| a.field_id.cmp(&b.field_id));

        let pest_distribution = self.pest_distribution(all, &window_obs, &by_field, &fields, &window);
        let fertilizer_coverage = self.fertilizer_coverage(&window_obs, &fields);
        let action_gaps = self.action_gaps(&window_obs, &fields);

        let avg_health = if health_scores.is_empty() {
            0.0
        } else {
            health_scores.iter().map(|h| h.score).sum::<f64>() / health_scores.len() as f64
        };
        let risk_level = if pest_distribution.high_severity > 0 {
            RiskLevel::High
        } else {
            RiskLevel::Low
        };

        info!(
            fields = fields.len(),
            window_obs = window_obs.len(),
            avg_health,
            risk = %risk_level,
            "computed advanced analytics"
        );

        Ok(AdvancedReport {
            health_scores,
            pest_distribution,
            fertilizer_coverage,
            action_gaps,
            summary: AnalyticsSummary {
                avg_health,
                risk_level,
            },
        })
    }

    fn pest_distribution(
        &self,
        all: &[Observation],
        window_obs: &[&Observation],
        by_field: &HashMap<&str, Vec<&Observation>>,
        fields: &[&FieldRecord],
        window: &ReportWindow,
    ) -> PestDistribution {
        let severity_count = |severity: PestSeverity| {
            window_obs
                .iter()
                .filter(|o| o.management.pest_severity == Some(severity))
                .count()
        };

        // Top pest types among observations with pests present
        let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for obs in window_obs {
            if obs.management.pest_present == Some(true) {
                let label = obs
                    .management
                    .pest_type
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(UNKNOWN_LABEL);
                *type_counts.entry(label).or_default() += 1;
            }
        }
        let mut top_types: Vec<PestTypeCount> = type_counts
            .into_iter()
            .map(|(pest_type, count)| PestTypeCount {
                pest_type: pest_type.to_string(),
                count,
            })
            .collect();
        // BTreeMap iteration is label-ascending, so a stable sort by count
        // leaves ties in label order.
        top_types.sort_by(|a, b| b.count.cmp(&a.count));
        top_types.truncate(self.config.report.top_pest_types);

        // Daily pest-presence rate
        let mut daily: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
        for obs in window_obs {
            let bucket = daily.entry(obs.observation_date).or_insert((0, 0));
            if obs.management.pest_present == Some(true) {
                bucket.0 += 1;
            }
            bucket.1 += 1;
        }
        let progression = daily
            .into_iter()
            .map(|(date, (pests, total))| PestPressurePoint {
                date,
                pest_presence_rate: pests as f64 / total as f64 * 100.0,
            })
            .collect();

        // Hotspots: fields with observations in the window, ranked by average
        // affected area
        let mut hotspots: Vec<FieldHotspot> = fields
            .iter()
            .filter_map(|f| {
                let timeline = by_field.get(f.field_id.as_str())?;
                let avg_affected = aggregator::mean(
                    timeline
                        .iter()
                        .filter_map(|o| o.management.pest_percentage_affected),
                )
                .unwrap_or(0.0);
                let max_severity = timeline
                    .iter()
                    .filter_map(|o| o.management.pest_severity)
                    .max();
                Some(FieldHotspot {
                    field_id: f.field_id.clone(),
                    avg_affected,
                    max_severity,
                    observation_count: timeline.len(),
                })
            })
            .collect();
        hotspots.sort_by(|a, b| {
            b.avg_affected
                .partial_cmp(&a.avg_affected)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.field_id.cmp(&b.field_id))
        });
        hotspots.truncate(self.config.report.top_hotspots);

        debug!(
            window_obs = window_obs.len(),
            hotspots = hotspots.len(),
            "computed pest distribution"
        );

        PestDistribution {
            total: window_obs.len(),
            pest_present: window_obs
                .iter()
                .filter(|o| o.management.pest_present == Some(true))
                .count(),
            high_severity: severity_count(PestSeverity::High),
            med_severity: severity_count(PestSeverity::Medium),
            low_severity: severity_count(PestSeverity::Low),
            avg_area_affected: aggregator::mean(
                window_obs
                    .iter()
                    .filter_map(|o| o.management.pest_percentage_affected),
            ),
            top_types,
            progression,
            hotspots,
            effectiveness: effectiveness::analyze(all, window),
        }
    }

    fn fertilizer_coverage(
        &self,
        window_obs: &[&Observation],
        fields: &[&FieldRecord],
    ) -> FertilizerCoverage {
        let scoped_ids: HashSet<&str> = fields.iter().map(|f| f.field_id.as_str()).collect();

        let fertilized: Vec<&&Observation> = window_obs
            .iter()
            .filter(|o| o.management.fertilizer_applied == Some(true))
            .collect();

        let fertilized_fields = fertilized
            .iter()
            .map(|o| o.field_id.as_str())
            .filter(|id| scoped_ids.contains(id))
            .collect::<HashSet<_>>()
            .len();

        // Usage per fertilizer type; BTreeMap + stable sort keeps ties in
        // label order
        let mut by_type: BTreeMap<&str, (usize, Vec<f64>)> = BTreeMap::new();
        for obs in &fertilized {
            let label = obs
                .management
                .fertilizer_type
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN_LABEL);
            let entry = by_type.entry(label).or_default();
            entry.0 += 1;
            if let Some(amount) = obs.management.fertilizer_amount {
                entry.1.push(amount);
            }
        }
        let mut usage_by_type: Vec<FertilizerTypeUsage> = by_type
            .into_iter()
            .map(|(label, (count, amounts))| FertilizerTypeUsage {
                fertilizer_type: label.to_string(),
                count,
                avg_amount: aggregator::mean(amounts.into_iter()),
            })
            .collect();
        usage_by_type.sort_by(|a, b| b.count.cmp(&a.count));

        let total_fields = fields.len();
        FertilizerCoverage {
            total_fields,
            fertilized_fields,
            coverage_ratio: if total_fields > 0 {
                fertilized_fields as f64 / total_fields as f64
            } else {
                0.0
            },
            avg_amount_overall: aggregator::mean(
                fertilized
                    .iter()
                    .filter_map(|o| o.management.fertilizer_amount),
            )
            .unwrap_or(0.0),
            usage_by_type,
        }
    }

    /// Untreated-pest and water-stress gaps, at most `max_action_gaps` each.
    ///
    /// A gap needs the intervention flag to be explicitly "no" — an
    /// unanswered question is not evidence of inaction.
    fn action_gaps(
        &self,
        window_obs: &[&Observation],
        fields: &[&FieldRecord],
    ) -> Vec<ActionGap> {
        let scoped_ids: HashSet<&str> = fields.iter().map(|f| f.field_id.as_str()).collect();
        let limit = self.config.report.max_action_gaps;

        let mut pest_gaps: Vec<&&Observation> = window_obs
            .iter()
            .filter(|o| scoped_ids.contains(o.field_id.as_str()))
            .filter(|o| {
                o.management.pest_present == Some(true) && o.management.sprayed == Some(false)
            })
            .collect();
        pest_gaps.sort_by_key(|o| (o.observation_date, o.id));

        let mut gaps: Vec<ActionGap> = pest_gaps
            .into_iter()
            .take(limit)
            .map(|o| ActionGap {
                field_id: o.field_id.clone(),
                issue: "Untreated Pest".to_string(),
                severity: o
                    .management
                    .pest_severity
                    .map_or(UNKNOWN_LABEL.to_string(), |s| s.to_string()),
                date: o.observation_date,
            })
            .collect();

        let mut dry_gaps: Vec<&&Observation> = window_obs
            .iter()
            .filter(|o| scoped_ids.contains(o.field_id.as_str()))
            .filter(|o| {
                o.measurement.resolved_moisture_level() == Some(SoilMoistureLevel::Dry)
                    && o.management.irrigation_applied == Some(false)
            })
            .collect();
        dry_gaps.sort_by_key(|o| (o.observation_date, o.id));

        gaps.extend(dry_gaps.into_iter().take(limit).map(|o| ActionGap {
            field_id: o.field_id.clone(),
            issue: "Water Stress (No Irrigation)".to_string(),
            severity: PestSeverity::High.to_string(),
            date: o.observation_date,
        }));

        gaps
    }
}
