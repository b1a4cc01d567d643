//! Rule-based insight generation
//!
//! A small, fixed-order rule engine over the window's aggregates. Rules are
//! independent — several can fire for the same window — and when none fires
//! a fallback entry reports steady monitoring, so the insight list is never
//! empty. Trigger thresholds come from [`InsightConfig`].

use tracing::debug;

use crate::config::InsightConfig;
use crate::types::{
    FertilizerStats, Insight, InsightKind, Observation, SoilMoistureLevel, Trend,
};

/// Evaluate the insight rules over the window's observations.
///
/// `fertilizer_performance` is the aggregator's comparison pair for the same
/// window; `days` is only used for the fallback message.
pub fn generate(
    window_obs: &[&Observation],
    fertilizer_performance: &FertilizerStats,
    days: i64,
    cfg: &InsightConfig,
) -> Vec<Insight> {
    let total = window_obs.len();
    let mut insights = Vec::new();

    // 1. Urgent attention flags
    let urgent_count = window_obs.iter().filter(|o| o.urgent_attention).count();
    if urgent_count > 0 {
        insights.push(Insight {
            kind: InsightKind::Alert,
            title: "Urgent Attention Required".to_string(),
            message: format!(
                "{urgent_count} field observation(s) have been flagged for urgent attention this month."
            ),
            metric: urgent_count.to_string(),
            trend: Trend::Negative,
        });
    }

    // 2. Pest activity rate
    let pest_count = window_obs
        .iter()
        .filter(|o| o.management.pest_present == Some(true))
        .count();
    if total > 0 && pest_count > 0 {
        let pest_rate = pest_count as f64 / total as f64 * 100.0;
        if pest_rate > cfg.pest_rate_warning_pct {
            insights.push(Insight {
                kind: InsightKind::Warning,
                title: "High Pest Activity".to_string(),
                message: format!(
                    "Pests detected in {pest_rate:.1}% of recent observations. Check pest management protocols."
                ),
                metric: format!("{pest_rate:.0}%"),
                trend: Trend::Negative,
            });
        }
    }

    // 3. Fertilizer uplift (both sides must have data)
    let fertilized = fertilizer_performance.fertilized;
    let unfertilized = fertilizer_performance.unfertilized;
    if fertilized > 0.0 && unfertilized > 0.0 {
        let diff_percent = (fertilized - unfertilized) / unfertilized * 100.0;
        if diff_percent > cfg.fertilizer_uplift_pct {
            insights.push(Insight {
                kind: InsightKind::Success,
                title: "Fertilizer Impact".to_string(),
                message: format!(
                    "Fertilized crops are {diff_percent:.1}% taller on average than unfertilized ones."
                ),
                metric: format!("+{diff_percent:.0}%"),
                trend: Trend::Positive,
            });
        }
    }

    // 4. Water stress
    let dry_count = window_obs
        .iter()
        .filter(|o| o.measurement.resolved_moisture_level() == Some(SoilMoistureLevel::Dry))
        .count();
    if dry_count > 0 && total > 0 {
        let dry_rate = dry_count as f64 / total as f64 * 100.0;
        if dry_rate > cfg.dry_rate_warning_pct {
            insights.push(Insight {
                kind: InsightKind::Warning,
                title: "Water Stress Risk".to_string(),
                message: format!(
                    "{dry_rate:.1}% of fields are reporting \"Dry\" soil conditions. Consider irrigation schedule review."
                ),
                metric: format!("{dry_rate:.0}%"),
                trend: Trend::Negative,
            });
        }
    }

    // Fallback: the list is never empty
    if insights.is_empty() {
        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Steady Monitoring".to_string(),
            message: format!(
                "Recorded {total} observations in the last {days} days. Keep collecting data to generate usage insights."
            ),
            metric: total.to_string(),
            trend: Trend::Neutral,
        });
    }

    debug!(total, generated = insights.len(), "generated insights");
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CropManagement, CropMeasurement};
    use chrono::NaiveDate;

    fn obs(id: u64) -> Observation {
        Observation {
            id,
            field_id: "F-001".to_string(),
            collector: String::new(),
            observation_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            crop_variety: "maize".to_string(),
            planting_date: None,
            growth_stage: String::new(),
            urgent_attention: false,
            synced: true,
            management: CropManagement::default(),
            measurement: CropMeasurement::default(),
        }
    }

    fn generate_for(observations: &[Observation], fert: FertilizerStats) -> Vec<Insight> {
        let refs: Vec<&Observation> = observations.iter().collect();
        generate(&refs, &fert, 30, &InsightConfig::default())
    }

    #[test]
    fn empty_window_yields_fallback() {
        let insights = generate_for(&[], FertilizerStats::default());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Info);
        assert_eq!(insights[0].title, "Steady Monitoring");
        assert_eq!(insights[0].metric, "0");
        assert_eq!(insights[0].trend, Trend::Neutral);
    }

    #[test]
    fn urgent_flags_fire_alert() {
        let mut a = obs(1);
        a.urgent_attention = true;
        let insights = generate_for(&[a, obs(2)], FertilizerStats::default());
        assert_eq!(insights[0].kind, InsightKind::Alert);
        assert_eq!(insights[0].title, "Urgent Attention Required");
        assert_eq!(insights[0].metric, "1");
    }

    #[test]
    fn pest_rate_at_threshold_does_not_fire() {
        // Exactly 20%: one pest observation out of five
        let mut observations: Vec<Observation> = (1u64..=5).map(obs).collect();
        observations[0].management.pest_present = Some(true);
        let insights = generate_for(&observations, FertilizerStats::default());
        assert!(insights.iter().all(|i| i.title != "High Pest Activity"));
    }

    #[test]
    fn pest_rate_above_threshold_fires_warning() {
        let mut observations: Vec<Observation> = (1u64..=4).map(obs).collect();
        observations[0].management.pest_present = Some(true);
        let insights = generate_for(&observations, FertilizerStats::default());
        let pest = insights
            .iter()
            .find(|i| i.title == "High Pest Activity")
            .unwrap();
        assert_eq!(pest.kind, InsightKind::Warning);
        assert_eq!(pest.metric, "25%");
        assert!(pest.message.contains("25.0%"));
    }

    #[test]
    fn fertilizer_uplift_requires_both_sides() {
        let insights = generate_for(
            &[obs(1)],
            FertilizerStats {
                fertilized: 150.0,
                unfertilized: 0.0,
            },
        );
        assert!(insights.iter().all(|i| i.title != "Fertilizer Impact"));
    }

    #[test]
    fn fertilizer_uplift_fires_success_with_plus_metric() {
        let insights = generate_for(
            &[obs(1)],
            FertilizerStats {
                fertilized: 120.0,
                unfertilized: 100.0,
            },
        );
        let fert = insights
            .iter()
            .find(|i| i.title == "Fertilizer Impact")
            .unwrap();
        assert_eq!(fert.kind, InsightKind::Success);
        assert_eq!(fert.metric, "+20%");
        assert_eq!(fert.trend, Trend::Positive);
    }

    #[test]
    fn dry_soil_rate_fires_water_stress() {
        let mut observations: Vec<Observation> = (1u64..=2).map(obs).collect();
        observations[0].measurement.soil_moisture = Some(10.0); // derives Dry
        let insights = generate_for(&observations, FertilizerStats::default());
        let water = insights
            .iter()
            .find(|i| i.title == "Water Stress Risk")
            .unwrap();
        assert_eq!(water.kind, InsightKind::Warning);
        assert_eq!(water.metric, "50%");
    }

    #[test]
    fn rules_are_independent_and_ordered() {
        let mut observations: Vec<Observation> = (1u64..=2).map(obs).collect();
        observations[0].urgent_attention = true;
        observations[0].management.pest_present = Some(true);
        observations[1].measurement.soil_moisture_level = Some(SoilMoistureLevel::Dry);
        observations[1].measurement.soil_moisture = Some(5.0);

        let insights = generate_for(
            &observations,
            FertilizerStats {
                fertilized: 120.0,
                unfertilized: 100.0,
            },
        );

        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Urgent Attention Required",
                "High Pest Activity",
                "Fertilizer Impact",
                "Water Stress Risk"
            ]
        );
    }
}
