//! Windowed dashboard statistics
//!
//! Counts, distributions, and averages over the scoped observation
//! collection. Everything here is a pure fold over the snapshot: no
//! repository access, no errors — empty input degrades to zeros and `None`s.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::config::ReportConfig;
use crate::scope::{observations_in_window, ObservationScope, ReportWindow};
use crate::types::{
    AverageMeasurements, DailyCount, DashboardStats, FertilizerStats, Observation, StageCount,
    UsageStats, VarietyCount,
};

/// Compute dashboard statistics for the window.
pub fn dashboard_stats(
    scope: &dyn ObservationScope,
    window: &ReportWindow,
    cfg: &ReportConfig,
) -> DashboardStats {
    let all = scope.observations();
    let in_window = observations_in_window(all, window);

    debug!(
        total = all.len(),
        in_window = in_window.len(),
        start = %window.start,
        end = %window.end,
        "computing dashboard stats"
    );

    let unique_crop_varieties = all
        .iter()
        .map(|o| o.crop_variety.as_str())
        .collect::<HashSet<_>>()
        .len();

    DashboardStats {
        total_fields: scope.fields().len(),
        total_observations: all.len(),
        observations_in_period: in_window.len(),
        unique_crop_varieties,
        growth_stages: growth_stage_histogram(&in_window),
        observations_over_time: daily_counts(&in_window),
        crop_varieties: top_varieties(&in_window, cfg.top_varieties),
        fertilizer_usage: UsageStats::new(
            count_flag(&in_window, |o| o.management.fertilizer_applied),
            in_window.len(),
        ),
        pesticide_usage: UsageStats::new(
            count_flag(&in_window, |o| o.management.sprayed),
            in_window.len(),
        ),
        avg_measurements: average_measurements(&in_window),
        fertilizer_performance: fertilizer_performance(&in_window),
    }
}

/// Growth-stage histogram, count descending, ties broken by label ascending.
fn growth_stage_histogram(observations: &[&Observation]) -> Vec<StageCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for obs in observations {
        *counts.entry(obs.growth_stage.as_str()).or_default() += 1;
    }

    let mut stages: Vec<StageCount> = counts
        .into_iter()
        .map(|(growth_stage, count)| StageCount {
            growth_stage: growth_stage.to_string(),
            count,
        })
        .collect();
    stages.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.growth_stage.cmp(&b.growth_stage))
    });
    stages
}

/// Per-day observation counts, ascending by date. Days without observations
/// never materialize as buckets.
fn daily_counts(observations: &[&Observation]) -> Vec<DailyCount> {
    let mut counts = BTreeMap::new();
    for obs in observations {
        *counts.entry(obs.observation_date).or_insert(0usize) += 1;
    }
    counts
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

/// Top-N crop varieties by count; ties keep the variety seen first.
fn top_varieties(observations: &[&Observation], limit: usize) -> Vec<VarietyCount> {
    // (count, first-seen index) per variety
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, obs) in observations.iter().enumerate() {
        let entry = counts.entry(obs.crop_variety.as_str()).or_insert((0, idx));
        entry.0 += 1;
    }

    let mut varieties: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(variety, (count, first_seen))| (variety, count, first_seen))
        .collect();
    varieties.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
    varieties.truncate(limit);
    varieties
        .into_iter()
        .map(|(crop_variety, count, _)| VarietyCount {
            crop_variety: crop_variety.to_string(),
            count,
        })
        .collect()
}

/// Count observations where a tri-state management flag is explicitly set.
fn count_flag(
    observations: &[&Observation],
    flag: impl Fn(&Observation) -> Option<bool>,
) -> usize {
    observations
        .iter()
        .filter(|o| flag(o) == Some(true))
        .count()
}

fn average_measurements(observations: &[&Observation]) -> AverageMeasurements {
    AverageMeasurements {
        avg_height: mean(observations.iter().filter_map(|o| o.measurement.crop_height_cm)),
        avg_diameter: mean(observations.iter().filter_map(|o| o.measurement.stalk_diameter)),
        avg_leaves: mean(observations.iter().filter_map(|o| o.measurement.number_of_leaves)),
        avg_moisture: mean(observations.iter().filter_map(|o| o.measurement.soil_moisture)),
    }
}

/// Average crop height split by explicit fertilizer application.
///
/// Observations with an unanswered fertilizer question belong to neither
/// side; a side with no measured heights reports 0.
pub(crate) fn fertilizer_performance(observations: &[&Observation]) -> FertilizerStats {
    let side = |applied: bool| {
        mean(
            observations
                .iter()
                .filter(|o| o.management.fertilizer_applied == Some(applied))
                .filter_map(|o| o.measurement.crop_height_cm),
        )
        .unwrap_or(0.0)
    };
    FertilizerStats {
        fertilized: side(true),
        unfertilized: side(false),
    }
}

/// Mean of an iterator of readings; `None` when empty.
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Snapshot;
    use crate::types::{CropManagement, CropMeasurement, FieldRecord};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn obs(id: u64, day: u32, variety: &str, stage: &str) -> Observation {
        Observation {
            id,
            field_id: "F-001".to_string(),
            collector: "ann".to_string(),
            observation_date: date(day),
            crop_variety: variety.to_string(),
            planting_date: None,
            growth_stage: stage.to_string(),
            urgent_attention: false,
            synced: true,
            management: CropManagement::default(),
            measurement: CropMeasurement::default(),
        }
    }

    fn field(id: &str) -> FieldRecord {
        FieldRecord {
            field_id: id.to_string(),
            name: id.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            boundary: None,
            collector: "ann".to_string(),
        }
    }

    fn window() -> ReportWindow {
        ReportWindow {
            start: date(1),
            end: date(31),
        }
    }

    #[test]
    fn empty_scope_degrades_to_zeros() {
        let snapshot = Snapshot::default();
        let stats = dashboard_stats(&snapshot, &window(), &ReportConfig::default());

        assert_eq!(stats.total_fields, 0);
        assert_eq!(stats.total_observations, 0);
        assert_eq!(stats.observations_in_period, 0);
        assert_eq!(stats.unique_crop_varieties, 0);
        assert!(stats.growth_stages.is_empty());
        assert!(stats.observations_over_time.is_empty());
        assert!(stats.crop_varieties.is_empty());
        assert_eq!(stats.fertilizer_usage.ratio, 0.0);
        assert_eq!(stats.pesticide_usage.ratio, 0.0);
        assert_eq!(stats.avg_measurements.avg_height, None);
        assert_eq!(stats.avg_measurements.avg_moisture, None);
        assert_eq!(stats.fertilizer_performance, FertilizerStats::default());
    }

    #[test]
    fn histogram_sorts_count_desc_then_label_asc() {
        let snapshot = Snapshot {
            fields: vec![field("F-001")],
            observations: vec![
                obs(1, 2, "maize", "Vegetative"),
                obs(2, 3, "maize", "Flowering"),
                obs(3, 4, "maize", "Vegetative"),
                obs(4, 5, "maize", "Emergence"),
            ],
        };
        let stats = dashboard_stats(&snapshot, &window(), &ReportConfig::default());

        let labels: Vec<&str> = stats
            .growth_stages
            .iter()
            .map(|s| s.growth_stage.as_str())
            .collect();
        // Vegetative has 2; Emergence and Flowering tie at 1, label order
        assert_eq!(labels, vec!["Vegetative", "Emergence", "Flowering"]);
    }

    #[test]
    fn histogram_order_survives_shuffled_input() {
        let mut observations = vec![
            obs(1, 2, "maize", "Vegetative"),
            obs(2, 3, "maize", "Flowering"),
            obs(3, 4, "maize", "Vegetative"),
            obs(4, 5, "maize", "Emergence"),
        ];
        observations.reverse();
        let snapshot = Snapshot {
            fields: vec![field("F-001")],
            observations,
        };
        let stats = dashboard_stats(&snapshot, &window(), &ReportConfig::default());
        let labels: Vec<&str> = stats
            .growth_stages
            .iter()
            .map(|s| s.growth_stage.as_str())
            .collect();
        assert_eq!(labels, vec!["Vegetative", "Emergence", "Flowering"]);
    }

    #[test]
    fn variety_ties_resolve_to_first_seen() {
        let snapshot = Snapshot {
            fields: vec![field("F-001")],
            observations: vec![
                obs(1, 2, "sorghum", "Vegetative"),
                obs(2, 3, "maize", "Vegetative"),
            ],
        };
        let stats = dashboard_stats(&snapshot, &window(), &ReportConfig::default());
        let names: Vec<&str> = stats
            .crop_varieties
            .iter()
            .map(|v| v.crop_variety.as_str())
            .collect();
        assert_eq!(names, vec!["sorghum", "maize"]);
    }

    #[test]
    fn window_bounds_are_inclusive_and_counts_split() {
        let mut outside = obs(9, 1, "maize", "Emergence");
        outside.observation_date = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        let snapshot = Snapshot {
            fields: vec![field("F-001")],
            observations: vec![outside, obs(1, 1, "maize", "Emergence"), obs(2, 31, "maize", "Emergence")],
        };
        let stats = dashboard_stats(&snapshot, &window(), &ReportConfig::default());
        assert_eq!(stats.total_observations, 3);
        assert_eq!(stats.observations_in_period, 2);
        assert!(stats.observations_in_period <= stats.total_observations);
    }

    #[test]
    fn usage_ratios_count_only_explicit_yes() {
        let mut yes = obs(1, 2, "maize", "Vegetative");
        yes.management.fertilizer_applied = Some(true);
        yes.management.sprayed = Some(true);
        let mut no = obs(2, 3, "maize", "Vegetative");
        no.management.fertilizer_applied = Some(false);
        let unknown = obs(3, 4, "maize", "Vegetative");

        let snapshot = Snapshot {
            fields: vec![field("F-001")],
            observations: vec![yes, no, unknown],
        };
        let stats = dashboard_stats(&snapshot, &window(), &ReportConfig::default());
        assert_eq!(stats.fertilizer_usage.applied, 1);
        assert_eq!(stats.fertilizer_usage.total, 3);
        assert_eq!(stats.pesticide_usage.applied, 1);
    }

    #[test]
    fn fertilizer_performance_sides_default_independently() {
        let mut fertilized = obs(1, 2, "maize", "Vegetative");
        fertilized.management.fertilizer_applied = Some(true);
        fertilized.measurement.crop_height_cm = Some(120.0);

        let snapshot = Snapshot {
            fields: vec![field("F-001")],
            observations: vec![fertilized],
        };
        let stats = dashboard_stats(&snapshot, &window(), &ReportConfig::default());
        assert_eq!(stats.fertilizer_performance.fertilized, 120.0);
        assert_eq!(stats.fertilizer_performance.unfertilized, 0.0);
    }

    #[test]
    fn averages_skip_unrecorded_metrics() {
        let mut a = obs(1, 2, "maize", "Vegetative");
        a.measurement.crop_height_cm = Some(100.0);
        a.measurement.soil_moisture = Some(40.0);
        let mut b = obs(2, 3, "maize", "Vegetative");
        b.measurement.crop_height_cm = Some(140.0);

        let snapshot = Snapshot {
            fields: vec![field("F-001")],
            observations: vec![a, b],
        };
        let stats = dashboard_stats(&snapshot, &window(), &ReportConfig::default());
        assert_eq!(stats.avg_measurements.avg_height, Some(120.0));
        assert_eq!(stats.avg_measurements.avg_moisture, Some(40.0));
        assert_eq!(stats.avg_measurements.avg_diameter, None);
    }
}
