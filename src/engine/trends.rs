//! Moisture and growth time series
//!
//! Observations bucketed by calendar date. Buckets only exist for dates that
//! have qualifying records; a quiet day is omitted, never emitted with a zero
//! count. BTreeMap accumulation keeps the output ascending by date without a
//! separate sort.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::aggregator;
use crate::scope::{ObservationScope, ReportWindow};
use crate::types::{GrowthAnalysis, GrowthPoint, MoisturePoint, Observation};

/// Soil moisture trend over the window, optionally for a single field.
///
/// Only observations with a numeric moisture reading participate.
pub fn moisture_trends(
    scope: &dyn ObservationScope,
    window: &ReportWindow,
    field_id: Option<&str>,
) -> Vec<MoisturePoint> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for obs in scope.observations() {
        if !window.contains(obs.observation_date) {
            continue;
        }
        if field_id.is_some_and(|id| obs.field_id != id) {
            continue;
        }
        if let Some(moisture) = obs.measurement.soil_moisture {
            let bucket = buckets.entry(obs.observation_date).or_insert((0.0, 0));
            bucket.0 += moisture;
            bucket.1 += 1;
        }
    }

    debug!(buckets = buckets.len(), field = ?field_id, "computed moisture trend");

    buckets
        .into_iter()
        .map(|(date, (sum, count))| MoisturePoint {
            date,
            avg_moisture: sum / count as f64,
            count,
        })
        .collect()
}

/// Per-metric running sum that ignores unrecorded values.
#[derive(Default)]
struct MetricAcc {
    sum: f64,
    n: usize,
}

impl MetricAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.n += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

#[derive(Default)]
struct GrowthAcc {
    height: MetricAcc,
    diameter: MetricAcc,
    leaves: MetricAcc,
    population: MetricAcc,
    count: usize,
}

/// Growth trend over all observations matching the variety/field filters,
/// plus the fertilizer comparison restricted to the same selection.
///
/// Unlike the windowed reports this looks at the full history, so a season's
/// growth curve is visible end to end.
pub fn growth_analysis(
    scope: &dyn ObservationScope,
    crop_variety: Option<&str>,
    field_id: Option<&str>,
) -> GrowthAnalysis {
    let selection: Vec<&Observation> = scope
        .observations()
        .iter()
        .filter(|o| crop_variety.is_none_or(|v| o.crop_variety == v))
        .filter(|o| field_id.is_none_or(|id| o.field_id == id))
        .collect();

    let mut buckets: BTreeMap<NaiveDate, GrowthAcc> = BTreeMap::new();
    for obs in &selection {
        let acc = buckets.entry(obs.observation_date).or_default();
        acc.height.push(obs.measurement.crop_height_cm);
        acc.diameter.push(obs.measurement.stalk_diameter);
        acc.leaves.push(obs.measurement.number_of_leaves);
        acc.population.push(obs.measurement.plant_population);
        acc.count += 1;
    }

    debug!(
        selection = selection.len(),
        buckets = buckets.len(),
        variety = ?crop_variety,
        field = ?field_id,
        "computed growth analysis"
    );

    GrowthAnalysis {
        trends: buckets
            .into_iter()
            .map(|(date, acc)| GrowthPoint {
                date,
                avg_height: acc.height.mean(),
                avg_diameter: acc.diameter.mean(),
                avg_leaves: acc.leaves.mean(),
                avg_population: acc.population.mean(),
                count: acc.count,
            })
            .collect(),
        fertilizer_stats: aggregator::fertilizer_performance(&selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Snapshot;
    use crate::types::{CropManagement, CropMeasurement};
    use approx::assert_relative_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn obs(id: u64, day: u32, field: &str, variety: &str) -> Observation {
        Observation {
            id,
            field_id: field.to_string(),
            collector: String::new(),
            observation_date: date(day),
            crop_variety: variety.to_string(),
            planting_date: None,
            growth_stage: String::new(),
            urgent_attention: false,
            synced: true,
            management: CropManagement::default(),
            measurement: CropMeasurement::default(),
        }
    }

    fn window() -> ReportWindow {
        ReportWindow {
            start: date(1),
            end: date(31),
        }
    }

    #[test]
    fn same_day_readings_average_into_one_bucket() {
        let mut a = obs(1, 10, "F-001", "maize");
        a.measurement.soil_moisture = Some(20.0);
        let mut b = obs(2, 10, "F-001", "maize");
        b.measurement.soil_moisture = Some(40.0);

        let snapshot = Snapshot {
            fields: vec![],
            observations: vec![a, b],
        };
        let trend = moisture_trends(&snapshot, &window(), None);

        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].date, date(10));
        assert_relative_eq!(trend[0].avg_moisture, 30.0);
        assert_eq!(trend[0].count, 2);
    }

    #[test]
    fn observations_without_readings_are_excluded() {
        let mut a = obs(1, 10, "F-001", "maize");
        a.measurement.soil_moisture = Some(55.0);
        let b = obs(2, 11, "F-001", "maize"); // no reading: no bucket for day 11

        let snapshot = Snapshot {
            fields: vec![],
            observations: vec![a, b],
        };
        let trend = moisture_trends(&snapshot, &window(), None);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].date, date(10));
    }

    #[test]
    fn field_filter_restricts_trend() {
        let mut a = obs(1, 10, "F-001", "maize");
        a.measurement.soil_moisture = Some(20.0);
        let mut b = obs(2, 10, "F-002", "maize");
        b.measurement.soil_moisture = Some(80.0);

        let snapshot = Snapshot {
            fields: vec![],
            observations: vec![a, b],
        };
        let trend = moisture_trends(&snapshot, &window(), Some("F-002"));
        assert_eq!(trend.len(), 1);
        assert_relative_eq!(trend[0].avg_moisture, 80.0);
    }

    #[test]
    fn buckets_ascend_by_date() {
        let mut late = obs(1, 20, "F-001", "maize");
        late.measurement.soil_moisture = Some(10.0);
        let mut early = obs(2, 5, "F-001", "maize");
        early.measurement.soil_moisture = Some(60.0);

        let snapshot = Snapshot {
            fields: vec![],
            observations: vec![late, early],
        };
        let trend = moisture_trends(&snapshot, &window(), None);
        assert_eq!(trend[0].date, date(5));
        assert_eq!(trend[1].date, date(20));
    }

    #[test]
    fn growth_buckets_average_present_metrics_only() {
        let mut a = obs(1, 10, "F-001", "maize");
        a.measurement.crop_height_cm = Some(100.0);
        a.measurement.number_of_leaves = Some(8.0);
        let mut b = obs(2, 10, "F-001", "maize");
        b.measurement.crop_height_cm = Some(120.0);

        let snapshot = Snapshot {
            fields: vec![],
            observations: vec![a, b],
        };
        let analysis = growth_analysis(&snapshot, None, None);

        assert_eq!(analysis.trends.len(), 1);
        let point = &analysis.trends[0];
        assert_eq!(point.avg_height, Some(110.0));
        assert_eq!(point.avg_leaves, Some(8.0));
        assert_eq!(point.avg_diameter, None);
        assert_eq!(point.count, 2);
    }

    #[test]
    fn variety_filter_scopes_fertilizer_stats_too() {
        let mut fertilized_maize = obs(1, 10, "F-001", "maize");
        fertilized_maize.management.fertilizer_applied = Some(true);
        fertilized_maize.measurement.crop_height_cm = Some(150.0);
        let mut fertilized_beans = obs(2, 10, "F-001", "beans");
        fertilized_beans.management.fertilizer_applied = Some(true);
        fertilized_beans.measurement.crop_height_cm = Some(60.0);

        let snapshot = Snapshot {
            fields: vec![],
            observations: vec![fertilized_maize, fertilized_beans],
        };
        let analysis = growth_analysis(&snapshot, Some("maize"), None);
        assert_relative_eq!(analysis.fertilizer_stats.fertilized, 150.0);
        assert_relative_eq!(analysis.fertilizer_stats.unfertilized, 0.0);
    }
}
