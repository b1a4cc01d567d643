//! Composite per-field health score
//!
//! Deterministic, rule-based scoring from the most recent measurement in the
//! lookback window. Each component reads the shared scoring tables, so the
//! health score and the effectiveness analyzer can never disagree about what
//! "High" means.
//!
//! Components and default weights:
//! - 40% vigor
//! - 30% pest status (full score when no pests are present)
//! - 20% soil moisture (resolved level; too wet costs less than too dry)
//! - 10% weed pressure
//!
//! A field with no in-window measurement scores the neutral 50 — no data is
//! not an error, and it is not health either.

use crate::config::HealthConfig;
use crate::scope::ReportWindow;
use crate::types::{
    moisture_health_score, pest_health_score, vigor_health_score, weed_health_score, FieldHealth,
    HealthStatus, Observation,
};

/// Score one field from its observations (any dates; the window is applied
/// here). Missing sub-data degrades to the neutral table entries.
pub fn field_health(
    field_id: &str,
    observations: &[&Observation],
    window: &ReportWindow,
    cfg: &HealthConfig,
) -> FieldHealth {
    // Most recent in-window observation; same-date ties go to the highest id
    // (latest-created record wins).
    let latest = observations
        .iter()
        .filter(|o| window.contains(o.observation_date))
        .max_by_key(|o| (o.observation_date, o.id));

    let score = match latest {
        Some(obs) => composite_score(obs, cfg),
        None => cfg.neutral_score,
    };

    FieldHealth {
        field_id: field_id.to_string(),
        score,
        status: status_from_score(score, cfg),
    }
}

/// Weighted composite of the four component scores, clamped to [0, 100].
pub fn composite_score(obs: &Observation, cfg: &HealthConfig) -> f64 {
    let vigor = vigor_health_score(obs.measurement.vigor);
    let pest = pest_health_score(
        obs.management.pest_present,
        obs.management.pest_severity,
    );
    let moisture = moisture_health_score(obs.measurement.resolved_moisture_level());
    let weed = weed_health_score(obs.measurement.weed_pressure);

    let score = vigor * cfg.vigor_weight
        + pest * cfg.pest_weight
        + moisture * cfg.moisture_weight
        + weed * cfg.weed_weight;

    score.clamp(0.0, 100.0)
}

/// Status bucket for a score: above `healthy_above` is Healthy, above
/// `warning_above` is Warning, everything else Critical.
pub fn status_from_score(score: f64, cfg: &HealthConfig) -> HealthStatus {
    if score > cfg.healthy_above {
        HealthStatus::Healthy
    } else if score > cfg.warning_above {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    }
}
