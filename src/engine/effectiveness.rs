//! Intervention effectiveness: did spraying help?
//!
//! Each sprayed observation in the window is paired with the same field's
//! next chronological observation — the follow-up visit — and the pest state
//! on both sides is compared. The successor search runs over the caller's
//! full scope, not just the window, so a spray near the window's edge still
//! finds its follow-up.
//!
//! Sprayed observations with no later visit contribute nothing; an
//! unobserved outcome is not a failed treatment.

use std::collections::HashMap;

use tracing::debug;

use crate::scope::ReportWindow;
use crate::types::{
    EffectivenessReport, IneffectiveTreatment, Observation, PestSeverity, TreatmentComparison,
    TreatmentSnapshot,
};

/// Analyze spray outcomes across the scope for the window.
pub fn analyze(observations: &[Observation], window: &ReportWindow) -> EffectivenessReport {
    // Per-field timeline, ordered by (date, id) so the successor lookup is
    // "first entry strictly after this date".
    let mut by_field: HashMap<&str, Vec<&Observation>> = HashMap::new();
    for obs in observations {
        by_field.entry(obs.field_id.as_str()).or_default().push(obs);
    }
    for timeline in by_field.values_mut() {
        timeline.sort_by_key(|o| (o.observation_date, o.id));
    }

    // Sprayed observations in a fixed order keeps the ineffective list
    // deterministic regardless of snapshot order.
    let mut sprayed: Vec<&Observation> = observations
        .iter()
        .filter(|o| window.contains(o.observation_date) && o.management.sprayed == Some(true))
        .collect();
    sprayed.sort_by_key(|o| (o.observation_date, o.id));

    let mut report = EffectivenessReport::default();
    let mut before = TreatmentSnapshot::default();
    let mut after = TreatmentSnapshot::default();

    for obs in &sprayed {
        // Smallest strictly-later date; ties resolve to the lowest id.
        // Every observation carries management data (the records are created
        // together), so the first successor is the one we compare against.
        let next = by_field
            .get(obs.field_id.as_str())
            .and_then(|timeline| {
                timeline
                    .iter()
                    .find(|o| o.observation_date > obs.observation_date)
            })
            .copied();

        let Some(next) = next else { continue };

        let before_severity = obs.management.severity_ordinal();
        let after_severity = next.management.severity_ordinal();
        let before_area = obs.management.affected_area_or_zero();
        let after_area = next.management.affected_area_or_zero();

        before.avg_severity += f64::from(before_severity);
        before.avg_area += before_area;
        after.avg_severity += f64::from(after_severity);
        after.avg_area += after_area;

        report.total_checks += 1;
        if after_severity < before_severity {
            report.reduced_severity += 1;
        }
        if after_area < before_area {
            report.reduced_area += 1;
        }

        // Severity still High on the follow-up visit: the treatment did not
        // bring the infestation down.
        if obs.management.pest_severity == Some(PestSeverity::High)
            && next.management.pest_severity == Some(PestSeverity::High)
        {
            report.ineffective_alerts.push(IneffectiveTreatment {
                field_id: obs.field_id.clone(),
                pesticide: obs.management.pesticide_used.clone(),
                date: next.observation_date,
            });
        }
    }

    if report.total_checks > 0 {
        let n = report.total_checks as f64;
        before.avg_severity /= n;
        before.avg_area /= n;
        after.avg_severity /= n;
        after.avg_area /= n;
        report.severity_reduction_rate = report.reduced_severity as f64 / n * 100.0;
        report.area_reduction_rate = report.reduced_area as f64 / n * 100.0;
    }

    report.comparison = TreatmentComparison {
        before,
        after,
        count: report.total_checks,
    };

    debug!(
        sprayed = sprayed.len(),
        checks = report.total_checks,
        ineffective = report.ineffective_alerts.len(),
        "analyzed intervention effectiveness"
    );

    report
}
