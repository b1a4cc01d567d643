//! Observation scope and report windows
//!
//! Authorization happens upstream: the caller resolves who may see what and
//! hands the engine an already-filtered snapshot behind the
//! [`ObservationScope`] trait. The engine never inspects caller identity and
//! never reaches back to a repository mid-computation.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{FieldRecord, Observation};

// ============================================================================
// Scope
// ============================================================================

/// An access-scoped, read-only view of observations and fields.
///
/// Implementations must return stable slices for the duration of one report
/// computation; the engine treats the contents as an immutable snapshot.
pub trait ObservationScope {
    /// All observations visible to the caller, any date.
    fn observations(&self) -> &[Observation];

    /// All fields visible to the caller.
    fn fields(&self) -> &[FieldRecord];
}

/// Owned in-memory scope, also the serde shape of snapshot files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    #[serde(default)]
    pub observations: Vec<Observation>,
}

impl ObservationScope for Snapshot {
    fn observations(&self) -> &[Observation] {
        &self.observations
    }

    fn fields(&self) -> &[FieldRecord] {
        &self.fields
    }
}

// ============================================================================
// Report Window
// ============================================================================

/// Inclusive calendar-date range bounding time-series and rate computations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    /// Window covering the `days` days up to and including `end`.
    ///
    /// `days = 0` means "end date only". The end date comes from the caller's
    /// clock so the engine itself stays deterministic.
    pub fn trailing(end: NaiveDate, days: i64) -> Result<Self, EngineError> {
        if days < 0 {
            return Err(EngineError::InvalidWindow { days });
        }
        let start = end
            .checked_sub_days(Days::new(days as u64))
            .unwrap_or(NaiveDate::MIN);
        Ok(Self { start, end })
    }

    /// Whether `date` falls inside the window (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Observations within `window`, in snapshot order.
pub fn observations_in_window<'a>(
    observations: &'a [Observation],
    window: &ReportWindow,
) -> Vec<&'a Observation> {
    observations
        .iter()
        .filter(|o| window.contains(o.observation_date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn trailing_window_is_inclusive() {
        let w = ReportWindow::trailing(date(2024, 3, 31), 30).unwrap();
        assert_eq!(w.start, date(2024, 3, 1));
        assert!(w.contains(date(2024, 3, 1)));
        assert!(w.contains(date(2024, 3, 31)));
        assert!(!w.contains(date(2024, 2, 29)));
        assert!(!w.contains(date(2024, 4, 1)));
    }

    #[test]
    fn zero_day_window_is_single_day() {
        let w = ReportWindow::trailing(date(2024, 6, 1), 0).unwrap();
        assert_eq!(w.start, w.end);
        assert!(w.contains(date(2024, 6, 1)));
        assert!(!w.contains(date(2024, 5, 31)));
    }

    #[test]
    fn negative_days_is_an_input_error() {
        let err = ReportWindow::trailing(date(2024, 6, 1), -1).unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { days: -1 }));
    }
}
