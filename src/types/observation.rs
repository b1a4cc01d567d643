//! Field observation records: FieldRecord, Observation, CropManagement, CropMeasurement
//!
//! These are read-only snapshots of records owned by the external observation
//! repository. Every `Observation` carries exactly one `CropManagement` and one
//! `CropMeasurement`; a sub-record the collector never filled in arrives as
//! `Default` (all fields unset), never as a dangling reference.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::{PestSeverity, SoilMoistureLevel, Vigor, WeedPressure};

/// Soil moisture percentage below which soil is classified "Dry"
pub const MOISTURE_DRY_BELOW: f64 = 30.0;
/// Soil moisture percentage above which soil is classified "Wet"
pub const MOISTURE_WET_ABOVE: f64 = 70.0;

// ============================================================================
// Field
// ============================================================================

/// A registered field, referenced by observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRecord {
    /// Unique field identifier (e.g. "F-012")
    pub field_id: String,
    /// Human-readable field name
    #[serde(default)]
    pub name: String,
    /// Field centroid latitude
    #[serde(default)]
    pub latitude: f64,
    /// Field centroid longitude
    #[serde(default)]
    pub longitude: f64,
    /// Optional boundary polygon as (lat, lon) vertices
    #[serde(default)]
    pub boundary: Option<Vec<(f64, f64)>>,
    /// Collector who registered the field
    #[serde(default)]
    pub collector: String,
}

// ============================================================================
// Observation
// ============================================================================

/// One field visit: a dated record with its management and measurement data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Unique record identifier, used for deterministic tie-breaks
    pub id: u64,
    /// Field this observation belongs to
    pub field_id: String,
    /// Collector who recorded the observation
    #[serde(default)]
    pub collector: String,
    /// Calendar date of the visit (never in the future — enforced upstream)
    pub observation_date: NaiveDate,
    /// Crop variety planted in the field
    #[serde(default)]
    pub crop_variety: String,
    /// Planting date (<= observation_date — enforced upstream)
    #[serde(default)]
    pub planting_date: Option<NaiveDate>,
    /// Growth stage label at the time of the visit
    #[serde(default)]
    pub growth_stage: String,
    /// Collector flagged this record for urgent follow-up
    #[serde(default)]
    pub urgent_attention: bool,
    /// Record has been synced from the mobile client
    #[serde(default)]
    pub synced: bool,
    /// Management actions recorded during the visit
    #[serde(default)]
    pub management: CropManagement,
    /// Measurements taken during the visit
    #[serde(default)]
    pub measurement: CropMeasurement,
}

// ============================================================================
// Crop Management
// ============================================================================

/// Management actions and pest status for one observation.
///
/// Yes/no questions the collector may leave unanswered are tri-state
/// `Option<bool>`: `Some(true)` / `Some(false)` / `None` (not recorded).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropManagement {
    /// Pesticide sprayed since the last visit
    #[serde(default)]
    pub sprayed: Option<bool>,
    /// Pesticide product name, when sprayed
    #[serde(default)]
    pub pesticide_used: Option<String>,
    /// Fertilizer applied since the last visit
    #[serde(default)]
    pub fertilizer_applied: Option<bool>,
    /// Fertilizer product type, when applied
    #[serde(default)]
    pub fertilizer_type: Option<String>,
    /// Fertilizer amount (kg/ha), when applied
    #[serde(default)]
    pub fertilizer_amount: Option<f64>,
    /// Date fertilizer was applied
    #[serde(default)]
    pub fertilizer_date: Option<NaiveDate>,
    /// Irrigation applied since the last visit
    #[serde(default)]
    pub irrigation_applied: Option<bool>,
    /// Pests observed in the field
    #[serde(default)]
    pub pest_present: Option<bool>,
    /// Pest species/type label, when present
    #[serde(default)]
    pub pest_type: Option<String>,
    /// Observed pest severity
    #[serde(default, deserialize_with = "de_pest_severity")]
    pub pest_severity: Option<PestSeverity>,
    /// Percentage of the field area affected by pests (0-100)
    #[serde(default)]
    pub pest_percentage_affected: Option<f64>,
    /// Weather note for the visit
    #[serde(default)]
    pub weather: Option<String>,
    /// Watering note for the visit
    #[serde(default)]
    pub watering: Option<String>,
}

impl CropManagement {
    /// Pest severity as an ordinal rank; absent severity counts as 0 (none).
    pub fn severity_ordinal(&self) -> u8 {
        self.pest_severity.map_or(0, PestSeverity::ordinal)
    }

    /// Affected area percentage, defaulting to 0 when not recorded.
    pub fn affected_area_or_zero(&self) -> f64 {
        self.pest_percentage_affected.unwrap_or(0.0)
    }
}

// ============================================================================
// Crop Measurement
// ============================================================================

/// Physical measurements for one observation.
///
/// Every metric is optional: collectors record what they can measure on the
/// day, and averages skip metrics that were not taken.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropMeasurement {
    /// Crop height (cm, >= 0)
    #[serde(default)]
    pub crop_height_cm: Option<f64>,
    /// Stalk diameter (mm, >= 0)
    #[serde(default)]
    pub stalk_diameter: Option<f64>,
    /// Leaves per plant (>= 0)
    #[serde(default)]
    pub number_of_leaves: Option<f64>,
    /// Plants per unit area (>= 0)
    #[serde(default)]
    pub plant_population: Option<f64>,
    /// Soil moisture reading (0-100)
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    /// Collector-assessed moisture level; derivable from `soil_moisture`
    #[serde(default, deserialize_with = "de_moisture_level")]
    pub soil_moisture_level: Option<SoilMoistureLevel>,
    /// Collector-assessed plant vigor
    #[serde(default, deserialize_with = "de_vigor")]
    pub vigor: Option<Vigor>,
    /// Canopy cover percentage (0-100)
    #[serde(default)]
    pub canopy_cover_percentage: Option<f64>,
    /// Collector-assessed weed pressure
    #[serde(default, deserialize_with = "de_weed_pressure")]
    pub weed_pressure: Option<WeedPressure>,
}

// Forgiving label deserialization: collectors' apps have shipped free-form
// labels over the years, and an unrecognized one reads as "not assessed",
// never as a rejected snapshot.

fn de_pest_severity<'de, D: Deserializer<'de>>(d: D) -> Result<Option<PestSeverity>, D::Error> {
    let label: Option<String> = Option::deserialize(d)?;
    Ok(label.as_deref().and_then(PestSeverity::from_label))
}

fn de_vigor<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vigor>, D::Error> {
    let label: Option<String> = Option::deserialize(d)?;
    Ok(label.as_deref().and_then(Vigor::from_label))
}

fn de_moisture_level<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<SoilMoistureLevel>, D::Error> {
    let label: Option<String> = Option::deserialize(d)?;
    Ok(label.as_deref().and_then(SoilMoistureLevel::from_label))
}

fn de_weed_pressure<'de, D: Deserializer<'de>>(d: D) -> Result<Option<WeedPressure>, D::Error> {
    let label: Option<String> = Option::deserialize(d)?;
    Ok(label.as_deref().and_then(WeedPressure::from_label))
}

impl CropMeasurement {
    /// Moisture level with fallback derivation from the numeric reading.
    ///
    /// The explicit collector assessment wins; otherwise the reading is
    /// bucketed at 30/70 (< 30 Dry, 30-70 Moist, > 70 Wet). `None` when
    /// neither was recorded.
    pub fn resolved_moisture_level(&self) -> Option<SoilMoistureLevel> {
        if self.soil_moisture_level.is_some() {
            return self.soil_moisture_level;
        }
        self.soil_moisture.map(|pct| {
            if pct < MOISTURE_DRY_BELOW {
                SoilMoistureLevel::Dry
            } else if pct <= MOISTURE_WET_ABOVE {
                SoilMoistureLevel::Moist
            } else {
                SoilMoistureLevel::Wet
            }
        })
    }
}
