/// Domain models for space weather and satellite passes
use crate::errors::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Qualitative impact rating, ordered from harmless to severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Minor,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Minor => "minor",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }

    pub fn capitalized(self) -> &'static str {
        match self {
            RiskLevel::None => "None",
            RiskLevel::Minor => "Minor",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }

    /// Moderate or high.
    pub fn is_elevated(self) -> bool {
        self >= RiskLevel::Moderate
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far from the poles the aurora can be seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuroraVisibility {
    Unlikely,
    VisiblePolarRegions,
    VisibleHighLatitudes,
    VisibleMidLatitudes,
}

impl AuroraVisibility {
    pub fn as_str(self) -> &'static str {
        match self {
            AuroraVisibility::Unlikely => "unlikely",
            AuroraVisibility::VisiblePolarRegions => "visible_polar_regions",
            AuroraVisibility::VisibleHighLatitudes => "visible_high_latitudes",
            AuroraVisibility::VisibleMidLatitudes => "visible_mid_latitudes",
        }
    }
}

impl fmt::Display for AuroraVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert severity levels
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Moderate,
    High,
    Severe,
}

/// X-ray brightness class of a solar flare. Each class is ten times the previous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlareClass {
    C,
    M,
    X,
}

impl FlareClass {
    pub fn letter(self) -> char {
        match self {
            FlareClass::C => 'C',
            FlareClass::M => 'M',
            FlareClass::X => 'X',
        }
    }

    /// M and X flares are the ones that disturb HF radio.
    pub fn is_strong(self) -> bool {
        matches!(self, FlareClass::M | FlareClass::X)
    }

    /// Split a designation such as `"M5.2"` into class and scale.
    ///
    /// Returns `None` for classes below C (A, B) and for anything unparseable.
    pub fn parse_designation(designation: &str) -> Option<(FlareClass, f64)> {
        let designation = designation.trim();
        let mut chars = designation.chars();
        let class = match chars.next()?.to_ascii_uppercase() {
            'C' => FlareClass::C,
            'M' => FlareClass::M,
            'X' => FlareClass::X,
            _ => return None,
        };
        let scale = chars.as_str().parse::<f64>().ok()?;
        Some((class, scale))
    }
}

impl fmt::Display for FlareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Satellite orbit classifications
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitType {
    Leo,
    Meo,
    Geo,
    Heo,
}

/// Planetary Kp reading, clamped to the 0-9 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeomagneticSample {
    value: f64,
    timestamp: DateTime<Utc>,
}

impl GeomagneticSample {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 9.0;
    /// Quiet-to-unsettled reading assumed while the Kp feed is down.
    pub const FALLBACK: f64 = 3.0;

    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteKp(value));
        }
        Ok(Self {
            value: value.clamp(Self::MIN, Self::MAX),
            timestamp,
        })
    }

    pub fn fallback(timestamp: DateTime<Utc>) -> Self {
        Self {
            value: Self::FALLBACK,
            timestamp,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Solar flare event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlareEvent {
    timestamp: DateTime<Utc>,
    #[serde(rename = "class_type")]
    class: FlareClass,
    scale: f64,
    region: Option<String>,
}

impl FlareEvent {
    pub fn new(class: FlareClass, scale: f64, timestamp: DateTime<Utc>) -> Result<Self, ValidationError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ValidationError::FlareScale(scale));
        }
        Ok(Self {
            timestamp,
            class,
            scale,
            region: None,
        })
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn class(&self) -> FlareClass {
        self.class
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

/// Coronal Mass Ejection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmeEvent {
    timestamp: DateTime<Utc>,
    speed_kms: f64,
    earth_directed: bool,
    estimated_arrival: Option<DateTime<Utc>>,
    impact_probability: Option<f64>,
}

impl CmeEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        speed_kms: f64,
        earth_directed: bool,
    ) -> Result<Self, ValidationError> {
        if !(speed_kms.is_finite() && speed_kms > 0.0) {
            return Err(ValidationError::CmeSpeed(speed_kms));
        }
        Ok(Self {
            timestamp,
            speed_kms,
            earth_directed,
            estimated_arrival: None,
            impact_probability: None,
        })
    }

    pub fn with_estimated_arrival(mut self, arrival: DateTime<Utc>) -> Self {
        self.estimated_arrival = Some(arrival);
        self
    }

    pub fn with_impact_probability(mut self, probability: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ValidationError::ImpactProbability(probability));
        }
        self.impact_probability = Some(probability);
        Ok(self)
    }

    #[allow(dead_code)]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn speed_kms(&self) -> f64 {
        self.speed_kms
    }

    pub fn earth_directed(&self) -> bool {
        self.earth_directed
    }

    pub fn estimated_arrival(&self) -> Option<DateTime<Utc>> {
        self.estimated_arrival
    }

    pub fn impact_probability(&self) -> Option<f64> {
        self.impact_probability
    }
}

/// Current space weather status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherStatus {
    pub timestamp: DateTime<Utc>,
    pub kp_current: f64,
    pub kp_forecast_3h: Option<f64>,
    pub recent_flares: Vec<FlareEvent>,
    pub active_cmes: Vec<CmeEvent>,
    pub gps_degradation_risk: RiskLevel,
    pub hf_radio_risk: RiskLevel,
    pub satellite_risk: RiskLevel,
    pub aurora_visibility: AuroraVisibility,
    pub summary: String,
}

/// Impact explanation for the current space weather
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactExplanation {
    pub what_happened: String,
    pub potential_impacts: Vec<String>,
    pub who_should_care: Vec<String>,
    pub actionable_guidance: String,
    pub severity: Severity,
}

/// Observer location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above sea level
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub name: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Result<Self, ValidationError> {
        ValidationError::check_range("latitude", latitude, -90.0, 90.0)?;
        ValidationError::check_range("longitude", longitude, -180.0, 180.0)?;
        ValidationError::check_range("altitude", altitude, 0.0, f64::MAX)?;
        Ok(Self {
            latitude,
            longitude,
            altitude,
            name: None,
        })
    }
}

/// Raw geometry of one satellite transit as reported by the pass provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassGeometry {
    pub start_time: DateTime<Utc>,
    pub max_elevation_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Degrees above the horizon
    pub max_elevation: f64,
    pub start_azimuth: f64,
    pub max_azimuth: f64,
    pub end_azimuth: f64,
    pub duration_seconds: u32,
    /// Visual magnitude, lower is brighter
    #[serde(default)]
    pub magnitude: Option<f64>,
}

impl PassGeometry {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time <= self.start_time {
            return Err(ValidationError::PassWindow);
        }
        if self.max_elevation_time < self.start_time || self.max_elevation_time > self.end_time {
            return Err(ValidationError::PassPeak);
        }
        if self.duration_seconds == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        ValidationError::check_range("max_elevation", self.max_elevation, 0.0, 90.0)?;
        ValidationError::check_range("start_azimuth", self.start_azimuth, 0.0, 360.0)?;
        ValidationError::check_range("max_azimuth", self.max_azimuth, 0.0, 360.0)?;
        ValidationError::check_range("end_azimuth", self.end_azimuth, 0.0, 360.0)?;
        if matches!(self.magnitude, Some(m) if !m.is_finite()) {
            return Err(ValidationError::NonFiniteMagnitude);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassVerdict {
    pub worth_watching: bool,
    pub commentary: String,
}

/// Satellite pass prediction with its verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatellitePass {
    pub satellite_name: String,
    pub satellite_id: u32,
    #[serde(flatten)]
    pub geometry: PassGeometry,
    #[serde(flatten)]
    pub verdict: PassVerdict,
}

/// Detailed satellite information
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatelliteProfile {
    pub satellite_id: u32,
    pub name: String,
    pub norad_id: String,
    pub purpose: String,
    pub orbit_type: OrbitType,
    pub altitude_km: f64,
    pub speed_kmh: f64,
    pub country: Option<String>,
    pub why_care: String,
    pub recent_changes: Option<String>,
}

/// Entry in the activity feed
#[derive(Debug, Clone, Serialize)]
pub struct SpaceEvent {
    pub event_id: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub severity: Option<Severity>,
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityFeed {
    pub period: String,
    pub events: Vec<SpaceEvent>,
    pub summary: String,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub environment: String,
    pub demo_mode: bool,
}
