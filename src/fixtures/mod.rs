//! Canned data served in demo mode.
//!
//! The demo weather status is returned verbatim rather than run through the
//! assessor, so its ratings are fixed even where the assessor would disagree.

use crate::domain::{
    AuroraVisibility, FlareClass, FlareEvent, PassGeometry, RiskLevel, SatellitePass, WeatherStatus,
};
use crate::passes::evaluate_pass;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::warn;

pub const DEMO_SUMMARY: &str = "Status: Active geomagnetic conditions (Kp 5.0). \
                                Minor GPS degradation possible; most users unaffected.";

pub fn demo_weather_status(now: DateTime<Utc>) -> WeatherStatus {
    let flares = FlareEvent::new(FlareClass::M, 5.2, now - Duration::hours(3))
        .map(|f| vec![f.with_region("AR3590")])
        .unwrap_or_default();

    WeatherStatus {
        timestamp: now,
        kp_current: 5.0,
        kp_forecast_3h: Some(5.3),
        recent_flares: flares,
        active_cmes: Vec::new(),
        gps_degradation_risk: RiskLevel::Minor,
        hf_radio_risk: RiskLevel::Moderate,
        satellite_risk: RiskLevel::Minor,
        aurora_visibility: AuroraVisibility::VisibleHighLatitudes,
        summary: DEMO_SUMMARY.to_string(),
    }
}

/// Two evening ISS passes, the first at the next 19:41 UTC.
pub fn demo_passes(now: DateTime<Utc>) -> Vec<SatellitePass> {
    let mut first = now
        .date_naive()
        .and_hms_opt(19, 41, 0)
        .map(|t| Utc.from_utc_datetime(&t))
        .unwrap_or(now);
    if first < now {
        first += Duration::days(1);
    }
    let second = first + Duration::hours(13);

    let geometries = [
        PassGeometry {
            start_time: first,
            max_elevation_time: first + Duration::minutes(3),
            end_time: first + Duration::minutes(6),
            max_elevation: 63.0,
            start_azimuth: 225.0,
            max_azimuth: 180.0,
            end_azimuth: 45.0,
            duration_seconds: 360,
            magnitude: Some(-3.5),
        },
        PassGeometry {
            start_time: second,
            max_elevation_time: second + Duration::minutes(2),
            end_time: second + Duration::minutes(5),
            max_elevation: 45.0,
            start_azimuth: 270.0,
            max_azimuth: 180.0,
            end_azimuth: 90.0,
            duration_seconds: 300,
            magnitude: Some(-2.8),
        },
    ];

    geometries
        .into_iter()
        .filter_map(|geometry| match evaluate_pass(&geometry) {
            Ok(verdict) => Some(SatellitePass {
                satellite_name: "ISS (ZARYA)".to_string(),
                satellite_id: 25544,
                geometry,
                verdict,
            }),
            Err(e) => {
                warn!(error = %e, "Dropping invalid demo pass");
                None
            }
        })
        .collect()
}
