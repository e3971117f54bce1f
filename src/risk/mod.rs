//! Space weather risk assessment.
//!
//! Turns a Kp reading plus recent flares and CMEs into per-domain risk
//! ratings, a one-line summary and a structured impact explanation. Every
//! function here is pure; the evaluation time is passed in explicitly.

use crate::domain::{
    AuroraVisibility, CmeEvent, FlareClass, FlareEvent, GeomagneticSample, ImpactExplanation,
    RiskLevel, Severity, WeatherStatus,
};
use chrono::{DateTime, Duration, Utc};

/// Flares older than this no longer count towards HF radio risk.
pub const RECENT_FLARE_WINDOW_SECS: i64 = 3600;

/// Assess current conditions.
///
/// Idempotent: identical inputs (including `now`) give an identical status.
pub fn assess(
    sample: &GeomagneticSample,
    flares: Vec<FlareEvent>,
    cmes: Vec<CmeEvent>,
    now: DateTime<Utc>,
) -> WeatherStatus {
    let kp = sample.value();
    let gps = gps_risk(kp, &cmes);
    let hf = hf_radio_risk(&flares, now);
    let satellite = satellite_risk(kp, &flares);
    let aurora = aurora_visibility(kp);

    WeatherStatus {
        timestamp: now,
        kp_current: kp,
        kp_forecast_3h: None,
        summary: summarize(kp, gps, hf),
        recent_flares: flares,
        active_cmes: cmes,
        gps_degradation_risk: gps,
        hf_radio_risk: hf,
        satellite_risk: satellite,
        aurora_visibility: aurora,
    }
}

/// Any Earth-directed CME escalates straight to high.
pub fn gps_risk(kp: f64, cmes: &[CmeEvent]) -> RiskLevel {
    if kp >= 7.0 || cmes.iter().any(CmeEvent::earth_directed) {
        RiskLevel::High
    } else if kp >= 5.0 {
        RiskLevel::Moderate
    } else if kp >= 4.0 {
        RiskLevel::Minor
    } else {
        RiskLevel::None
    }
}

pub fn hf_radio_risk(flares: &[FlareEvent], now: DateTime<Utc>) -> RiskLevel {
    if flares.is_empty() {
        return RiskLevel::None;
    }

    let window = Duration::seconds(RECENT_FLARE_WINDOW_SECS);
    let recent_strong: Vec<&FlareEvent> = flares
        .iter()
        .filter(|f| {
            let age = now - f.timestamp();
            f.class().is_strong() && age >= Duration::zero() && age < window
        })
        .collect();

    if recent_strong.iter().any(|f| f.class() == FlareClass::X) {
        RiskLevel::High
    } else if !recent_strong.is_empty() {
        RiskLevel::Moderate
    } else {
        RiskLevel::Minor
    }
}

pub fn satellite_risk(kp: f64, flares: &[FlareEvent]) -> RiskLevel {
    let x_class = || flares.iter().filter(|f| f.class() == FlareClass::X);

    if kp >= 8.0 || x_class().any(|f| f.scale() > 5.0) {
        RiskLevel::High
    } else if kp >= 6.0 || x_class().next().is_some() {
        RiskLevel::Moderate
    } else if kp >= 5.0 {
        RiskLevel::Minor
    } else {
        RiskLevel::None
    }
}

pub fn aurora_visibility(kp: f64) -> AuroraVisibility {
    if kp >= 8.0 {
        AuroraVisibility::VisibleMidLatitudes
    } else if kp >= 6.0 {
        AuroraVisibility::VisibleHighLatitudes
    } else if kp >= 4.0 {
        AuroraVisibility::VisiblePolarRegions
    } else {
        AuroraVisibility::Unlikely
    }
}

/// Textual band for a Kp value.
pub fn kp_band(kp: f64) -> &'static str {
    if kp < 4.0 {
        "Quiet geomagnetic conditions"
    } else if kp < 5.0 {
        "Unsettled geomagnetic conditions"
    } else if kp < 6.0 {
        "Active geomagnetic conditions"
    } else if kp < 7.0 {
        "Minor geomagnetic storm"
    } else if kp < 8.0 {
        "Moderate geomagnetic storm"
    } else {
        "Strong geomagnetic storm"
    }
}

pub fn summarize(kp: f64, gps: RiskLevel, hf: RiskLevel) -> String {
    let mut summary = format!("Status: {} (Kp {:.1}).", kp_band(kp), kp);

    let mut impacts = Vec::new();
    if gps.is_elevated() {
        impacts.push(format!("{} GPS degradation possible", gps.capitalized()));
    }
    if hf.is_elevated() {
        impacts.push(format!("{} HF radio disruption", hf.capitalized()));
    }

    if impacts.is_empty() {
        summary.push_str(" Most users unaffected.");
    } else {
        summary.push(' ');
        summary.push_str(&impacts.join("; "));
        summary.push('.');
    }
    summary
}

/// Explain what the status means and who it affects.
pub fn build_impact_explanation(status: &WeatherStatus) -> ImpactExplanation {
    let kp = status.kp_current;

    let mut what_happened = vec![format!("Kp index: {:.1}", kp)];
    let strong: Vec<&FlareEvent> = status
        .recent_flares
        .iter()
        .filter(|f| f.class().is_strong())
        .collect();
    // Names the class of the first strong flare in feed order, not the
    // strongest one. Fixtures depend on this.
    if let Some(first) = strong.first() {
        what_happened.push(format!(
            "{} {}-class solar flare(s)",
            strong.len(),
            first.class()
        ));
    }
    if !status.active_cmes.is_empty() {
        what_happened.push(format!("{} active CME(s)", status.active_cmes.len()));
    }

    let mut potential_impacts = Vec::new();
    if status.gps_degradation_risk != RiskLevel::None {
        potential_impacts.push("GPS accuracy may be reduced for precision applications");
    }
    if status.hf_radio_risk != RiskLevel::None {
        potential_impacts.push("HF radio communications may experience disruption");
    }
    if status.satellite_risk != RiskLevel::None {
        potential_impacts.push("Satellite operations may experience anomalies");
    }
    if status.aurora_visibility != AuroraVisibility::Unlikely {
        potential_impacts.push("Aurora may be visible at lower latitudes than usual");
    }

    let mut who_should_care = Vec::new();
    if status.gps_degradation_risk.is_elevated() {
        who_should_care.extend(["Drone operators", "Surveyors", "Aviation professionals"]);
    }
    if status.hf_radio_risk.is_elevated() {
        who_should_care.extend([
            "Ham radio operators",
            "Maritime communications",
            "Emergency services",
        ]);
    }
    if status.satellite_risk.is_elevated() {
        who_should_care.extend(["Satellite operators", "Space agencies"]);
    }
    if who_should_care.is_empty() {
        who_should_care.push("Space weather enthusiasts");
    }

    ImpactExplanation {
        what_happened: what_happened.join("; "),
        potential_impacts: potential_impacts.into_iter().map(String::from).collect(),
        who_should_care: who_should_care.into_iter().map(String::from).collect(),
        actionable_guidance: guidance(kp).to_string(),
        severity: severity(kp),
    }
}

fn guidance(kp: f64) -> &'static str {
    if kp < 5.0 {
        "Continue normal operations. Monitor for updates."
    } else if kp < 7.0 {
        "Monitor for GPS accuracy if doing precision work. \
         Ham radio operators may experience propagation changes."
    } else {
        "Consider delaying precision GPS work. Satellite operators \
         should monitor spacecraft health. Aurora photographers: \
         good opportunity tonight!"
    }
}

/// Never `Severe`: that level is reserved for alerts raised outside the assessor.
pub fn severity(kp: f64) -> Severity {
    if kp >= 7.0 {
        Severity::High
    } else if kp >= 5.0 {
        Severity::Moderate
    } else {
        Severity::Info
    }
}
