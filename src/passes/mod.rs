//! Satellite pass evaluation: decides whether a transit is worth going
//! outside for and writes a short commentary about it.

use crate::domain::{PassGeometry, PassVerdict};
use crate::errors::ValidationError;

/// Passes peaking above this elevation (degrees) are always worth watching.
pub const WORTH_WATCHING_ELEVATION: f64 = 40.0;

pub const LOW_PASS_COMMENTARY: &str = "Low pass, may not be easily visible.";

/// Validate the geometry and produce a verdict.
pub fn evaluate_pass(geometry: &PassGeometry) -> Result<PassVerdict, ValidationError> {
    geometry.validate()?;

    let worth_watching = is_worth_watching(geometry.max_elevation, geometry.magnitude);
    Ok(PassVerdict {
        worth_watching,
        commentary: commentary(geometry.max_elevation, geometry.duration_seconds, worth_watching),
    })
}

/// High passes qualify on elevation alone; a negative magnitude (very bright)
/// qualifies a pass at any elevation. Unknown magnitude never counts as bright.
pub fn is_worth_watching(max_elevation: f64, magnitude: Option<f64>) -> bool {
    max_elevation > WORTH_WATCHING_ELEVATION || magnitude.is_some_and(|m| m < 0.0)
}

pub fn commentary(max_elevation: f64, duration_seconds: u32, worth_watching: bool) -> String {
    if !worth_watching {
        return LOW_PASS_COMMENTARY.to_string();
    }

    let visibility = if max_elevation > 70.0 {
        "Overhead pass! Excellent viewing."
    } else if max_elevation > 50.0 {
        "High pass, very good viewing."
    } else if max_elevation > 30.0 {
        "Good pass, should be easy to spot."
    } else {
        "Moderate pass, clear sky recommended."
    };

    let length = if duration_seconds < 180 {
        "Quick pass"
    } else if duration_seconds < 360 {
        "Standard duration"
    } else {
        "Long pass"
    };

    format!("{} {} ({}s).", visibility, length, duration_seconds)
}
