/// Business logic services layer
use crate::clients::{PassProvider, WeatherFeeds};
use crate::domain::{
    ActivityFeed, GeomagneticSample, ImpactExplanation, Location, OrbitType, SatellitePass,
    SatelliteProfile, SpaceEvent, WeatherStatus,
};
use crate::errors::FetchError;
use crate::fixtures;
use crate::passes::evaluate_pass;
use crate::risk;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Kp substituted when the geomagnetic feed is unavailable
pub const DEFAULT_KP: f64 = GeomagneticSample::FALLBACK;

/// Upstream feeds joined into a weather status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Geomagnetic,
    Flares,
    Cmes,
}

impl Feed {
    pub fn as_str(self) -> &'static str {
        match self {
            Feed::Geomagnetic => "geomagnetic",
            Feed::Flares => "flares",
            Feed::Cmes => "cmes",
        }
    }
}

/// A status together with the feeds that had to be defaulted to build it
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub status: WeatherStatus,
    pub defaulted: Vec<Feed>,
}

/// Space weather status aggregation service
pub struct SpaceWeatherService<F> {
    feeds: F,
    demo_mode: bool,
}

impl<F: WeatherFeeds> SpaceWeatherService<F> {
    pub fn new(feeds: F, demo_mode: bool) -> Self {
        Self { feeds, demo_mode }
    }

    /// Fetch all feeds concurrently, default the ones that failed and assess.
    pub async fn current_report(&self, now: DateTime<Utc>) -> StatusReport {
        if self.demo_mode {
            return StatusReport {
                status: fixtures::demo_weather_status(now),
                defaulted: Vec::new(),
            };
        }

        let (kp, flares, cmes) = tokio::join!(
            self.feeds.fetch_kp(),
            self.feeds.fetch_flares(),
            self.feeds.fetch_cmes()
        );

        let mut defaulted = Vec::new();

        let sample = match kp {
            Ok(sample) => sample,
            Err(e) => {
                substituted(Feed::Geomagnetic, &e, &mut defaulted);
                GeomagneticSample::fallback(now)
            }
        };
        let flares = match flares {
            Ok(flares) => flares,
            Err(e) => {
                substituted(Feed::Flares, &e, &mut defaulted);
                Vec::new()
            }
        };
        let cmes = match cmes {
            Ok(cmes) => cmes,
            Err(e) => {
                substituted(Feed::Cmes, &e, &mut defaulted);
                Vec::new()
            }
        };

        StatusReport {
            status: risk::assess(&sample, flares, cmes, now),
            defaulted,
        }
    }

    pub async fn current_status(&self, now: DateTime<Utc>) -> WeatherStatus {
        self.current_report(now).await.status
    }

    pub async fn impact_explanation(&self, now: DateTime<Utc>) -> ImpactExplanation {
        let status = self.current_status(now).await;
        risk::build_impact_explanation(&status)
    }

    /// Today's activity feed: one space weather entry built from the current status
    pub async fn activity_feed(&self, now: DateTime<Utc>) -> ActivityFeed {
        let status = self.current_status(now).await;
        let impact = risk::build_impact_explanation(&status);

        let events = vec![SpaceEvent {
            event_id: format!("sw-{}", now.format("%Y%m%d")),
            event_type: "space_weather".to_string(),
            timestamp: now,
            title: "Space Weather Update".to_string(),
            description: status.summary.clone(),
            severity: Some(impact.severity),
            data: serde_json::json!({ "kp": status.kp_current }),
        }];

        ActivityFeed {
            period: "today".to_string(),
            summary: format!("Today's space activity: {} notable events", events.len()),
            events,
        }
    }
}

fn substituted(feed: Feed, error: &FetchError, defaulted: &mut Vec<Feed>) {
    warn!(feed = feed.as_str(), error = %error, "Upstream feed unavailable, using default");
    defaulted.push(feed);
}

/// Satellites tracked by the pass service
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub norad_id: u32,
    pub name: &'static str,
}

pub const ISS_NORAD_ID: u32 = 25544;

pub const CATALOG: [CatalogEntry; 3] = [
    CatalogEntry {
        key: "ISS",
        norad_id: ISS_NORAD_ID,
        name: "ISS (ZARYA)",
    },
    CatalogEntry {
        key: "HUBBLE",
        norad_id: 20580,
        name: "HST",
    },
    CatalogEntry {
        key: "TIANGONG",
        norad_id: 48274,
        name: "TIANHE",
    },
];

/// Satellite pass prediction service
pub struct SatelliteService<P> {
    provider: P,
    demo_mode: bool,
}

impl<P: PassProvider> SatelliteService<P> {
    pub fn new(provider: P, demo_mode: bool) -> Self {
        Self {
            provider,
            demo_mode,
        }
    }

    /// Passes of every catalogued satellite within the window, sorted by start time.
    ///
    /// A satellite whose prediction fails is logged and left out.
    pub async fn overhead_passes(
        &self,
        location: &Location,
        hours: u32,
        min_elevation: f64,
        now: DateTime<Utc>,
    ) -> Vec<SatellitePass> {
        if self.demo_mode {
            return fixtures::demo_passes(now);
        }

        let days = (hours / 24).max(1);
        let mut passes = Vec::new();

        for entry in CATALOG {
            let batch = match self
                .provider
                .visual_passes(entry.norad_id, location, days, min_elevation)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(satellite = entry.key, error = %e, "Failed to get passes");
                    continue;
                }
            };

            for geometry in batch.passes {
                match evaluate_pass(&geometry) {
                    Ok(verdict) => passes.push(SatellitePass {
                        satellite_name: batch.satellite_name.clone(),
                        satellite_id: batch.satellite_id,
                        geometry,
                        verdict,
                    }),
                    Err(e) => warn!(satellite = entry.key, error = %e, "Skipping invalid pass"),
                }
            }
        }

        passes.sort_by_key(|p| p.geometry.start_time);
        passes
    }

    /// First ISS pass in the next 48 hours at or above `min_elevation`
    pub async fn next_iss_pass(
        &self,
        location: &Location,
        min_elevation: f64,
        now: DateTime<Utc>,
    ) -> Option<SatellitePass> {
        self.overhead_passes(location, 48, min_elevation, now)
            .await
            .into_iter()
            .find(|p| p.satellite_id == ISS_NORAD_ID)
    }

    /// Profile for a catalogued satellite, matched case-insensitively on key or name
    pub fn profile(&self, query: &str) -> Option<SatelliteProfile> {
        let query = query.to_lowercase();
        let entry = CATALOG.iter().find(|e| {
            query.contains(&e.key.to_lowercase()) || query.contains(&e.name.to_lowercase())
        })?;
        Some(profile_for(entry))
    }
}

fn profile_for(entry: &CatalogEntry) -> SatelliteProfile {
    let (name, purpose, altitude_km, speed_kmh, country, why_care) = match entry.key {
        "ISS" => (
            "International Space Station",
            "Research laboratory and human spaceflight",
            408.0,
            27600.0,
            "International",
            "The ISS is a continuously inhabited space station where astronauts conduct \
             scientific research in microgravity. It's the brightest satellite and often \
             visible to the naked eye.",
        ),
        "HUBBLE" => (
            "Hubble Space Telescope",
            "Space telescope for astronomical observations",
            547.0,
            27300.0,
            "USA/ESA",
            "Hubble has revolutionized astronomy with stunning images and discoveries \
             about the universe. Operating since 1990.",
        ),
        _ => (
            "Tiangong Space Station",
            "Chinese space station",
            390.0,
            27500.0,
            "China",
            "China's first long-term space station, continuously inhabited since 2022. \
             Conducting scientific research and technology demos.",
        ),
    };

    SatelliteProfile {
        satellite_id: entry.norad_id,
        name: name.to_string(),
        norad_id: entry.norad_id.to_string(),
        purpose: purpose.to_string(),
        orbit_type: OrbitType::Leo,
        altitude_km,
        speed_kmh,
        country: Some(country.to_string()),
        why_care: why_care.to_string(),
        recent_changes: None,
    }
}
