/// HTTP request handlers
use crate::clients::{DonkiClient, HttpClient, LiveWeatherFeeds, N2yoClient, NoaaClient};
use crate::config::AppConfig;
use crate::domain::{
    ActivityFeed, Health, ImpactExplanation, Location, PassGeometry, PassVerdict, SatellitePass,
    SatelliteProfile, WeatherStatus,
};
use crate::errors::{ApiError, ApiResult, ValidationError};
use crate::passes;
use crate::services::{SatelliteService, SpaceWeatherService};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub type WeatherService = SpaceWeatherService<LiveWeatherFeeds>;
pub type PassService = SatelliteService<N2yoClient>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub satellite_service: Arc<PassService>,
    pub environment: String,
    pub demo_mode: bool,
}

impl AppState {
    /// Wire clients and services from configuration
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let http = HttpClient::new(config.fetch_timeout())?;

        let feeds = LiveWeatherFeeds::new(
            NoaaClient::new(http.clone(), config.noaa_swpc_base_url.clone()),
            DonkiClient::new(
                http.clone(),
                config.nasa_api_url.clone(),
                config.nasa_api_key.clone(),
                config.donki_lookback_days,
            ),
        );
        let n2yo = N2yoClient::new(
            http,
            config.n2yo_base_url.clone(),
            config.n2yo_api_key.clone(),
        );

        Ok(Self {
            weather_service: Arc::new(SpaceWeatherService::new(feeds, config.demo_mode)),
            satellite_service: Arc::new(SatelliteService::new(n2yo, config.demo_mode)),
            environment: config.environment.clone(),
            demo_mode: config.demo_mode,
        })
    }
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[derive(Serialize)]
pub struct PassList {
    pub passes: Vec<SatellitePass>,
}

#[derive(Debug, Deserialize)]
pub struct OverheadQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub alt: f64,
    #[serde(default = "default_hours")]
    pub hours: u32,
    #[serde(default = "default_overhead_elevation")]
    pub min_elevation: f64,
}

#[derive(Debug, Deserialize)]
pub struct NextPassQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub alt: f64,
    #[serde(default = "default_next_pass_elevation")]
    pub min_elevation: f64,
}

fn default_hours() -> u32 {
    24
}

fn default_overhead_elevation() -> f64 {
    10.0
}

fn default_next_pass_elevation() -> f64 {
    30.0
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        environment: state.environment.clone(),
        demo_mode: state.demo_mode,
    })
}

pub async fn root() -> Json<Value> {
    Json(serde_json::json!({
        "message": "Space Agent API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Passes of catalogued satellites over a location
pub async fn get_overhead_satellites(
    State(state): State<AppState>,
    query: Result<Query<OverheadQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessResponse<PassList>>> {
    let Query(q) = query?;
    let location = Location::new(q.lat, q.lon, q.alt)?;
    ValidationError::check_range("hours", q.hours as f64, 1.0, 168.0)?;
    ValidationError::check_range("min_elevation", q.min_elevation, 0.0, 90.0)?;

    let passes = state
        .satellite_service
        .overhead_passes(&location, q.hours, q.min_elevation, Utc::now())
        .await;
    Ok(Json(SuccessResponse::new(PassList { passes })))
}

/// Next good ISS pass
pub async fn get_next_iss_pass(
    State(state): State<AppState>,
    query: Result<Query<NextPassQuery>, QueryRejection>,
) -> ApiResult<Json<SuccessResponse<SatellitePass>>> {
    let Query(q) = query?;
    let location = Location::new(q.lat, q.lon, q.alt)?;
    ValidationError::check_range("min_elevation", q.min_elevation, 0.0, 90.0)?;

    state
        .satellite_service
        .next_iss_pass(&location, q.min_elevation, Utc::now())
        .await
        .map(|pass| Json(SuccessResponse::new(pass)))
        .ok_or_else(|| ApiError::NotFound("No upcoming ISS passes meeting criteria".to_string()))
}

pub async fn get_satellite_profile(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<SuccessResponse<SatelliteProfile>>> {
    state
        .satellite_service
        .profile(&name)
        .map(|profile| Json(SuccessResponse::new(profile)))
        .ok_or_else(|| ApiError::NotFound(format!("Satellite '{}' not found", name)))
}

/// Evaluate caller-supplied pass geometry
pub async fn evaluate_pass(
    body: Result<Json<PassGeometry>, JsonRejection>,
) -> ApiResult<Json<SuccessResponse<PassVerdict>>> {
    let Json(geometry) = body?;
    let verdict = passes::evaluate_pass(&geometry)?;
    Ok(Json(SuccessResponse::new(verdict)))
}

/// Current space weather status
pub async fn get_space_weather_status(
    State(state): State<AppState>,
) -> Json<SuccessResponse<WeatherStatus>> {
    let status = state.weather_service.current_status(Utc::now()).await;
    Json(SuccessResponse::new(status))
}

pub async fn get_impact_explanation(
    State(state): State<AppState>,
) -> Json<SuccessResponse<ImpactExplanation>> {
    let impact = state.weather_service.impact_explanation(Utc::now()).await;
    Json(SuccessResponse::new(impact))
}

/// Today's activity feed
pub async fn get_today_feed(State(state): State<AppState>) -> Json<SuccessResponse<ActivityFeed>> {
    let feed = state.weather_service.activity_feed(Utc::now()).await;
    Json(SuccessResponse::new(feed))
}
