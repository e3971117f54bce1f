/// Application routes configuration
use crate::handlers::{
    evaluate_pass, get_impact_explanation, get_next_iss_pass, get_overhead_satellites,
    get_satellite_profile, get_space_weather_status, get_today_feed, health, root, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Satellite endpoints
        .route("/satellites/overhead", get(get_overhead_satellites))
        .route("/satellites/iss/next-pass", get(get_next_iss_pass))
        .route("/satellites/profile/:name", get(get_satellite_profile))
        .route("/passes/evaluate", post(evaluate_pass))
        // Space weather endpoints
        .route("/space-weather/status", get(get_space_weather_status))
        .route("/space-weather/impact-explanation", get(get_impact_explanation))
        // Activity feed
        .route("/feed/today", get(get_today_feed));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
}
