/// Background refresh of the space weather status
use crate::clients::WeatherFeeds;
use crate::config::SchedulerConfig;
use crate::services::SpaceWeatherService;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Spawn the periodic weather refresh, or return `None` when disabled.
pub fn start_background_tasks<F>(
    config: &SchedulerConfig,
    weather: Arc<SpaceWeatherService<F>>,
) -> Option<JoinHandle<()>>
where
    F: WeatherFeeds + 'static,
{
    if !config.enabled {
        info!("Background scheduler disabled");
        return None;
    }

    let interval = config.space_weather_seconds.max(1);
    let handle = tokio::spawn(async move {
        info!("Starting space weather task (interval: {}s)", interval);
        loop {
            let report = weather.current_report(Utc::now()).await;
            info!(
                kp = report.status.kp_current,
                gps_risk = %report.status.gps_degradation_risk,
                defaulted = report.defaulted.len(),
                "Space weather refreshed"
            );
            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
    });

    Some(handle)
}
