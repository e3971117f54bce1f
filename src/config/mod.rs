/// Application configuration module
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub api_host: String,
    pub api_port: u16,
    pub demo_mode: bool,
    pub noaa_swpc_base_url: String,
    pub nasa_api_url: String,
    pub nasa_api_key: String,
    pub n2yo_base_url: String,
    pub n2yo_api_key: String,
    pub fetch_timeout_seconds: u64,
    pub donki_lookback_days: u64,
    pub log_format: LogFormat,
    pub scheduler: SchedulerConfig,
}

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub enabled: bool,
    pub space_weather_seconds: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Build configuration from any key lookup; unset or unparseable values fall back to defaults.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let string = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());
        let number = |key: &str, default: u64| {
            get(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };
        let flag = |key: &str, default: bool| get(key).and_then(|s| parse_bool(&s)).unwrap_or(default);

        let log_format = match get("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            environment: string("ENVIRONMENT", "development"),
            api_host: string("API_HOST", "0.0.0.0"),
            api_port: get("API_PORT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(8000),
            demo_mode: flag("DEMO_MODE", false),
            noaa_swpc_base_url: string("NOAA_SWPC_BASE_URL", "https://services.swpc.noaa.gov"),
            nasa_api_url: string("NASA_API_URL", "https://api.nasa.gov"),
            nasa_api_key: string("NASA_API_KEY", "DEMO_KEY"),
            n2yo_base_url: string("N2YO_BASE_URL", "https://api.n2yo.com/rest/v1/satellite"),
            n2yo_api_key: string("N2YO_API_KEY", ""),
            fetch_timeout_seconds: number("FETCH_TIMEOUT_SECONDS", 10),
            donki_lookback_days: number("DONKI_LOOKBACK_DAYS", 2),
            log_format,
            scheduler: SchedulerConfig {
                enabled: flag("ENABLE_SCHEDULER", true),
                space_weather_seconds: number("SPACE_WEATHER_UPDATE_INTERVAL", 300), // 5 min
            },
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config_from(&[]);
        assert_eq!(cfg.environment, "development");
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8000");
        assert!(!cfg.demo_mode);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.nasa_api_key, "DEMO_KEY");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert!(cfg.scheduler.enabled);
        assert_eq!(cfg.scheduler.space_weather_seconds, 300);
    }

    #[test]
    fn test_overrides() {
        let cfg = config_from(&[
            ("DEMO_MODE", "True"),
            ("API_PORT", "9001"),
            ("ENABLE_SCHEDULER", "off"),
            ("FETCH_TIMEOUT_SECONDS", "3"),
            ("LOG_FORMAT", "JSON"),
            ("N2YO_API_KEY", "abc"),
        ]);
        assert!(cfg.demo_mode);
        assert_eq!(cfg.api_port, 9001);
        assert!(!cfg.scheduler.enabled);
        assert_eq!(cfg.fetch_timeout_seconds, 3);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.n2yo_api_key, "abc");
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let cfg = config_from(&[
            ("API_PORT", "eighty"),
            ("DEMO_MODE", "maybe"),
            ("SPACE_WEATHER_UPDATE_INTERVAL", "-5"),
        ]);
        assert_eq!(cfg.api_port, 8000);
        assert!(!cfg.demo_mode);
        assert_eq!(cfg.scheduler.space_weather_seconds, 300);
    }
}
