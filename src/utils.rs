/// Utility functions for picking values out of loosely-typed upstream JSON
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Timestamp layouts seen in NOAA and DONKI payloads
const TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%dT%H:%M:%S%.fZ",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Extract number from JSON value
pub fn num(v: &Value) -> Option<f64> {
    if let Some(x) = v.as_f64() {
        return Some(x);
    }
    if let Some(s) = v.as_str() {
        return s.trim().parse::<f64>().ok();
    }
    None
}

/// Pick string value from JSON by trying multiple keys
pub fn s_pick(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(x) = v.get(*k) {
            if let Some(s) = x.as_str() {
                if !s.is_empty() {
                    return Some(s.to_string());
                }
            } else if x.is_number() {
                return Some(x.to_string());
            }
        }
    }
    None
}

/// Parse a timestamp string in any of the known upstream layouts
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| Utc.from_utc_datetime(&ndt))
}

/// Pick timestamp value from JSON by trying multiple keys
pub fn t_pick(v: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    for k in keys {
        if let Some(x) = v.get(*k) {
            if let Some(s) = x.as_str() {
                if let Some(dt) = parse_utc(s) {
                    return Some(dt);
                }
            } else if let Some(n) = x.as_i64() {
                if let Some(dt) = Utc.timestamp_opt(n, 0).single() {
                    return Some(dt);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_from_float() {
        let json = serde_json::json!(42.5);
        assert_eq!(num(&json), Some(42.5));
    }

    #[test]
    fn test_num_from_string() {
        let json = serde_json::json!("2.33");
        assert_eq!(num(&json), Some(2.33));
    }

    #[test]
    fn test_num_from_invalid() {
        let json = serde_json::json!("invalid");
        assert_eq!(num(&json), None);
        assert_eq!(num(&serde_json::Value::Null), None);
    }

    #[test]
    fn test_s_pick_falls_through_empty() {
        let json = serde_json::json!({"activeRegionNum": "", "sourceLocation": "N15E20"});
        assert_eq!(
            s_pick(&json, &["activeRegionNum", "sourceLocation"]),
            Some("N15E20".to_string())
        );
    }

    #[test]
    fn test_s_pick_number() {
        let json = serde_json::json!({"activeRegionNum": 13664});
        assert_eq!(s_pick(&json, &["activeRegionNum"]), Some("13664".to_string()));
    }

    #[test]
    fn test_s_pick_not_found() {
        let json = serde_json::json!({"other": "value"});
        assert_eq!(s_pick(&json, &["name", "title"]), None);
    }

    #[test]
    fn test_t_pick_donki_format() {
        let json = serde_json::json!({"peakTime": "2024-05-10T06:54Z"});
        let expected = Utc.with_ymd_and_hms(2024, 5, 10, 6, 54, 0).unwrap();
        assert_eq!(t_pick(&json, &["peakTime"]), Some(expected));
    }

    #[test]
    fn test_t_pick_noaa_format() {
        let json = serde_json::json!({"time_tag": "2024-05-10 21:00:00"});
        let expected = Utc.with_ymd_and_hms(2024, 5, 10, 21, 0, 0).unwrap();
        assert_eq!(t_pick(&json, &["time_tag"]), Some(expected));
    }

    #[test]
    fn test_t_pick_skips_null_key() {
        let json = serde_json::json!({"peakTime": null, "beginTime": "2024-05-10T06:27Z"});
        assert!(t_pick(&json, &["peakTime", "beginTime"]).is_some());
    }

    #[test]
    fn test_t_pick_from_unix_timestamp() {
        let json = serde_json::json!({"startUTC": 1705315800});
        let result = t_pick(&json, &["startUTC"]);
        assert!(result.is_some());
    }

    #[test]
    fn test_t_pick_not_found() {
        let json = serde_json::json!({"other": "value"});
        assert_eq!(t_pick(&json, &["timestamp"]), None);
    }
}
