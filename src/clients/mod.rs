/// External API clients module
use crate::domain::{CmeEvent, FlareClass, FlareEvent, GeomagneticSample, Location, PassGeometry};
use crate::errors::FetchError;
use crate::utils::{num, parse_utc, s_pick, t_pick};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Source of the three space weather feeds the status aggregator joins.
pub trait WeatherFeeds: Send + Sync {
    fn fetch_kp(&self) -> impl Future<Output = Result<GeomagneticSample, FetchError>> + Send;
    fn fetch_flares(&self) -> impl Future<Output = Result<Vec<FlareEvent>, FetchError>> + Send;
    fn fetch_cmes(&self) -> impl Future<Output = Result<Vec<CmeEvent>, FetchError>> + Send;
}

/// Visual pass predictions for one satellite over one observer.
#[derive(Debug, Clone)]
pub struct PassBatch {
    pub satellite_name: String,
    pub satellite_id: u32,
    pub passes: Vec<PassGeometry>,
}

pub trait PassProvider: Send + Sync {
    fn visual_passes(
        &self,
        norad_id: u32,
        location: &Location,
        days: u32,
        min_elevation: f64,
    ) -> impl Future<Output = Result<PassBatch, FetchError>> + Send;
}

/// HTTP client wrapper with common configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("space-agent/0.1")
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL and decode the JSON body; non-2xx is a failure, an empty body is `null`
    pub async fn get_json<Q: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        query: &Q,
    ) -> Result<Value, FetchError> {
        let resp = self.client.get(url).query(query).send().await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

/// NOAA SWPC client for the planetary Kp index
pub struct NoaaClient {
    http_client: HttpClient,
    base_url: String,
}

impl NoaaClient {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
        }
    }

    /// Fetch the latest Kp reading
    pub async fn fetch_kp(&self) -> Result<GeomagneticSample, FetchError> {
        let url = format!(
            "{}/products/noaa-planetary-k-index-forecast.json",
            self.base_url.trim_end_matches('/')
        );
        let json = self.http_client.get_json(&url, &[] as &[(&str, &str)]).await?;
        parse_kp(&json, Utc::now())
    }
}

/// Parse a NOAA Kp product.
///
/// The payload is a header row followed by data rows; the latest reading is the
/// second column of the last row. Object rows (newer product layout) use `kp`.
pub fn parse_kp(json: &Value, fetched_at: DateTime<Utc>) -> Result<GeomagneticSample, FetchError> {
    let rows = json
        .as_array()
        .ok_or_else(|| FetchError::Malformed("Kp payload is not an array".into()))?;

    // array rows start with a header, so a lone array row carries no data
    let latest = rows
        .last()
        .filter(|row| !row.is_array() || rows.len() > 1)
        .ok_or_else(|| FetchError::Malformed("Kp payload has no data rows".into()))?;

    let (value, time) = match latest {
        Value::Array(cols) => (
            cols.get(1).and_then(num),
            cols.first()
                .and_then(Value::as_str)
                .and_then(parse_utc),
        ),
        Value::Object(_) => (
            latest.get("kp").and_then(num),
            t_pick(latest, &["time_tag", "model_prediction_time"]),
        ),
        _ => (None, None),
    };

    let value = value.ok_or_else(|| FetchError::Malformed("Kp value missing".into()))?;
    GeomagneticSample::new(value, time.unwrap_or(fetched_at))
        .map_err(|e| FetchError::Malformed(e.to_string()))
}

/// NASA DONKI client for solar flares and coronal mass ejections
pub struct DonkiClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
    lookback_days: u64,
}

impl DonkiClient {
    pub fn new(http_client: HttpClient, base_url: String, api_key: String, lookback_days: u64) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
            lookback_days,
        }
    }

    /// Fetch DONKI Solar Flares
    pub async fn fetch_flares(&self) -> Result<Vec<FlareEvent>, FetchError> {
        let json = self.fetch("FLR").await?;
        Ok(parse_flares(&json))
    }

    /// Fetch DONKI Coronal Mass Ejections
    pub async fn fetch_cmes(&self) -> Result<Vec<CmeEvent>, FetchError> {
        let json = self.fetch("CME").await?;
        Ok(parse_cmes(&json))
    }

    async fn fetch(&self, product: &str) -> Result<Value, FetchError> {
        let to = Utc::now().date_naive();
        let from = to - chrono::Days::new(self.lookback_days);
        let url = format!("{}/DONKI/{}", self.base_url.trim_end_matches('/'), product);

        let json = self
            .http_client
            .get_json(
                &url,
                &[
                    ("startDate", from.to_string()),
                    ("endDate", to.to_string()),
                    ("api_key", self.api_key.clone()),
                ],
            )
            .await?;

        // DONKI answers an empty window with an empty body or null
        match json {
            Value::Array(_) => Ok(json),
            Value::Null => Ok(Value::Array(Vec::new())),
            _ => Err(FetchError::Malformed(format!("DONKI {} payload is not an array", product))),
        }
    }
}

/// Map DONKI FLR records to flare events. Records below C class or without a
/// usable time are skipped.
pub fn parse_flares(json: &Value) -> Vec<FlareEvent> {
    let Some(items) = json.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let designation = s_pick(item, &["classType"])?;
            let (class, scale) = FlareClass::parse_designation(&designation)?;
            let timestamp = t_pick(item, &["peakTime", "beginTime"])?;
            let flare = match FlareEvent::new(class, scale, timestamp) {
                Ok(f) => f,
                Err(e) => {
                    debug!(designation = %designation, error = %e, "Skipping flare record");
                    return None;
                }
            };
            Some(match s_pick(item, &["activeRegionNum"]) {
                Some(region) => flare.with_region(format!("AR{}", region)),
                None => flare,
            })
        })
        .collect()
}

/// Map DONKI CME records to CME events using each record's most accurate analysis.
pub fn parse_cmes(json: &Value) -> Vec<CmeEvent> {
    let Some(items) = json.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let timestamp = t_pick(item, &["startTime"])?;
            let analyses = item.get("cmeAnalyses")?.as_array()?;
            let analysis = analyses
                .iter()
                .find(|a| a.get("isMostAccurate").and_then(Value::as_bool) == Some(true))
                .or_else(|| analyses.first())?;
            let speed = analysis.get("speed").and_then(num)?;

            let runs = analysis
                .get("enlilList")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let arrival = runs
                .iter()
                .filter_map(|run| t_pick(run, &["estimatedShockArrivalTime"]))
                .min();
            let earth_directed = arrival.is_some()
                || runs
                    .iter()
                    .any(|run| run.get("isEarthGB").and_then(Value::as_bool) == Some(true));

            let cme = match CmeEvent::new(timestamp, speed, earth_directed) {
                Ok(c) => c,
                Err(e) => {
                    debug!(error = %e, "Skipping CME record");
                    return None;
                }
            };
            Some(match arrival {
                Some(at) => cme.with_estimated_arrival(at),
                None => cme,
            })
        })
        .collect()
}

/// Kp and DONKI clients bundled as the live weather feeds
pub struct LiveWeatherFeeds {
    noaa: NoaaClient,
    donki: DonkiClient,
}

impl LiveWeatherFeeds {
    pub fn new(noaa: NoaaClient, donki: DonkiClient) -> Self {
        Self { noaa, donki }
    }
}

impl WeatherFeeds for LiveWeatherFeeds {
    fn fetch_kp(&self) -> impl Future<Output = Result<GeomagneticSample, FetchError>> + Send {
        self.noaa.fetch_kp()
    }

    fn fetch_flares(&self) -> impl Future<Output = Result<Vec<FlareEvent>, FetchError>> + Send {
        self.donki.fetch_flares()
    }

    fn fetch_cmes(&self) -> impl Future<Output = Result<Vec<CmeEvent>, FetchError>> + Send {
        self.donki.fetch_cmes()
    }
}

/// N2YO visual pass client
pub struct N2yoClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct N2yoResponse {
    info: N2yoInfo,
    #[serde(default)]
    passes: Vec<N2yoPass>,
}

#[derive(Debug, Deserialize)]
struct N2yoInfo {
    satid: u32,
    satname: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct N2yoPass {
    start_az: f64,
    #[serde(rename = "startUTC")]
    start_utc: i64,
    max_az: f64,
    max_el: f64,
    #[serde(rename = "maxUTC")]
    max_utc: i64,
    end_az: f64,
    #[serde(rename = "endUTC")]
    end_utc: i64,
    #[serde(default)]
    mag: Option<f64>,
    duration: u32,
}

impl N2yoClient {
    pub fn new(http_client: HttpClient, base_url: String, api_key: String) -> Self {
        Self {
            http_client,
            base_url,
            api_key,
        }
    }

    /// Fetch visual passes for a satellite
    pub async fn fetch_visual_passes(
        &self,
        norad_id: u32,
        location: &Location,
        days: u32,
        min_elevation: f64,
    ) -> Result<PassBatch, FetchError> {
        let url = format!(
            "{}/visualpasses/{}/{}/{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            norad_id,
            location.latitude,
            location.longitude,
            location.altitude,
            days,
            min_elevation
        );
        let json = self
            .http_client
            .get_json(&url, &[("apiKey", self.api_key.as_str())])
            .await?;
        parse_visual_passes(json)
    }
}

impl PassProvider for N2yoClient {
    fn visual_passes(
        &self,
        norad_id: u32,
        location: &Location,
        days: u32,
        min_elevation: f64,
    ) -> impl Future<Output = Result<PassBatch, FetchError>> + Send {
        self.fetch_visual_passes(norad_id, location, days, min_elevation)
    }
}

/// Decode an N2YO `visualpasses` response
pub fn parse_visual_passes(json: Value) -> Result<PassBatch, FetchError> {
    let resp: N2yoResponse =
        serde_json::from_value(json).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let passes = resp
        .passes
        .into_iter()
        .map(|p| {
            Ok(PassGeometry {
                start_time: epoch(p.start_utc)?,
                max_elevation_time: epoch(p.max_utc)?,
                end_time: epoch(p.end_utc)?,
                max_elevation: p.max_el,
                start_azimuth: p.start_az,
                max_azimuth: p.max_az,
                end_azimuth: p.end_az,
                duration_seconds: p.duration,
                magnitude: p.mag,
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(PassBatch {
        satellite_name: resp.info.satname,
        satellite_id: resp.info.satid,
        passes,
    })
}

fn epoch(secs: i64) -> Result<DateTime<Utc>, FetchError> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| FetchError::Malformed(format!("invalid epoch seconds {}", secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 11, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_kp_array_rows() {
        let payload = json!([
            ["time_tag", "kp", "observed", "noaa_scale"],
            ["2024-05-10 18:00:00", "7.67", "observed", "G3"],
            ["2024-05-10 21:00:00", "8.33", "estimated", "G4"]
        ]);
        let sample = parse_kp(&payload, fetched_at()).unwrap();
        assert_eq!(sample.value(), 8.33);
        assert_eq!(
            sample.timestamp(),
            Utc.with_ymd_and_hms(2024, 5, 10, 21, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_kp_object_rows() {
        let payload = json!([
            {"time_tag": "2024-05-10T18:00:00", "kp": 4.0},
            {"time_tag": "2024-05-10T21:00:00", "kp": 5.33}
        ]);
        let sample = parse_kp(&payload, fetched_at()).unwrap();
        assert_eq!(sample.value(), 5.33);
    }

    #[test]
    fn test_parse_kp_header_only_is_malformed() {
        let payload = json!([["time_tag", "kp", "observed", "noaa_scale"]]);
        assert!(matches!(
            parse_kp(&payload, fetched_at()),
            Err(FetchError::Malformed(_))
        ));
        assert!(parse_kp(&json!({"kp": 3}), fetched_at()).is_err());
    }

    #[test]
    fn test_parse_flares() {
        let payload = json!([
            {
                "flrID": "2024-05-10T06:27:00-FLR-001",
                "beginTime": "2024-05-10T06:27Z",
                "peakTime": "2024-05-10T06:54Z",
                "classType": "X3.9",
                "activeRegionNum": 13664
            },
            {"beginTime": "2024-05-10T08:00Z", "peakTime": null, "classType": "M2.1", "activeRegionNum": null},
            {"beginTime": "2024-05-10T09:00Z", "classType": "B8.0"},
            {"classType": "C1.0"}
        ]);
        let flares = parse_flares(&payload);
        assert_eq!(flares.len(), 2);
        assert_eq!(flares[0].class(), FlareClass::X);
        assert_eq!(flares[0].scale(), 3.9);
        assert_eq!(flares[0].region(), Some("AR13664"));
        assert_eq!(
            flares[0].timestamp(),
            Utc.with_ymd_and_hms(2024, 5, 10, 6, 54, 0).unwrap()
        );
        assert_eq!(flares[1].class(), FlareClass::M);
        assert_eq!(flares[1].region(), None);
    }

    #[test]
    fn test_parse_cmes() {
        let payload = json!([
            {
                "activityID": "2024-05-10T06:36:00-CME-001",
                "startTime": "2024-05-10T06:36Z",
                "cmeAnalyses": [
                    {"isMostAccurate": false, "speed": 500.0, "enlilList": null},
                    {
                        "isMostAccurate": true,
                        "speed": 1300.0,
                        "enlilList": [
                            {"estimatedShockArrivalTime": "2024-05-11T12:00Z", "isEarthGB": false},
                            {"estimatedShockArrivalTime": "2024-05-11T09:30Z", "isEarthGB": false}
                        ]
                    }
                ]
            },
            {
                "startTime": "2024-05-09T01:00Z",
                "cmeAnalyses": [{"isMostAccurate": true, "speed": 400, "enlilList": []}]
            },
            {"startTime": "2024-05-09T02:00Z", "cmeAnalyses": null}
        ]);
        let cmes = parse_cmes(&payload);
        assert_eq!(cmes.len(), 2);
        assert_eq!(cmes[0].speed_kms(), 1300.0);
        assert!(cmes[0].earth_directed());
        assert_eq!(
            cmes[0].estimated_arrival(),
            Some(Utc.with_ymd_and_hms(2024, 5, 11, 9, 30, 0).unwrap())
        );
        assert!(!cmes[1].earth_directed());
    }

    #[test]
    fn test_parse_cme_glancing_blow() {
        let payload = json!([{
            "startTime": "2024-05-09T01:00Z",
            "cmeAnalyses": [{"isMostAccurate": true, "speed": "720", "enlilList": [{"isEarthGB": true}]}]
        }]);
        let cmes = parse_cmes(&payload);
        assert!(cmes[0].earth_directed());
        assert_eq!(cmes[0].estimated_arrival(), None);
    }

    #[test]
    fn test_parse_visual_passes() {
        let payload = json!({
            "info": {"satid": 25544, "satname": "SPACE STATION", "transactionscount": 4, "passescount": 1},
            "passes": [{
                "startAz": 307.21, "startAzCompass": "NW", "startEl": 13.08, "startUTC": 1521368025,
                "maxAz": 225.45, "maxAzCompass": "SW", "maxEl": 79.57, "maxUTC": 1521368345,
                "endAz": 132.82, "endAzCompass": "SE", "endEl": 0, "endUTC": 1521368660,
                "mag": -2.4, "duration": 485
            }]
        });
        let batch = parse_visual_passes(payload).unwrap();
        assert_eq!(batch.satellite_id, 25544);
        assert_eq!(batch.satellite_name, "SPACE STATION");
        assert_eq!(batch.passes.len(), 1);
        let pass = &batch.passes[0];
        assert_eq!(pass.max_elevation, 79.57);
        assert_eq!(pass.duration_seconds, 485);
        assert_eq!(pass.magnitude, Some(-2.4));
        assert_eq!(pass.start_time.timestamp(), 1521368025);
        assert!(pass.validate().is_ok());
    }

    #[test]
    fn test_parse_visual_passes_error_payload() {
        let payload = json!({"error": "Invalid API Key!"});
        assert!(matches!(
            parse_visual_passes(payload),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_visual_passes_without_passes() {
        let payload = json!({"info": {"satid": 20580, "satname": "HST", "passescount": 0}});
        let batch = parse_visual_passes(payload).unwrap();
        assert!(batch.passes.is_empty());
    }
}
