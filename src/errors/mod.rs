/// Unified error handling module
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Failure of an upstream data source (NOAA, DONKI, N2YO).
///
/// Never reaches API callers for the weather feeds: the aggregator swaps in
/// a default and logs the failure instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Malformed(err.to_string())
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Rejected input to one of the classification functions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Kp index must be a finite number, got {0}")]
    NonFiniteKp(f64),
    #[error("flare scale must be a positive number, got {0}")]
    FlareScale(f64),
    #[error("CME speed must be a positive number of km/s, got {0}")]
    CmeSpeed(f64),
    #[error("CME impact probability must lie in [0, 1], got {0}")]
    ImpactProbability(f64),
    #[error("pass must end after it starts")]
    PassWindow,
    #[error("pass peak must fall between its start and end")]
    PassPeak,
    #[error("pass duration must be positive")]
    ZeroDuration,
    #[error("magnitude must be a finite number")]
    NonFiniteMagnitude,
    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl ValidationError {
    /// Check that `value` lies in the closed range `[min, max]`.
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), Self> {
        // NaN fails both comparisons, so it is rejected here too
        if value >= min && value <= max {
            Ok(())
        } else {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            })
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::InvalidInput(_) | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", self.to_string())
            }
        };

        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_inclusive_bounds() {
        assert!(ValidationError::check_range("elevation", 0.0, 0.0, 90.0).is_ok());
        assert!(ValidationError::check_range("elevation", 90.0, 0.0, 90.0).is_ok());
    }

    #[test]
    fn test_check_range_rejects_nan() {
        let err = ValidationError::check_range("azimuth", f64::NAN, 0.0, 360.0).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "azimuth", .. }));
    }

    #[test]
    fn test_out_of_range_message_names_field() {
        let err = ValidationError::check_range("latitude", 91.0, -90.0, 90.0).unwrap_err();
        assert_eq!(err.to_string(), "latitude must lie in [-90, 90], got 91");
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let response = ApiError::from(ValidationError::PassWindow).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_input_envelope_text() {
        let response = ApiError::from(ValidationError::PassWindow).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(body["error"]["message"], "Invalid input: pass must end after it starts");
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = ApiError::BadRequest("missing field `lat`".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("Satellite 'FOO' not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
