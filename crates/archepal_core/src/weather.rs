//! Current site conditions from a public forecast API.
//!
//! # Responsibility
//! - Validate coordinates and issue a single unauthenticated forecast GET.
//! - Decode the `current` block into typed [`SiteConditions`].
//!
//! # Invariants
//! - Out-of-range or non-finite coordinates never reach the network.
//! - No retry and no caching; each call is exactly one request.

use crate::config::WeatherConfig;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m,uv_index";

/// Current conditions at a site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteConditions {
    /// Degrees Celsius.
    pub temperature_c: f64,
    /// Percent.
    pub relative_humidity: f64,
    /// km/h.
    pub wind_speed_kmh: f64,
    pub uv_index: f64,
}

#[derive(Debug)]
pub enum WeatherError {
    InvalidCoordinates { latitude: f64, longitude: f64 },
    Http(reqwest::Error),
    Status { status: u16, reason: String },
    MissingField(&'static str),
}

impl Display for WeatherError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinates {
                latitude,
                longitude,
            } => write!(f, "invalid coordinates: {latitude}, {longitude}"),
            Self::Http(err) => write!(f, "weather request failed: {err}"),
            Self::Status { status, reason } => {
                write!(f, "Weather service error: {status} {reason}")
            }
            Self::MissingField(field) => {
                write!(f, "No current weather data available (missing `{field}`)")
            }
        }
    }
}

impl Error for WeatherError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Forecast API client.
pub struct WeatherClient {
    http: reqwest::Client,
    api_base: String,
}

impl WeatherClient {
    pub fn new(cfg: &WeatherConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self {
            http,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches current conditions for a coordinate pair.
    ///
    /// # Errors
    /// - `InvalidCoordinates` before any request when the pair is out of range.
    /// - `Http` for transport failures and timeouts.
    /// - `Status` for non-success responses.
    /// - `MissingField` when the payload lacks `current` or one of its fields.
    pub async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<SiteConditions, WeatherError> {
        validate_coordinates(latitude, longitude)?;

        let url = forecast_url(&self.api_base, latitude, longitude);
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                "event=weather_fetch module=weather status=error http_status={}",
                status.as_u16()
            );
            return Err(WeatherError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let conditions = parse_current_conditions(&payload)?;
        debug!("event=weather_fetch module=weather status=ok");
        Ok(conditions)
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
    let valid = latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude);
    if valid {
        Ok(())
    } else {
        Err(WeatherError::InvalidCoordinates {
            latitude,
            longitude,
        })
    }
}

pub fn forecast_url(api_base: &str, latitude: f64, longitude: f64) -> String {
    format!(
        "{}/v1/forecast?latitude={latitude}&longitude={longitude}&current={CURRENT_FIELDS}",
        api_base.trim_end_matches('/')
    )
}

pub fn parse_current_conditions(payload: &serde_json::Value) -> Result<SiteConditions, WeatherError> {
    let current = payload
        .get("current")
        .filter(|value| value.is_object())
        .ok_or(WeatherError::MissingField("current"))?;
    let field = |name: &'static str| {
        current
            .get(name)
            .and_then(|value| value.as_f64())
            .ok_or(WeatherError::MissingField(name))
    };

    Ok(SiteConditions {
        temperature_c: field("temperature_2m")?,
        relative_humidity: field("relative_humidity_2m")?,
        wind_speed_kmh: field("wind_speed_10m")?,
        uv_index: field("uv_index")?,
    })
}
