//! HTTPS client for api.nasa.gov.
//!
//! Each operation is a single GET carrying the `api_key` query parameter plus
//! resource-specific parameters. Any non-2xx status is reported as
//! [`ApiError::Status`] after logging the rate-limit header and the start of
//! the body.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::types::{ApodItem, RoverPhoto};
use super::SpaceApi;
use crate::dates::DATE_FORMAT;
use crate::error::ApiError;

/// Timeout for single-day APOD lookups.
pub const APOD_TIMEOUT: Duration = Duration::from_secs(15);

/// Timeout for APOD range lookups.
pub const APOD_RANGE_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeout for rover photo lookups.
pub const ROVER_TIMEOUT: Duration = Duration::from_secs(20);

/// How much of an error body is written to the log.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 300;

#[derive(Deserialize)]
struct PhotosEnvelope {
    #[serde(default)]
    photos: Vec<RoverPhoto>,
}

#[derive(Deserialize)]
struct LatestPhotosEnvelope {
    #[serde(default)]
    latest_photos: Vec<RoverPhoto>,
}

/// reqwest-backed [`SpaceApi`] implementation.
#[derive(Clone)]
pub struct NasaClient {
    http: reqwest::Client,
    api_key: String,
    apod_url: Url,
    rover_url: Url,
}

impl NasaClient {
    /// Create a client for the given API key and endpoint roots.
    ///
    /// # Arguments
    /// * `api_key` - Key sent as `api_key` on every request (trimmed)
    /// * `apod_url` - APOD endpoint, e.g. `https://api.nasa.gov/planetary/apod`
    /// * `rover_url` - Rover API root, e.g. `https://api.nasa.gov/mars-photos/api/v1`
    pub fn new(
        api_key: impl Into<String>,
        apod_url: &str,
        rover_url: &str,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("astro-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Connection(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: api_key.into().trim().to_string(),
            apod_url: parse_base(apod_url)?,
            rover_url: parse_base(rover_url)?,
        })
    }

    /// Get the APOD endpoint.
    pub fn apod_url(&self) -> &Url {
        &self.apod_url
    }

    /// Build `{rover_url}/rovers/{rover}/{leaf}` with the rover name
    /// percent-encoded as a path segment.
    pub fn rover_endpoint(&self, rover: &str, leaf: &str) -> Result<Url, ApiError> {
        let mut url = self.rover_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.rover_url.to_string()))?;
            segments.pop_if_empty().extend(["rovers", rover, leaf]);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len() + 1);
        query.push(("api_key", self.api_key.as_str()));
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        debug!(url = %url, params = ?params, "Requesting remote API");

        let response = self
            .http
            .get(url.clone())
            .query(&query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(e, &url, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let remaining = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_string();
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();

            warn!(
                status = status.as_u16(),
                rate_limit_remaining = %remaining,
                url = %url,
                "Remote API returned an error: {}",
                preview
            );

            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| request_error(e, &url, timeout))
    }
}

#[async_trait]
impl SpaceApi for NasaClient {
    async fn apod(&self, date: Option<NaiveDate>, thumbs: bool) -> Result<ApodItem, ApiError> {
        let mut params = vec![("thumbs", thumbs.to_string())];
        if let Some(date) = date {
            params.push(("date", date.format(DATE_FORMAT).to_string()));
        }

        self.get_json(self.apod_url.clone(), &params, APOD_TIMEOUT)
            .await
    }

    async fn apod_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        thumbs: bool,
    ) -> Result<Vec<ApodItem>, ApiError> {
        let params = [
            ("start_date", start.format(DATE_FORMAT).to_string()),
            ("end_date", end.format(DATE_FORMAT).to_string()),
            ("thumbs", thumbs.to_string()),
        ];

        let value: Value = self
            .get_json(self.apod_url.clone(), &params, APOD_RANGE_TIMEOUT)
            .await?;

        apod_list_from_value(value).map_err(|message| ApiError::Decode {
            url: self.apod_url.to_string(),
            message,
        })
    }

    async fn latest_rover_photos(&self, rover: &str) -> Result<Vec<RoverPhoto>, ApiError> {
        let url = self.rover_endpoint(rover, "latest_photos")?;
        let envelope: LatestPhotosEnvelope = self.get_json(url, &[], ROVER_TIMEOUT).await?;
        Ok(envelope.latest_photos)
    }

    async fn rover_photos_by_sol(
        &self,
        rover: &str,
        sol: i64,
        camera: Option<&str>,
    ) -> Result<Vec<RoverPhoto>, ApiError> {
        let url = self.rover_endpoint(rover, "photos")?;
        let mut params = vec![("sol", sol.to_string())];
        if let Some(camera) = camera {
            params.push(("camera", camera.to_string()));
        }

        let envelope: PhotosEnvelope = self.get_json(url, &params, ROVER_TIMEOUT).await?;
        Ok(envelope.photos)
    }

    async fn rover_photos_by_earth_date(
        &self,
        rover: &str,
        earth_date: &str,
        camera: Option<&str>,
    ) -> Result<Vec<RoverPhoto>, ApiError> {
        let url = self.rover_endpoint(rover, "photos")?;
        let mut params = vec![("earth_date", earth_date.to_string())];
        if let Some(camera) = camera {
            params.push(("camera", camera.to_string()));
        }

        let envelope: PhotosEnvelope = self.get_json(url, &params, ROVER_TIMEOUT).await?;
        Ok(envelope.photos)
    }
}

fn parse_base(value: &str) -> Result<Url, ApiError> {
    Url::parse(value).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", value, e)))
}

fn request_error(err: reqwest::Error, url: &Url, timeout: Duration) -> ApiError {
    // The request URL carries the API key.
    let err = err.without_url();
    if err.is_timeout() {
        ApiError::Timeout {
            url: url.to_string(),
            seconds: timeout.as_secs(),
        }
    } else if err.is_decode() {
        ApiError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else {
        ApiError::Connection(err.to_string())
    }
}

/// Shape a range response into a list.
///
/// The API answers a one-day range with a bare object instead of an array.
pub(crate) fn apod_list_from_value(value: Value) -> Result<Vec<ApodItem>, String> {
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(|e| e.to_string()),
        Value::Object(_) => serde_json::from_value(value)
            .map(|item| vec![item])
            .map_err(|e| e.to_string()),
        other => Err(format!("expected an object or array, got {}", other)),
    }
}
