//! HTTP request handlers for Astro Portal.
//!
//! # Endpoints
//!
//! - `GET /` - Landing page
//! - `GET /apod/` - Astronomy Picture of the Day
//! - `GET /rover/` - Mars rover photos
//! - `GET /gallery/` - APOD entries for a date range
//! - `GET /health` - Health check endpoint
//!
//! Page handlers always answer `200 OK`. Bad query parameters become notices
//! on the page, and remote failures become one generic notice per resource;
//! the underlying error is only logged.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{OriginalUri, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::pages::{self, ApodView, GalleryView, Notice, RoverView, ROVERS};
use super::session::{SessionSigner, ROVER_COOKIE};
use crate::client::{ApodItem, RoverPhoto, SpaceApi};
use crate::dates::{self, DateParam, DATE_FORMAT};
use crate::error::ApiError;

/// Thumbnails are always requested so video entries have a still image.
pub const REQUEST_THUMBNAILS: bool = true;

/// Rover shown when none is requested or remembered.
pub const DEFAULT_ROVER: &str = "curiosity";

pub const INVALID_APOD_DATE: &str =
    "Invalid APOD date: use YYYY-MM-DD between 1995-06-16 and today";
pub const INVALID_START_DATE: &str =
    "Invalid start_date: use YYYY-MM-DD between 1995-06-16 and today";
pub const INVALID_END_DATE: &str =
    "Invalid end_date: use YYYY-MM-DD between 1995-06-16 and today";
pub const DATES_SWAPPED: &str = "Dates swapped to form a valid range";
pub const APOD_FAILED: &str = "Failed to load APOD";
pub const ROVER_FAILED: &str = "Failed to load Mars photos";
pub const GALLERY_FAILED: &str = "Failed to load APOD gallery";

// =============================================================================
// Application State
// =============================================================================

/// Shared application state.
///
/// Holds the remote API client and the cookie signer; both are read-only
/// after startup.
pub struct AppState<C: SpaceApi> {
    pub client: Arc<C>,
    pub signer: SessionSigner,
}

impl<C: SpaceApi> AppState<C> {
    pub fn new(client: C, secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            client: Arc::new(client),
            signer: SessionSigner::new(secret_key),
        }
    }
}

impl<C: SpaceApi> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            signer: self.signer.clone(),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Decoded query string where a repeated key keeps its first value.
///
/// Parsing never fails; unknown keys are ignored.
#[derive(Debug, Default)]
pub struct QueryArgs(HashMap<String, String>);

impl QueryArgs {
    pub fn parse(raw: Option<&str>) -> Self {
        let mut args = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
            args.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        Self(args)
    }

    pub fn take(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }
}

/// Query parameters for the APOD page.
#[derive(Debug, Default)]
pub struct ApodQueryParams {
    pub date: Option<String>,
}

impl ApodQueryParams {
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut args = QueryArgs::parse(raw);
        Self {
            date: args.take("date"),
        }
    }
}

/// Query parameters for the rover page.
///
/// Every field is taken as a raw string so malformed values (e.g. a
/// non-numeric sol) degrade to defaults instead of rejecting the request.
#[derive(Debug, Default)]
pub struct RoverQueryParams {
    pub rover: Option<String>,

    /// `latest` (default), `sol`, or `earth_date`
    pub mode: Option<String>,

    pub camera: Option<String>,

    pub sol: Option<String>,

    pub earth_date: Option<String>,
}

/// Query parameters for the gallery page.
#[derive(Debug, Default)]
pub struct GalleryQueryParams {
    pub start_date: Option<String>,

    pub end_date: Option<String>,
}

impl GalleryQueryParams {
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut args = QueryArgs::parse(raw);
        Self {
            start_date: args.take("start_date"),
            end_date: args.take("end_date"),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Which rover lookup a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoverQuery {
    Latest,
    BySol { sol: i64, camera: Option<String> },
    ByEarthDate { earth_date: String, camera: Option<String> },
}

impl RoverQueryParams {
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut args = QueryArgs::parse(raw);
        Self {
            rover: args.take("rover"),
            mode: args.take("mode"),
            camera: args.take("camera"),
            sol: args.take("sol"),
            earth_date: args.take("earth_date"),
        }
    }

    /// Pick the lookup. Unknown modes, and modes missing their argument,
    /// fall back to the latest photos.
    pub fn query(&self) -> RoverQuery {
        let camera = non_empty(self.camera.as_deref()).map(str::to_string);
        let sol = non_empty(self.sol.as_deref()).and_then(|s| s.parse::<i64>().ok());
        let earth_date = non_empty(self.earth_date.as_deref());

        match (self.mode(), sol, earth_date) {
            ("sol", Some(sol), _) => RoverQuery::BySol { sol, camera },
            ("earth_date", _, Some(earth_date)) => RoverQuery::ByEarthDate {
                earth_date: earth_date.to_string(),
                camera,
            },
            _ => RoverQuery::Latest,
        }
    }

    /// Requested mode, `latest` when absent.
    pub fn mode(&self) -> &str {
        non_empty(self.mode.as_deref()).unwrap_or("latest")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn log_remote_failure(resource: &'static str, err: &ApiError) {
    error!(resource = resource, "Remote API call failed: {}", err);
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle landing page requests.
///
/// # Endpoint
///
/// `GET /`
pub async fn home_handler() -> Html<String> {
    Html(pages::home_page())
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle APOD requests.
///
/// # Endpoint
///
/// `GET /apod/?date=YYYY-MM-DD`
///
/// An invalid date is dropped with a warning and the most recent entry is
/// shown instead.
pub async fn apod_handler<C: SpaceApi>(
    State(state): State<AppState<C>>,
    RawQuery(raw): RawQuery,
) -> Html<String> {
    let params = ApodQueryParams::from_query(raw.as_deref());
    let today = dates::today();
    let mut notices = Vec::new();

    let date = match DateParam::check(params.date.as_deref(), today) {
        DateParam::Valid(date) => Some(date),
        DateParam::Absent => None,
        DateParam::Invalid => {
            warn!(date = ?params.date, "Rejected APOD date");
            notices.push(Notice::error(INVALID_APOD_DATE));
            None
        }
    };

    let item = match state.client.apod(date, REQUEST_THUMBNAILS).await {
        Ok(item) => Some(item),
        Err(e) => {
            log_remote_failure("apod", &e);
            notices.push(Notice::error(APOD_FAILED));
            None
        }
    };

    Html(pages::apod_page(&ApodView {
        item,
        date_input: date.map(format_date).unwrap_or_default(),
        max_date: format_date(today),
        notices,
    }))
}

/// Handle Mars rover photo requests.
///
/// # Endpoint
///
/// `GET /rover/?rover=<name>&mode=latest|sol|earth_date&camera=<name>&sol=<int>&earth_date=YYYY-MM-DD`
///
/// When `rover` is absent, the rover remembered in the signed preference
/// cookie is used, then [`DEFAULT_ROVER`]. The response refreshes the cookie
/// for known rovers.
pub async fn rover_handler<C: SpaceApi>(
    State(state): State<AppState<C>>,
    RawQuery(raw): RawQuery,
    headers: HeaderMap,
) -> Response {
    let params = RoverQueryParams::from_query(raw.as_deref());
    let rover = non_empty(params.rover.as_deref())
        .or_else(|| state.signer.read_cookie(&headers, ROVER_COOKIE))
        .unwrap_or(DEFAULT_ROVER)
        .to_lowercase();

    let query = params.query();
    debug!(rover = %rover, query = ?query, "Rover photo lookup");

    let result: Result<Vec<RoverPhoto>, ApiError> = match &query {
        RoverQuery::Latest => state.client.latest_rover_photos(&rover).await,
        RoverQuery::BySol { sol, camera } => {
            state
                .client
                .rover_photos_by_sol(&rover, *sol, camera.as_deref())
                .await
        }
        RoverQuery::ByEarthDate { earth_date, camera } => {
            state
                .client
                .rover_photos_by_earth_date(&rover, earth_date, camera.as_deref())
                .await
        }
    };

    let mut notices = Vec::new();
    let photos = result.unwrap_or_else(|e| {
        log_remote_failure("rover", &e);
        notices.push(Notice::error(ROVER_FAILED));
        Vec::new()
    });

    let html = pages::rover_page(&RoverView {
        photos,
        mode: params.mode().to_string(),
        camera: non_empty(params.camera.as_deref()).unwrap_or("").to_string(),
        sol: non_empty(params.sol.as_deref()).unwrap_or("").to_string(),
        earth_date: non_empty(params.earth_date.as_deref())
            .unwrap_or("")
            .to_string(),
        rover: rover.clone(),
        notices,
    });

    let mut response = Html(html).into_response();
    if ROVERS.contains(&rover.as_str()) {
        if let Some(cookie) = state.signer.cookie_header(ROVER_COOKIE, &rover) {
            response.headers_mut().insert(header::SET_COOKIE, cookie);
        }
    }
    response
}

/// Handle APOD gallery requests.
///
/// # Endpoint
///
/// `GET /gallery/?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD`
///
/// Both bounds must be valid for the remote call to happen. Inverted bounds
/// are swapped. Results are shown newest first.
pub async fn gallery_handler<C: SpaceApi>(
    State(state): State<AppState<C>>,
    RawQuery(raw): RawQuery,
) -> Html<String> {
    let params = GalleryQueryParams::from_query(raw.as_deref());
    let today = dates::today();
    let check = dates::normalize_range(
        params.start_date.as_deref(),
        params.end_date.as_deref(),
        today,
    );

    let mut notices = Vec::new();
    if check.start_invalid {
        warn!(start_date = ?params.start_date, "Rejected gallery start date");
        notices.push(Notice::error(INVALID_START_DATE));
    }
    if check.end_invalid {
        warn!(end_date = ?params.end_date, "Rejected gallery end date");
        notices.push(Notice::error(INVALID_END_DATE));
    }
    if check.swapped {
        notices.push(Notice::info(DATES_SWAPPED));
    }

    let range = check.range();
    let mut items: Vec<ApodItem> = Vec::new();
    if let Some(range) = range {
        match state
            .client
            .apod_range(range.start, range.end, REQUEST_THUMBNAILS)
            .await
        {
            Ok(mut fetched) => {
                sort_newest_first(&mut fetched);
                items = fetched;
            }
            Err(e) => {
                log_remote_failure("gallery", &e);
                notices.push(Notice::error(GALLERY_FAILED));
            }
        }
    }

    let echo = |validated: Option<NaiveDate>, raw: &Option<String>| {
        validated
            .map(format_date)
            .or_else(|| raw.clone())
            .unwrap_or_default()
    };

    Html(pages::gallery_page(&GalleryView {
        items,
        start_date: echo(check.start, &params.start_date),
        end_date: echo(check.end, &params.end_date),
        max_date: format_date(today),
        queried: range.is_some(),
        notices,
    }))
}

/// Handle requests for unknown routes.
pub async fn not_found_handler(OriginalUri(uri): OriginalUri) -> (StatusCode, Html<String>) {
    debug!(path = %uri.path(), "Route not found");
    (StatusCode::NOT_FOUND, Html(pages::not_found_page(uri.path())))
}

/// Sort APOD entries by date, newest first.
///
/// Dates are `YYYY-MM-DD`, so string order is chronological.
pub fn sort_newest_first(items: &mut [ApodItem]) {
    items.sort_by(|a, b| b.date.cmp(&a.date));
}

// =============================================================================
// Tests
// =============================================================================
