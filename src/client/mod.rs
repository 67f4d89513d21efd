//! Remote imagery API access.
//!
//! Handlers never talk to the network directly. They go through the
//! [`SpaceApi`] trait, which [`NasaClient`] implements over HTTPS and test
//! doubles implement in memory.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Presentation handlers            │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            SpaceApi trait               │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │   NasaClient (reqwest, api_key query)   │
//! └─────────────────────────────────────────┘
//! ```

mod nasa;
mod types;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ApiError;

pub use nasa::{
    NasaClient, APOD_RANGE_TIMEOUT, APOD_TIMEOUT, ERROR_BODY_PREVIEW_CHARS, ROVER_TIMEOUT,
};
pub use types::{ApodItem, CameraInfo, MediaType, RoverInfo, RoverPhoto};

/// Read-only operations against the space imagery API.
///
/// Every operation issues exactly one request. Failures of any kind come back
/// as a single [`ApiError`]; there is no retry.
#[async_trait]
pub trait SpaceApi: Send + Sync + 'static {
    /// Fetch one APOD entry. `None` asks for the most recent entry.
    async fn apod(&self, date: Option<NaiveDate>, thumbs: bool) -> Result<ApodItem, ApiError>;

    /// Fetch every APOD entry between `start` and `end`, inclusive.
    ///
    /// Always returns a list, even when the remote answers with one object.
    async fn apod_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        thumbs: bool,
    ) -> Result<Vec<ApodItem>, ApiError>;

    /// Fetch the most recent photos taken by `rover`.
    async fn latest_rover_photos(&self, rover: &str) -> Result<Vec<RoverPhoto>, ApiError>;

    /// Fetch photos taken by `rover` on mission day `sol`.
    async fn rover_photos_by_sol(
        &self,
        rover: &str,
        sol: i64,
        camera: Option<&str>,
    ) -> Result<Vec<RoverPhoto>, ApiError>;

    /// Fetch photos taken by `rover` on an Earth calendar date.
    async fn rover_photos_by_earth_date(
        &self,
        rover: &str,
        earth_date: &str,
        camera: Option<&str>,
    ) -> Result<Vec<RoverPhoto>, ApiError>;
}
