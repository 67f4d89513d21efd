//! # Astro Portal
//!
//! A thin HTML front-end for three read-only NASA imagery endpoints: the
//! Astronomy Picture of the Day, APOD date ranges, and Mars rover photos.
//!
//! Every page request is one pass of "validate query parameters, call one
//! remote endpoint, render HTML". Nothing is cached or stored.
//!
//! ## Architecture
//!
//! - [`config`] - CLI and environment configuration
//! - [`dates`] - APOD date validation and range normalization
//! - [`client`] - The [`SpaceApi`] trait and its HTTPS implementation
//! - [`server`] - Axum router, page handlers, HTML rendering, signed cookies
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use astro_portal::{create_router, NasaClient, RouterConfig};
//! use astro_portal::config::{DEFAULT_APOD_URL, DEFAULT_ROVER_URL};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = NasaClient::new("DEMO_KEY", DEFAULT_APOD_URL, DEFAULT_ROVER_URL).unwrap();
//!     let router = create_router(client, RouterConfig::new("change-me"));
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod client;
pub mod config;
pub mod dates;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use client::{ApodItem, CameraInfo, MediaType, NasaClient, RoverInfo, RoverPhoto, SpaceApi};
pub use config::Config;
pub use dates::{normalize_range, validate_date, DateParam, DateRange, RangeCheck, ARCHIVE_START};
pub use error::{ApiError, ConfigError};
pub use server::{create_router, AppState, Notice, NoticeLevel, RouterConfig, SessionSigner};
