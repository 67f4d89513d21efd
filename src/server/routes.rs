//! Router configuration for Astro Portal.
//!
//! # Route Structure
//!
//! ```text
//! /            - Landing page
//! /apod/       - Astronomy Picture of the Day
//! /rover/      - Mars rover photos
//! /gallery/    - APOD date range gallery
//! /health      - Health check
//! (anything)   - 404 page
//! ```
//!
//! The section pages answer both with and without the trailing slash.
//!
//! # Example
//!
//! ```ignore
//! use astro_portal::client::NasaClient;
//! use astro_portal::server::{create_router, RouterConfig};
//!
//! let client = NasaClient::new("DEMO_KEY", DEFAULT_APOD_URL, DEFAULT_ROVER_URL)?;
//! let router = create_router(client, RouterConfig::new("my-secret"));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, router).await?;
//! ```

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    apod_handler, gallery_handler, health_handler, home_handler, not_found_handler,
    rover_handler, AppState,
};
use crate::client::SpaceApi;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Clone)]
pub struct RouterConfig {
    /// Secret used to sign the preference cookie
    pub secret_key: String,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with the given secret and tracing on.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            enable_tracing: true,
        }
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// # Arguments
///
/// * `client` - Remote API client used by the page handlers
/// * `config` - Router configuration
pub fn create_router<C: SpaceApi>(client: C, config: RouterConfig) -> Router {
    let app_state = AppState::new(client, config.secret_key.as_bytes());

    let router = Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/apod", get(apod_handler::<C>))
        .route("/apod/", get(apod_handler::<C>))
        .route("/rover", get(rover_handler::<C>))
        .route("/rover/", get(rover_handler::<C>))
        .route("/gallery", get(gallery_handler::<C>))
        .route("/gallery/", get(gallery_handler::<C>))
        .fallback(not_found_handler)
        .with_state(app_state);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

// =============================================================================
// Tests
// =============================================================================
