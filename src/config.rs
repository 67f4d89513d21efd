//! Configuration management for Astro Portal.
//!
//! Settings come from command-line arguments via clap, with environment
//! variable fallbacks and defaults for everything optional.
//!
//! # Environment Variables
//!
//! - `ASTRO_HOST` - Server bind address (default: 0.0.0.0)
//! - `ASTRO_PORT` - Server port (default: 5000)
//! - `NASA_API_KEY` - API key for api.nasa.gov (default: DEMO_KEY)
//! - `SECRET_KEY` - Secret used to sign the preference cookie (random if unset)
//! - `ASTRO_APOD_URL` - APOD endpoint
//! - `ASTRO_ROVER_URL` - Mars rover photos API root

use clap::Parser;
use url::Url;

use crate::error::ConfigError;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Shared demo key accepted by api.nasa.gov (heavily rate limited).
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Default APOD endpoint.
pub const DEFAULT_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Default Mars rover photos API root.
pub const DEFAULT_ROVER_URL: &str = "https://api.nasa.gov/mars-photos/api/v1";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Astro Portal - browse NASA's Astronomy Picture of the Day and Mars rover photos.
#[derive(Parser, Debug, Clone)]
#[command(name = "astro-portal")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "ASTRO_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "ASTRO_PORT")]
    pub port: u16,

    // =========================================================================
    // Remote API Configuration
    // =========================================================================
    /// API key sent with every request to api.nasa.gov.
    #[arg(long, default_value = DEMO_API_KEY, env = "NASA_API_KEY")]
    pub api_key: String,

    /// APOD endpoint URL.
    #[arg(long, default_value = DEFAULT_APOD_URL, env = "ASTRO_APOD_URL")]
    pub apod_url: String,

    /// Mars rover photos API root URL.
    #[arg(long, default_value = DEFAULT_ROVER_URL, env = "ASTRO_ROVER_URL")]
    pub rover_url: String,

    // =========================================================================
    // Session Configuration
    // =========================================================================
    /// Secret used to sign the preference cookie.
    ///
    /// If not provided, a random secret is generated at startup, which
    /// invalidates existing cookies on every restart.
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        validate_base_url("apod_url", &self.apod_url)?;
        validate_base_url("rover_url", &self.rover_url)?;

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The API key with surrounding whitespace removed.
    pub fn api_key(&self) -> &str {
        self.api_key.trim()
    }

    /// Whether the shared demo key is in use.
    pub fn uses_demo_key(&self) -> bool {
        self.api_key() == DEMO_API_KEY
    }

    /// Return the configured secret, or generate a random one.
    ///
    /// The boolean is `true` when the secret was generated.
    pub fn secret_or_random(&self) -> (String, bool) {
        match self.secret_key.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => (secret.to_string(), false),
            _ => (random_secret(), true),
        }
    }
}

/// 64 hex characters drawn from two random v4 UUIDs.
fn random_secret() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

fn validate_base_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        name,
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

// =============================================================================
// Tests
// =============================================================================
