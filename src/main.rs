//! Astro Portal - browse NASA imagery in the browser.
//!
//! This binary parses configuration, builds the API client and serves the
//! HTML front-end.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use astro_portal::{
    config::Config,
    server::{create_router, RouterConfig},
    NasaClient,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    run_serve(config).await
}

async fn run_serve(config: Config) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Astro Portal v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  APOD endpoint: {}", config.apod_url);
    info!("  Rover endpoint: {}", config.rover_url);

    if config.uses_demo_key() {
        warn!("  API key: DEMO_KEY - requests are heavily rate limited");
        warn!("           Get a personal key at https://api.nasa.gov and set NASA_API_KEY");
    } else {
        info!("  API key: configured");
    }

    let (secret, generated) = config.secret_or_random();
    if generated {
        warn!("  Session secret: RANDOM - preference cookies reset on every restart");
        warn!("                  Set SECRET_KEY for production use");
    } else {
        info!("  Session secret: configured");
    }

    let client = match NasaClient::new(config.api_key(), &config.apod_url, &config.rover_url) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let router_config = RouterConfig::new(secret).with_tracing(!config.no_tracing);
    let router = create_router(client, router_config);

    let addr = config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("    open http://{}/apod/", addr);
    info!("    open http://{}/rover/?mode=latest&rover=curiosity", addr);
    info!("");

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "astro_portal=debug,tower_http=debug"
    } else {
        "astro_portal=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
