// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, load place data, and start HTTP server

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use config::Config;
use dotenv::dotenv;
use services::{FixedLocator, NearbySession, NominatimClient, OverpassClient, SessionSettings};
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        anyhow::bail!("invalid configuration: {}", e);
    }

    log::info!("Starting travel-places service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Load the static place collection
    let places = config::init_place_store(&config).context("loading place data")?;
    let places = web::Data::new(places);

    // 5. Build the nearby session and its remote collaborators
    let http_timeout = Duration::from_secs(config.http_timeout_secs);
    let overpass = OverpassClient::new(
        config.overpass_url.clone(),
        &config.http_user_agent,
        http_timeout,
        config.search_radius_m,
    )?;
    let nominatim = NominatimClient::new(
        config.nominatim_url.clone(),
        &config.http_user_agent,
        http_timeout,
    )?;

    let session = web::Data::new(NearbySession::new(
        Arc::new(overpass),
        Arc::new(nominatim),
        Arc::new(FixedLocator(config.device_location)),
        SessionSettings {
            poi_limit: config.poi_limit,
            fallback_center: config.fallback_center,
            locate_timeout: Duration::from_secs(config.locate_timeout_secs),
        },
    ));
    log::info!(
        "Nearby session ready (radius: {} m, limit: {} POIs)",
        config.search_radius_m,
        config.poi_limit
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            // Application state (places, config, and map session)
            .app_data(places.clone())
            .app_data(config.clone())
            .app_data(session.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::places_config)
            .configure(handlers::map_config)
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
