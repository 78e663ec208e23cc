// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use crate::models::Coordinate;
use dotenv::dotenv;
use std::env;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// JSON file holding the static place collection
    pub places_data_path: String,

    /// Maximum cards returned by the places filter
    pub result_limit: usize,

    /// Maximum POIs kept per nearby refresh
    pub poi_limit: usize,

    /// Overpass `around` radius in meters
    pub search_radius_m: u32,

    /// Overpass interpreter endpoint
    pub overpass_url: String,

    /// Nominatim search endpoint
    pub nominatim_url: String,

    /// User-Agent sent to the OpenStreetMap services
    pub http_user_agent: String,

    /// Per-request timeout for outbound HTTP in seconds
    pub http_timeout_secs: u64,

    /// How long the session waits for a device position fix
    pub locate_timeout_secs: u64,

    /// Map center used when no device position is available
    pub fallback_center: Coordinate,

    /// Optional "lat,lon" standing in for the device position
    pub device_location: Option<Coordinate>,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: parse_var("SERVER_PORT", 8003),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            places_data_path: env::var("PLACES_DATA_PATH")
                .unwrap_or_else(|_| "data/places.json".to_string()),

            result_limit: parse_var("RESULT_LIMIT", 3),

            poi_limit: parse_var("POI_LIMIT", 30),

            search_radius_m: parse_var("SEARCH_RADIUS_M", 1000),

            overpass_url: env::var("OVERPASS_URL")
                .unwrap_or_else(|_| "https://overpass-api.de/api/interpreter".to_string()),

            nominatim_url: env::var("NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org/search".to_string()),

            http_user_agent: env::var("HTTP_USER_AGENT").unwrap_or_else(|_| {
                format!("travel-places/{}", env!("CARGO_PKG_VERSION"))
            }),

            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", 10),

            locate_timeout_secs: parse_var("LOCATE_TIMEOUT_SECS", 5),

            fallback_center: Coordinate::new(
                parse_var("FALLBACK_LAT", 19.0760),
                parse_var("FALLBACK_LON", 72.8777),
            ),

            device_location: env::var("DEVICE_LOCATION")
                .ok()
                .and_then(|raw| parse_coordinate(&raw)),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.result_limit == 0 {
            return Err("RESULT_LIMIT must be at least 1".to_string());
        }

        if self.poi_limit == 0 {
            return Err("POI_LIMIT must be at least 1".to_string());
        }

        if !self.fallback_center.is_valid() {
            return Err(format!(
                "FALLBACK_LAT/FALLBACK_LON out of range: {}",
                self.fallback_center
            ));
        }

        if env::var("DEVICE_LOCATION").is_ok() && self.device_location.is_none() {
            log::warn!("DEVICE_LOCATION is not a valid \"lat,lon\" pair - ignoring it");
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse a "lat,lon" pair; out-of-range values are rejected
pub fn parse_coordinate(raw: &str) -> Option<Coordinate> {
    let (lat, lon) = raw.split_once(',')?;
    let coord = Coordinate::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
    coord.is_valid().then_some(coord)
}
