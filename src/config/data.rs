// src/config/data.rs
// DOCUMENTATION: Static place data loading
// PURPOSE: Read the place collection once at startup

use crate::config::Config;
use crate::errors::TravelError;
use crate::models::Place;
use serde_json::Value;
use std::fs;

/// Load the static place collection
/// DOCUMENTATION: Called once during application startup in main.rs
/// Records that cannot be decoded are skipped so one bad entry does not
/// take the listing down. Order of the file is preserved.
pub fn init_place_store(config: &Config) -> Result<Vec<Place>, TravelError> {
    log::info!("Loading place data: {}", config.places_data_path);

    let raw = fs::read_to_string(&config.places_data_path)
        .map_err(|e| TravelError::DataLoad(format!("{}: {}", config.places_data_path, e)))?;

    let places = parse_places(&raw)?;

    log::info!("Loaded {} places", places.len());
    Ok(places)
}

/// Decode a JSON array of place records
pub fn parse_places(raw: &str) -> Result<Vec<Place>, TravelError> {
    let records: Vec<Value> = serde_json::from_str(raw)
        .map_err(|e| TravelError::DataLoad(format!("expected a JSON array: {}", e)))?;

    let mut places = Vec::with_capacity(records.len());
    for (idx, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Place>(record) {
            Ok(place) => places.push(place),
            Err(e) => log::warn!("Skipping place record #{}: {}", idx, e),
        }
    }

    Ok(places)
}
