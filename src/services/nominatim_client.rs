// src/services/nominatim_client.rs
// DOCUMENTATION: Nominatim geocoding client
// PURPOSE: Turn a free-text place name into coordinates

use crate::errors::TravelError;
use crate::models::Coordinate;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::num::NonZeroU32;
use std::time::Duration;

/// Free-text to coordinate resolution
/// DOCUMENTATION: Ok(None) means the service answered with zero results
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, text: &str) -> Result<Option<Coordinate>, TravelError>;
}

/// Nominatim search client
/// DOCUMENTATION: The public instance allows one request per second, so
/// calls wait on a rate limiter instead of failing.
pub struct NominatimClient {
    client: Client,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

/// One search hit; coordinates arrive string-encoded
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimClient {
    pub fn new(base_url: String, user_agent: &str, timeout: Duration) -> Result<Self, TravelError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| TravelError::NetworkFailure(format!("HTTP client setup: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            limiter: RateLimiter::direct(Quota::per_second(NonZeroU32::MIN)),
        })
    }

    /// Search for `text` and return the first hit
    pub async fn search(&self, text: &str) -> Result<Option<Coordinate>, TravelError> {
        self.limiter.until_ready().await;

        log::debug!("Nominatim search: q={}", text);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("format", "json"), ("q", text)])
            .send()
            .await
            .map_err(|e| {
                log::error!("Nominatim request failed: {}", e);
                TravelError::NetworkFailure(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            log::error!("Nominatim error {}", status);
            return Err(TravelError::NetworkFailure(format!(
                "Nominatim error {}",
                status
            )));
        }

        let hits: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            log::error!("Failed to parse Nominatim response: {}", e);
            TravelError::NetworkFailure(format!("Parse error: {}", e))
        })?;

        let Some(first) = hits.into_iter().next() else {
            log::info!("Nominatim found nothing for {:?}", text);
            return Ok(None);
        };

        let coordinate = parse_hit(&first)?;
        log::info!(
            "Nominatim resolved {:?} to {} ({})",
            text,
            coordinate,
            first.display_name.as_deref().unwrap_or("unnamed")
        );
        Ok(Some(coordinate))
    }
}

fn parse_hit(hit: &NominatimPlace) -> Result<Coordinate, TravelError> {
    let lat = hit.lat.trim().parse::<f64>();
    let lon = hit.lon.trim().parse::<f64>();

    match (lat, lon) {
        (Ok(lat), Ok(lon)) if Coordinate::new(lat, lon).is_valid() => Ok(Coordinate::new(lat, lon)),
        _ => {
            log::error!("Nominatim returned bad coordinates: {:?}", hit);
            Err(TravelError::NetworkFailure(format!(
                "Bad coordinates: {}, {}",
                hit.lat, hit.lon
            )))
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, text: &str) -> Result<Option<Coordinate>, TravelError> {
        self.search(text).await
    }
}
