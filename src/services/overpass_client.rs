// src/services/overpass_client.rs
// DOCUMENTATION: Overpass API client
// PURPOSE: Query OpenStreetMap nodes of one category around a point

use crate::errors::TravelError;
use crate::models::{Coordinate, OsmTag, Poi, PoiCategory};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Source of nearby points of interest
/// DOCUMENTATION: Seam between the nearby session and the remote service
#[async_trait]
pub trait PoiSource: Send + Sync {
    async fn nearby(
        &self,
        center: Coordinate,
        category: PoiCategory,
    ) -> Result<Vec<Poi>, TravelError>;
}

/// Overpass interpreter client
pub struct OverpassClient {
    /// HTTP client for making requests
    client: Client,
    /// Interpreter endpoint, e.g. https://overpass-api.de/api/interpreter
    base_url: String,
    /// `around` radius in meters
    radius_m: u32,
}

/// Response envelope from the interpreter
#[derive(Debug, Deserialize)]
struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

/// Single element; ways and relations carry no lat/lon with plain `out`
#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

impl OverpassElement {
    fn into_poi(self) -> Option<Poi> {
        Some(Poi {
            id: self.id,
            lat: self.lat?,
            lon: self.lon?,
            tags: self.tags,
        })
    }
}

impl OverpassClient {
    /// Create new Overpass client
    pub fn new(
        base_url: String,
        user_agent: &str,
        timeout: Duration,
        radius_m: u32,
    ) -> Result<Self, TravelError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| TravelError::NetworkFailure(format!("HTTP client setup: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            radius_m,
        })
    }

    /// Overpass QL for nodes tagged `key=value` within `radius_m` of `center`
    pub fn build_query(tag: &OsmTag, center: Coordinate, radius_m: u32) -> String {
        format!(
            "[out:json];node[\"{}\"=\"{}\"](around:{},{},{});out;",
            tag.key, tag.value, radius_m, center.lat, center.lon
        )
    }

    /// Fetch nodes of `category` around `center`
    /// DOCUMENTATION: Returns every element with coordinates, in response
    /// order. Capping is left to the caller.
    pub async fn fetch_nearby(
        &self,
        center: Coordinate,
        category: PoiCategory,
    ) -> Result<Vec<Poi>, TravelError> {
        let query = Self::build_query(&category.tag, center, self.radius_m);

        log::debug!(
            "Overpass nearby search: category={}, center={}, radius={}",
            category.label,
            center,
            self.radius_m
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| {
                log::error!("Overpass request failed: {}", e);
                TravelError::NetworkFailure(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Overpass error {}: {}", status, body);
            return Err(TravelError::NetworkFailure(format!(
                "Overpass error {}",
                status
            )));
        }

        let parsed: OverpassResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Overpass response: {}", e);
            TravelError::NetworkFailure(format!("Parse error: {}", e))
        })?;

        let pois: Vec<Poi> = parsed
            .elements
            .into_iter()
            .filter_map(OverpassElement::into_poi)
            .collect();

        log::info!("Overpass returned {} {} nodes", pois.len(), category.label);
        Ok(pois)
    }
}

#[async_trait]
impl PoiSource for OverpassClient {
    async fn nearby(
        &self,
        center: Coordinate,
        category: PoiCategory,
    ) -> Result<Vec<Poi>, TravelError> {
        self.fetch_nearby(center, category).await
    }
}
