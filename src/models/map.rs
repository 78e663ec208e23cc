// src/models/map.rs
// DOCUMENTATION: Data structures for the nearby map page
// PURPOSE: Coordinates, POIs, session view state and map API DTOs

use super::PoiCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

/// Zoom level the map recenters to after every move
pub const DEFAULT_ZOOM: u8 = 14;

/// Geographic point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance in kilometers (haversine)
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);

        EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

impl From<Coordinate> for geo_types::Point<f64> {
    fn from(coord: Coordinate) -> Self {
        geo_types::Point::new(coord.lon, coord.lat)
    }
}

/// Point of interest returned by the spatial query service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Poi {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// `name` tag, or the category label for unnamed nodes
    pub fn label<'a>(&'a self, category: &'a PoiCategory) -> &'a str {
        self.tags
            .get("name")
            .map(String::as_str)
            .unwrap_or(category.label)
    }
}

/// The single mutable point of truth of the map page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapViewState {
    pub center: Coordinate,
    pub category: PoiCategory,
}

/// Lifecycle of the nearby session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Locating,
    Ready,
    Refreshing,
    Error,
}

/// One POI row of the sidebar
#[derive(Debug, Clone, Serialize)]
pub struct PoiView {
    pub id: u64,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_km: f64,
}

/// Response of GET /map
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshot {
    pub status: SessionStatus,
    pub center: Coordinate,
    pub zoom: u8,
    pub category: &'static str,
    pub pois: Vec<PoiView>,

    /// Last user-facing notice, e.g. "Location not found"
    pub notice: Option<String>,

    /// Last refresh failure while stale results are shown
    pub last_error: Option<String>,
}

/// Body of PUT /map/category
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 64))]
    pub category: String,
}

/// Body of PUT /map/center
#[derive(Debug, Deserialize, Validate)]
pub struct CenterRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

/// Body of POST /map/locate
#[derive(Debug, Deserialize, Validate)]
pub struct LocateRequest {
    #[validate(length(max = 256))]
    pub query: String,
}

/// Outcome of a state-changing map call
#[derive(Debug, Serialize)]
pub struct MapUpdateResponse {
    /// False when the request was a no-op (unknown category, empty text)
    pub applied: bool,
    pub snapshot: MapSnapshot,
}
