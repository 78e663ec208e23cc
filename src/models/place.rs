// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Static place records, listing queries and API response DTOs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

/// A travel destination from the static data file
/// DOCUMENTATION: Loaded once at startup and never mutated afterwards.
/// Text fields that are missing or carry a non-string value decode as None;
/// the filter treats None as "never matches" instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Place {
    /// Display name, also the source of the slug
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,

    /// Category label, e.g. "tourist_place", "hotel", "restaurant"
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,

    /// Card image URL
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub review: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_number: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub saved: bool,

    /// Bookable itinerary offers, in data-file order
    #[serde(default, deserialize_with = "lenient_offers")]
    pub travel_companies: Vec<TravelOffer>,
}

impl Place {
    /// Name or empty string when the record has none
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Fields searched by the listing filter
    pub fn searchable_fields(&self) -> [Option<&str>; 4] {
        [
            self.name.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.description.as_deref(),
        ]
    }
}

/// A priced itinerary option offered by a travel company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelOffer {
    pub company_name: String,

    /// Departure in "YYYY-MM-DD HH:mm"
    pub date_time: String,

    /// Price per person in rupees
    pub price: f64,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_offers<'de, D>(deserializer: D) -> Result<Vec<TravelOffer>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Category selector of the listing page
/// DOCUMENTATION: only "all" disables the category predicate; any other
/// value, including an empty one, must match the place category exactly
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        match value {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(category) => category,
        }
    }
}

/// One listing interaction: search text plus category selector
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub category: CategoryFilter,
}

impl FilterQuery {
    #[allow(dead_code)]
    pub fn new(text: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// Query string of GET /places
#[derive(Debug, Deserialize, Validate)]
pub struct PlacesQuery {
    /// Free-text search
    #[validate(length(max = 200))]
    pub q: Option<String>,

    /// Category or "all"
    #[validate(length(max = 64))]
    pub category: Option<String>,
}

impl From<PlacesQuery> for FilterQuery {
    fn from(query: PlacesQuery) -> Self {
        FilterQuery {
            text: query.q.unwrap_or_default(),
            category: query.category.map(CategoryFilter::from).unwrap_or_default(),
        }
    }
}

/// Listing card
#[derive(Debug, Clone, Serialize)]
pub struct PlaceCard {
    pub slug: String,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub saved: bool,
}

/// Response of GET /places
#[derive(Debug, Serialize)]
pub struct PlacesResponse {
    pub query: FilterQuery,

    /// Caption shown above the cards
    pub summary: String,

    /// Whether the Clear control is offered
    pub clearable: bool,

    pub places: Vec<PlaceCard>,
}

/// Itinerary entry as displayed on the detail page
#[derive(Debug, Clone, Serialize)]
pub struct OfferResponse {
    /// 1-based position after sorting by price
    pub rank: usize,
    pub company_name: String,
    pub departure_date: String,
    pub departure_time: String,
    pub price: f64,
    pub price_label: String,
}

/// Response of GET /places/{slug}
#[derive(Debug, Serialize)]
pub struct PlaceDetailResponse {
    pub slug: String,
    #[serde(flatten)]
    pub place: Place,

    /// Offers sorted ascending by price
    pub itinerary: Vec<OfferResponse>,

    /// True for a tourist place that has nothing bookable
    pub no_packages: bool,
}
