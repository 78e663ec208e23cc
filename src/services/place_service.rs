// src/services/place_service.rs
// DOCUMENTATION: Business logic for places
// PURPOSE: Intermediary between handlers and the filter/itinerary/slug helpers

use crate::errors::TravelError;
use crate::models::{FilterQuery, Place, PlaceCard, PlaceDetailResponse, PlacesResponse};
use crate::services::{itinerary, place_filter, slug};

/// Category whose detail page explains a missing itinerary
const TOURIST_PLACE: &str = "tourist_place";

pub struct PlaceService;

impl PlaceService {
    /// Filtered listing cards for one search interaction
    pub fn search_places(places: &[Place], query: FilterQuery, limit: usize) -> PlacesResponse {
        let matches = place_filter::filter_with_limit(places, &query, limit);

        if matches.is_empty() {
            log::debug!("No places match {:?}", query);
        }

        PlacesResponse {
            summary: place_filter::summary(&query, limit),
            clearable: place_filter::is_active(&query),
            places: matches.iter().map(Self::to_card).collect(),
            query,
        }
    }

    /// Distinct categories for the dropdown
    pub fn categories(places: &[Place]) -> Vec<String> {
        place_filter::categories(places)
    }

    /// Detail page for a slug
    pub fn get_place(places: &[Place], slug: &str) -> Result<PlaceDetailResponse, TravelError> {
        let place = slug::find_by_slug(places, slug)?;
        let itinerary = itinerary::itinerary(&place.travel_companies);
        let no_packages = itinerary.is_empty() && place.category() == Some(TOURIST_PLACE);

        Ok(PlaceDetailResponse {
            slug: slug.to_string(),
            place: place.clone(),
            itinerary,
            no_packages,
        })
    }

    fn to_card(place: &Place) -> PlaceCard {
        PlaceCard {
            slug: slug::place_slug(place),
            name: place.name().to_string(),
            city: place.city.clone(),
            state: place.state.clone(),
            description: place.description.clone(),
            category: place.category.clone(),
            image: place.image.clone(),
            saved: place.saved,
        }
    }
}
