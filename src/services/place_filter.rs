// src/services/place_filter.rs
// DOCUMENTATION: Search-as-you-type filter over the static place list
// PURPOSE: Pure functions from (places, query) to the cards to render

use crate::models::{CategoryFilter, FilterQuery, Place};

/// Cards shown by the listing page unless RESULT_LIMIT says otherwise
pub const DEFAULT_RESULT_LIMIT: usize = 3;

/// Filter with the default card limit
#[allow(dead_code)]
pub fn filter(places: &[Place], query: &FilterQuery) -> Vec<Place> {
    filter_with_limit(places, query, DEFAULT_RESULT_LIMIT)
}

/// Filter places by text and category
/// DOCUMENTATION: Text matches case-insensitively as a substring of any of
/// name, city, state or description. Category is "all" or an exact match.
/// The first `limit` matches are returned in collection order.
pub fn filter_with_limit(places: &[Place], query: &FilterQuery, limit: usize) -> Vec<Place> {
    let needle = query.text.to_lowercase();

    places
        .iter()
        .filter(|place| matches_text(place, &needle) && matches_category(place, &query.category))
        .take(limit)
        .cloned()
        .collect()
}

/// `needle` must already be lowercase
fn matches_text(place: &Place, needle: &str) -> bool {
    place
        .searchable_fields()
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

fn matches_category(place: &Place, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Only(wanted) => place.category() == Some(wanted.as_str()),
    }
}

/// Reset the listing to its initial state
pub fn clear() -> FilterQuery {
    FilterQuery::default()
}

/// Whether the Clear control should be offered
pub fn is_active(query: &FilterQuery) -> bool {
    !query.text.is_empty() || query.category != CategoryFilter::All
}

/// Distinct categories in first-seen order
pub fn categories(places: &[Place]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for category in places.iter().filter_map(Place::category) {
        if !seen.iter().any(|c| c == category) {
            seen.push(category.to_string());
        }
    }
    seen
}

/// Caption above the cards, e.g. `Showing top 3 places for "agra" in tourist place category`
pub fn summary(query: &FilterQuery, limit: usize) -> String {
    let mut caption = format!("Showing top {} places", limit);

    if !query.text.is_empty() {
        caption.push_str(&format!(" for \"{}\"", query.text));
    }

    if let CategoryFilter::Only(category) = &query.category {
        caption.push_str(&format!(" in {} category", category.replacen('_', " ", 1)));
    }

    caption
}
