// src/services/slug.rs
// DOCUMENTATION: URL slugs for detail pages
// PURPOSE: Derive a stable slug from a place name and resolve it back

use crate::errors::TravelError;
use crate::models::Place;

/// Lowercase, spaces to hyphens, drop everything outside [A-Za-z0-9_-]
/// DOCUMENTATION: Deterministic; an empty name yields an empty slug.
/// Non-ASCII letters are dropped as well.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect()
}

/// Slug of a place; records without a name get ""
pub fn place_slug(place: &Place) -> String {
    place.name.as_deref().map(slugify).unwrap_or_default()
}

/// Linear scan for the place whose slug equals `slug`
pub fn find_by_slug<'a>(places: &'a [Place], slug: &str) -> Result<&'a Place, TravelError> {
    if slug.is_empty() {
        return Err(TravelError::NotFound(slug.to_string()));
    }

    places
        .iter()
        .find(|place| place_slug(place) == slug)
        .ok_or_else(|| TravelError::NotFound(slug.to_string()))
}
