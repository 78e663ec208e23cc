// src/models/category.rs
// DOCUMENTATION: Nearby-search category vocabulary
// PURPOSE: Map user-facing category labels to OpenStreetMap tag pairs

use serde::Serialize;

/// OpenStreetMap classification tag, e.g. amenity=restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OsmTag {
    pub key: &'static str,
    pub value: &'static str,
}

/// A category the map page can search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoiCategory {
    pub label: &'static str,
    pub tag: OsmTag,
}

const fn category(label: &'static str, key: &'static str, value: &'static str) -> PoiCategory {
    PoiCategory {
        label,
        tag: OsmTag { key, value },
    }
}

/// Fixed vocabulary, in dropdown order
pub const POI_CATEGORIES: &[PoiCategory] = &[
    category("restaurant", "amenity", "restaurant"),
    category("cafe", "amenity", "cafe"),
    category("bar", "amenity", "bar"),
    category("museum", "tourism", "museum"),
    category("park", "leisure", "park"),
    category("hospital", "amenity", "hospital"),
];

impl PoiCategory {
    /// Look up a label, ignoring case and surrounding whitespace
    /// DOCUMENTATION: Anything outside the vocabulary yields None and must
    /// never be sent upstream
    pub fn lookup(label: &str) -> Option<PoiCategory> {
        let label = label.trim();
        POI_CATEGORIES
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(label))
            .copied()
    }

    /// Dropdown text, e.g. "Restaurant"
    pub fn display_name(&self) -> String {
        let mut chars = self.label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
            None => String::new(),
        }
    }
}

impl Default for PoiCategory {
    fn default() -> Self {
        POI_CATEGORIES[0]
    }
}
