// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod itinerary;
pub mod nearby_session;
pub mod nominatim_client;
pub mod overpass_client;
pub mod place_filter;
pub mod place_service;
pub mod slug;

pub use nearby_session::*;
pub use nominatim_client::*;
pub use overpass_client::*;
pub use place_service::*;
