// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for the places listing and detail pages
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::errors::TravelError;
use crate::models::{Place, PlacesQuery};
use crate::services::PlaceService;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// GET /places
/// Search-as-you-type listing, capped at RESULT_LIMIT cards
pub async fn search_places(
    places: web::Data<Vec<Place>>,
    config: web::Data<Config>,
    query: web::Query<PlacesQuery>,
) -> Result<impl Responder, TravelError> {
    if let Err(e) = query.validate() {
        return Err(TravelError::ValidationError(e.to_string()));
    }

    let result = PlaceService::search_places(
        places.get_ref(),
        query.into_inner().into(),
        config.result_limit,
    );
    Ok(HttpResponse::Ok().json(result))
}

/// GET /places/categories
pub async fn list_categories(places: web::Data<Vec<Place>>) -> impl Responder {
    HttpResponse::Ok().json(PlaceService::categories(places.get_ref()))
}

/// GET /places/{slug}
/// Detail page with the itinerary sorted by price
pub async fn get_place(
    places: web::Data<Vec<Place>>,
    path: web::Path<String>,
) -> Result<impl Responder, TravelError> {
    let slug = path.into_inner();
    let detail = PlaceService::get_place(places.get_ref(), &slug)?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Configuration for place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/places")
            .route("", web::get().to(search_places))
            .route("/categories", web::get().to(list_categories))
            .route("/{slug}", web::get().to(get_place)),
    );
}
