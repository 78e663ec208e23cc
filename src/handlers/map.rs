// src/handlers/map.rs
// DOCUMENTATION: HTTP handlers for the nearby map page
// PURPOSE: Drive the shared NearbySession from user events

use crate::errors::TravelError;
use crate::models::{
    CategoryRequest, CenterRequest, Coordinate, LocateRequest, MapUpdateResponse, POI_CATEGORIES,
};
use crate::services::NearbySession;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// GET /map
/// First call mounts the session (device position + initial fetch)
pub async fn get_map(session: web::Data<NearbySession>) -> impl Responder {
    session.start().await;
    HttpResponse::Ok().json(session.snapshot().await)
}

/// GET /map/geojson
pub async fn get_geojson(session: web::Data<NearbySession>) -> impl Responder {
    session.start().await;
    HttpResponse::Ok()
        .content_type("application/geo+json")
        .json(session.geojson().await)
}

/// GET /map/categories
pub async fn list_categories() -> impl Responder {
    let categories: Vec<_> = POI_CATEGORIES
        .iter()
        .map(|c| {
            json!({
                "label": c.label,
                "display_name": c.display_name(),
                "tag": c.tag,
            })
        })
        .collect();

    HttpResponse::Ok().json(categories)
}

/// PUT /map/category
/// Unknown categories answer 200 with applied=false
pub async fn set_category(
    session: web::Data<NearbySession>,
    req: web::Json<CategoryRequest>,
) -> Result<impl Responder, TravelError> {
    if let Err(e) = req.validate() {
        return Err(TravelError::ValidationError(e.to_string()));
    }

    session.start().await;
    let outcome = session.set_category(&req.category).await;

    Ok(HttpResponse::Ok().json(MapUpdateResponse {
        applied: outcome.is_some(),
        snapshot: session.snapshot().await,
    }))
}

/// PUT /map/center
pub async fn set_center(
    session: web::Data<NearbySession>,
    req: web::Json<CenterRequest>,
) -> Result<impl Responder, TravelError> {
    if let Err(e) = req.validate() {
        return Err(TravelError::ValidationError(e.to_string()));
    }

    session.start().await;
    session.set_center(Coordinate::new(req.lat, req.lon)).await;

    Ok(HttpResponse::Ok().json(MapUpdateResponse {
        applied: true,
        snapshot: session.snapshot().await,
    }))
}

/// POST /map/locate
/// Free-text relocation; a miss answers 404 with the user notice
pub async fn locate(
    session: web::Data<NearbySession>,
    req: web::Json<LocateRequest>,
) -> Result<impl Responder, TravelError> {
    if let Err(e) = req.validate() {
        return Err(TravelError::ValidationError(e.to_string()));
    }

    session.start().await;
    let outcome = session.relocate(&req.query).await?;

    Ok(HttpResponse::Ok().json(MapUpdateResponse {
        applied: outcome.is_some(),
        snapshot: session.snapshot().await,
    }))
}

/// Configuration for map routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/map")
            .route("", web::get().to(get_map))
            .route("/geojson", web::get().to(get_geojson))
            .route("/categories", web::get().to(list_categories))
            .route("/category", web::put().to(set_category))
            .route("/center", web::put().to(set_center))
            .route("/locate", web::post().to(locate)),
    );
}
