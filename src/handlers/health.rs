// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Simple endpoint to verify service status

use crate::models::Place;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub async fn health_check(places: web::Data<Vec<Place>>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "travel-places",
        "version": env!("CARGO_PKG_VERSION"),
        "places_loaded": places.len()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
