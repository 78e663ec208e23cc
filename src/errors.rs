// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Every failure in this service is non-fatal for the process.
/// Each variant maps to an HTTP status code and a JSON error body.
#[derive(Error, Debug)]
pub enum TravelError {
    /// Detail lookup found no place for the slug
    #[error("Place not found: {0}")]
    NotFound(String),

    /// Geocoding service returned zero results
    #[error("Location not found: {0}")]
    GeocodeNotFound(String),

    /// Overpass or Nominatim request failed or returned garbage
    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Static place data could not be read at startup
    #[error("Failed to load place data: {0}")]
    DataLoad(String),
}

impl TravelError {
    fn code(&self) -> &'static str {
        match self {
            TravelError::NotFound(_) => "NOT_FOUND",
            TravelError::GeocodeNotFound(_) => "GEOCODE_NOT_FOUND",
            TravelError::NetworkFailure(_) => "NETWORK_FAILURE",
            TravelError::ValidationError(_) => "VALIDATION_ERROR",
            TravelError::DataLoad(_) => "DATA_LOAD_ERROR",
        }
    }
}

/// Convert TravelError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for TravelError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            TravelError::NotFound(_) => StatusCode::NOT_FOUND,
            TravelError::GeocodeNotFound(_) => StatusCode::NOT_FOUND,
            TravelError::NetworkFailure(_) => StatusCode::BAD_GATEWAY,
            TravelError::ValidationError(_) => StatusCode::BAD_REQUEST,
            TravelError::DataLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
