//! CORS middleware configuration.
//!
//! The dashboard may be served from a different origin during development,
//! so the API allows any origin.

use tower_http::cors::CorsLayer;

/// Create the CORS layer for the API.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
