//! API route definitions.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, middleware};
use crate::service::QaService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QaService>,
}

/// Build the complete API router.
pub fn create_router(service: Arc<QaService>) -> Router {
    let app_state = AppState { service };

    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/health", get(handlers::health))
        .route("/ask", post(handlers::ask))
        .route("/tables", get(handlers::tables))
        .route("/schema/:table_name", get(handlers::schema))
        .route("/approvals", get(handlers::list_approvals))
        .route("/approvals/:conversation_id", post(handlers::decide_approval))
        .layer(middleware::cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
