//! Backend del dashboard de tránsito de buses
//!
//! Servicio HTTP de gestión de una flota de buses: CRUD de buses y rutas
//! (con sus paradas ordenadas embebidas), vista derivada de la flota y
//! lectura de snapshots de posición. La persistencia es un document store
//! detrás de un trait; la vista del dashboard se mantiene viva con una
//! suscripción por colección.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Construir el router completo de la aplicación
pub fn build_app(state: AppState) -> Router {
    let cors = if state.config.cors_origins.is_empty() {
        middleware::cors::cors_middleware()
    } else {
        middleware::cors::cors_middleware_with_origins(state.config.cors_origins.clone())
    };

    Router::new()
        .route("/health", get(health))
        .nest("/api/bus", routes::bus_routes::create_bus_router())
        .nest("/api/route", routes::route_routes::create_route_router())
        .nest(
            "/api/dashboard",
            routes::dashboard_routes::create_dashboard_router(),
        )
        .nest("/api/blob", routes::blob_routes::create_blob_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "transit-dashboard",
        "status": "healthy"
    }))
}
