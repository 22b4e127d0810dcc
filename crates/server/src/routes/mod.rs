//! HTTP routes

pub mod health;
pub mod rooms;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{state::AppState, websocket::ws_handler};

/// Create all routes
pub fn create_router(state: AppState) -> Router {
    // Health check routes (at root level for infrastructure monitoring)
    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness));

    // Room surface: greeting page, creation, snapshot reads
    let room_routes = Router::new()
        .route("/", get(rooms::index))
        .route("/rooms", post(rooms::create_room))
        .route("/rooms/:id", get(rooms::get_room));

    // WebSocket route
    let websocket_routes = Router::new().route("/ws", get(ws_handler));

    Router::new()
        .merge(health_routes)
        .merge(room_routes)
        .merge(websocket_routes)
        // Clients are served from arbitrary origins
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
