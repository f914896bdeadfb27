use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/", get(handlers::index))
        .route("/ping", get(handlers::ping))

        .route("/echo", post(handlers::echo))

        // Translation
        .route("/translate", post(handlers::translate))
        .route("/batch_translate", post(handlers::batch_translate))
}

/// Full application with middleware, ready to serve
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
