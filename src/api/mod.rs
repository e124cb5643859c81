// Financial Literacy Game - HTTP API (axum)

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use handlers::{CreatedResponse, MessageResponse, SchemaExpose, DEFAULT_LIST_LIMIT};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/players", get(handlers::list_players).post(handlers::create_player))
        .route("/players/:id", get(handlers::get_player))
        .route("/markets/snapshot", get(handlers::market_snapshot))
        .route("/markets/tick", post(handlers::market_tick));

    Router::new()
        .route("/", get(handlers::root))
        .route("/schema", get(handlers::schema))
        .route("/test", get(handlers::test_database))
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
