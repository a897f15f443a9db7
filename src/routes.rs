use axum::{
    Router,
    http::Method,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// `today` and `random` are registered ahead of `:id` so they are never read
/// as an id.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/devotions", get(handler::get_devotions))
        .route("/devotions", post(handler::create_devotion))
        .route("/devotions/today", get(handler::get_today_devotion))
        .route("/devotions/random", get(handler::get_random_devotion))
        .route("/devotions/:id", get(handler::get_devotion_by_id))
        .route("/devotions/:id", delete(handler::delete_devotion))
}

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handler::healthcheck))
        .nest("/api", routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
