use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::cards::list_cards;
use crate::handlers::events::{
    create_event, delete_event, event_countdown, event_countdown_stream, get_event,
    list_categories, list_events, update_event,
};
use crate::handlers::health_check;
use crate::state::AppState;

pub fn create_routes(state: AppState, cors_allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/categorias", get(list_categories))
        .route("/api/eventos", get(list_events).post(create_event))
        .route(
            "/api/eventos/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/eventos/:id/countdown", get(event_countdown))
        .route("/api/eventos/:id/countdown/stream", get(event_countdown_stream))
        .route("/api/cards", get(list_cards))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(cors_allowed_origins))
}
