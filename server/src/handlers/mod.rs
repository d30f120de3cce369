use axum::{extract::State, response::IntoResponse, response::Response, Json};

use crate::state::AppState;
use crate::utils::response::HealthResponse;

pub mod cards;
pub mod events;

pub async fn health_check(State(state): State<AppState>) -> Response {
    let payload = HealthResponse {
        success: true,
        status: "ok",
        service: "eventos-api",
        backend: state.backend,
    };

    Json(payload).into_response()
}
