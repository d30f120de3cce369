use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::cards::CardsView;
use crate::state::AppState;

const UNAVAILABLE: &str = "el servicio de eventos no está disponible";

/// The listing page model. A failed fetch still answers with a renderable
/// view, marked `failed`, so the page can show the message.
pub async fn list_cards(State(state): State<AppState>) -> Response {
    let fetched = state.store.list().await.map_err(|e| {
        error!(error = %e, "Failed to load events for cards");
        UNAVAILABLE
    });

    let view = CardsView::from_fetch(fetched, state.clock.now(), state.display_offset);
    let status = if view.is_failed() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (status, Json(view)).into_response()
}
