use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use tokio_stream::{Stream, StreamExt};

use crate::countdown::{Countdown, CountdownTicker};
use crate::models::{CreateEventRequest, DeletedEvent, UpdateEventRequest};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, ok};

/// Ids that are not integers cannot name a record, so they are reported as
/// not found.
fn parse_event_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(format!("Event with id '{}' was not found", raw)))
}

pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.store.categories().to_vec())
}

pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let events = state.store.list().await?;
    Ok(ok(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.store.get(parse_event_id(&id)?).await?;
    Ok(ok(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let event = state.store.create(request).await?;
    Ok(created(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_event_id(&id)?;
    let Json(request) = payload?;
    let event = state.store.update(id, request).await?;
    Ok(ok(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted_record = state.store.delete(parse_event_id(&id)?).await?;
    Ok(ok(DeletedEvent {
        message: "Event deleted".to_string(),
        deleted_record,
    }))
}

/// Countdown for one event, computed at request time.
pub async fn event_countdown(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.store.get(parse_event_id(&id)?).await?;
    let countdown = Countdown::between(event.date_time, state.clock.now());
    Ok(ok(countdown.display()))
}

/// Live countdown as server-sent events, one `countdown` event per refresh.
/// The ticker stops when the client disconnects and the stream is dropped.
pub async fn event_countdown_stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, axum::Error>>>, AppError> {
    let event = state.store.get(parse_event_id(&id)?).await?;

    let ticker =
        CountdownTicker::start_at(event.date_time, state.clock.clone(), state.refresh_period);
    let frames = ticker
        .into_stream()
        .map(|frame| SseEvent::default().event("countdown").json_data(frame.display()));

    Ok(Sse::new(frames).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_id() {
        assert_eq!(parse_event_id("12").unwrap(), 12);
        assert!(matches!(parse_event_id("abc"), Err(AppError::NotFound(_))));
        assert!(matches!(parse_event_id("1.5"), Err(AppError::NotFound(_))));
    }
}
