//! Card view model for the events page.
//!
//! Mirrors what the listing page shows per event: image, category badge,
//! title, description, the event date in the display zone and the countdown.

use std::fmt::Display;

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::Serialize;

use crate::countdown::{Countdown, CountdownDisplay};
use crate::models::Event;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x450?text=Sin+imagen";
pub const UNTITLED: &str = "Sin título";
pub const EMPTY_MESSAGE: &str = "No hay eventos disponibles.";

const WEEKDAYS: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCard {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: String,
    pub category_class: String,
    pub date_label: String,
    pub countdown: CountdownDisplay,
}

impl EventCard {
    pub fn build(event: &Event, now: DateTime<Utc>, display_offset: FixedOffset) -> Self {
        let title = if event.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            event.title.clone()
        };
        let image_url = if event.img_url.trim().is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            event.img_url.clone()
        };

        Self {
            id: event.id,
            title,
            description: event.description.clone(),
            image_url,
            category: event.category.clone(),
            category_class: category_class(&event.category),
            date_label: format_event_date(event.date_time, display_offset),
            countdown: Countdown::between(event.date_time, now).display(),
        }
    }
}

/// The whole listing, including the empty and failed states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CardsView {
    Loaded { cards: Vec<EventCard> },
    Empty { message: String },
    Failed { message: String },
}

impl CardsView {
    /// Builds the view from the outcome of fetching the event list. A failed
    /// fetch becomes a readable [`CardsView::Failed`] rather than an error.
    pub fn from_fetch<E: Display>(
        fetched: Result<Vec<Event>, E>,
        now: DateTime<Utc>,
        display_offset: FixedOffset,
    ) -> Self {
        match fetched {
            Ok(events) if events.is_empty() => CardsView::Empty {
                message: EMPTY_MESSAGE.to_string(),
            },
            Ok(events) => CardsView::Loaded {
                cards: events
                    .iter()
                    .map(|event| EventCard::build(event, now, display_offset))
                    .collect(),
            },
            Err(e) => CardsView::Failed {
                message: format!("No se pudieron cargar los eventos: {}", e),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CardsView::Failed { .. })
    }
}

/// Lowercases and replaces anything outside `[a-z0-9-]` with `-`.
pub fn category_class(category: &str) -> String {
    category
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// `Martes, 16/12/25 - 10:00` in the given zone.
pub fn format_event_date(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    let local = instant.with_timezone(&offset);
    let weekday = WEEKDAYS[local.weekday().num_days_from_monday() as usize];
    format!("{}, {}", weekday, local.format("%d/%m/%y - %H:%M"))
}
