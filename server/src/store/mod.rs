//! Event storage.
//!
//! [`EventStore`] owns the single validation path and the category whitelist.
//! Records live in an [`EventBackend`]:
//! - [`MemoryBackend`] keeps them in process memory
//! - [`PostgresBackend`] keeps them in an `events` table

mod memory;
mod postgres;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

use crate::models::{CreateEventRequest, Event, EventChanges, NewEvent, UpdateEventRequest};
use crate::validation::{validate_changes, validate_new_event, CategoryWhitelist, ValidationError};

pub use memory::MemoryBackend;
pub use postgres::PostgresBackend;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("event {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for already validated records.
///
/// Each method is a single atomic mutation or read. Implementations assign
/// ids and `created_at`, and never reuse an id.
#[async_trait]
pub trait EventBackend: Send + Sync {
    /// All records ordered by `date_time`, then `id`.
    async fn list(&self) -> Result<Vec<Event>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Event>, StoreError>;

    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError>;

    /// Returns `None` when no record has this id.
    async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<Event>, StoreError>;

    /// Returns the removed record, or `None` when no record has this id.
    async fn delete(&self, id: i64) -> Result<Option<Event>, StoreError>;
}

#[derive(Clone)]
pub struct EventStore {
    backend: Arc<dyn EventBackend>,
    categories: Arc<RwLock<CategoryWhitelist>>,
}

impl EventStore {
    pub fn new(backend: Arc<dyn EventBackend>, categories: CategoryWhitelist) -> Self {
        Self {
            backend,
            categories: Arc::new(RwLock::new(categories)),
        }
    }

    /// A store on a fresh [`MemoryBackend`].
    pub fn in_memory(categories: CategoryWhitelist) -> Self {
        Self::new(Arc::new(MemoryBackend::new()), categories)
    }

    pub fn categories(&self) -> CategoryWhitelist {
        self.categories.read().clone()
    }

    /// Swaps the whitelist. Later writes are checked against the new list;
    /// stored records keep whatever category they were written with.
    pub fn replace_categories(&self, categories: CategoryWhitelist) {
        info!(count = categories.as_slice().len(), "Category whitelist replaced");
        *self.categories.write() = categories;
    }

    pub async fn list(&self) -> Result<Vec<Event>, StoreError> {
        self.backend.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Event, StoreError> {
        self.backend.get(id).await?.ok_or(StoreError::NotFound(id))
    }

    pub async fn create(&self, request: CreateEventRequest) -> Result<Event, StoreError> {
        let new_event = validate_new_event(request, &self.categories())?;
        let event = self.backend.insert(new_event).await?;
        info!(event_id = event.id, category = %event.category, "Event created");
        Ok(event)
    }

    /// Unknown ids fail with [`StoreError::NotFound`] before any field is
    /// checked.
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, StoreError> {
        let current = self.get(id).await?;

        let changes = validate_changes(request, &self.categories())?;
        if changes.is_empty() {
            return Ok(current);
        }

        let event = self
            .backend
            .update(id, changes)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        info!(event_id = id, "Event updated");
        Ok(event)
    }

    pub async fn delete(&self, id: i64) -> Result<Event, StoreError> {
        let event = self
            .backend
            .delete(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        info!(event_id = id, "Event deleted");
        Ok(event)
    }
}
