use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{EventBackend, StoreError};
use crate::models::{Event, EventChanges, NewEvent};

struct Inner {
    events: Vec<Event>,
    next_id: i64,
}

/// Keeps records in process memory. Ids start at 1 and only ever grow.
pub struct MemoryBackend {
    inner: RwLock<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                events: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBackend for MemoryBackend {
    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        let mut events = self.inner.read().events.clone();
        events.sort_by(|a, b| a.date_time.cmp(&b.date_time).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn get(&self, id: i64) -> Result<Option<Event>, StoreError> {
        Ok(self.inner.read().events.iter().find(|e| e.id == id).cloned())
    }

    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut inner = self.inner.write();
        let stored = Event {
            id: inner.next_id,
            title: event.title,
            description: event.description,
            category: event.category,
            img_url: event.img_url,
            date_time: event.date_time,
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.events.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<Event>, StoreError> {
        let mut inner = self.inner.write();
        let Some(event) = inner.events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        changes.apply_to(event);
        Ok(Some(event.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Event>, StoreError> {
        let mut inner = self.inner.write();
        let Some(index) = inner.events.iter().position(|e| e.id == id) else {
            return Ok(None);
        };
        Ok(Some(inner.events.remove(index)))
    }
}
