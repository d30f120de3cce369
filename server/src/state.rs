use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

use crate::countdown::{Clock, SystemClock, DEFAULT_REFRESH_PERIOD};
use crate::store::EventStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: EventStore,
    pub clock: Arc<dyn Clock>,
    pub display_offset: FixedOffset,
    pub refresh_period: Duration,
    pub backend: &'static str,
}

impl AppState {
    pub fn new(store: EventStore, backend: &'static str) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            display_offset: Utc.fix(),
            refresh_period: DEFAULT_REFRESH_PERIOD,
            backend,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_display_offset(mut self, offset: FixedOffset) -> Self {
        self.display_offset = offset;
        self
    }
}
