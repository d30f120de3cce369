pub mod event;

pub use event::{CreateEventRequest, DeletedEvent, Event, EventChanges, NewEvent, UpdateEventRequest};
