//! Demo records loaded at startup when `SEED_DEMO_EVENTS` is set.

use tracing::{info, warn};

use super::EventStore;
use crate::models::CreateEventRequest;

fn demo(
    title: &str,
    description: &str,
    img_url: &str,
    date_time: &str,
    category: &str,
) -> CreateEventRequest {
    CreateEventRequest {
        title: Some(title.to_string()),
        description: Some(description.to_string()),
        img_url: Some(img_url.to_string()),
        date_time: Some(date_time.into()),
        category: Some(category.into()),
    }
}

pub fn demo_events() -> Vec<CreateEventRequest> {
    vec![
        demo(
            "Conferencia Node.js",
            "Aprende lo último en Node.js",
            "https://plus.unsplash.com/premium_photo-1661877737564-3dfd7282efcb",
            "2025-12-16T10:00:00Z",
            "conferencias",
        ),
        demo(
            "Workshop Express",
            "Crea APIs REST con Express",
            "https://images.unsplash.com/photo-1623652554515-91c833e3080e",
            "2025-12-20T14:30:00Z",
            "tecnologia",
        ),
        demo(
            "Seminario de Ciberseguridad",
            "Protege tus aplicaciones web",
            "https://images.unsplash.com/photo-1510915228340-29c85a43dcfe",
            "2025-10-25T09:00:00Z",
            "ciberseguridad",
        ),
        demo(
            "Introducción a la Inteligencia Artificial",
            "Conceptos básicos y aplicaciones prácticas",
            "https://images.unsplash.com/photo-1504384308090-c894fdcc538d",
            "2025-12-30T11:00:00Z",
            "ia",
        ),
        demo(
            "Conferencia de Innovación Tecnológica",
            "Explora las últimas tendencias en tecnología e innovación.",
            "https://images.unsplash.com/photo-1531058020387-3be344556be6",
            "2025-11-05T15:00:00Z",
            "conferencias",
        ),
    ]
}

/// Creates the demo records through the normal validated path. Records the
/// current whitelist rejects are skipped with a warning. Returns how many
/// were stored.
pub async fn seed_demo_events(store: &EventStore) -> usize {
    let requests = demo_events();
    let total = requests.len();
    let mut loaded = 0;

    for request in requests {
        let title = request.title.clone().unwrap_or_default();
        match store.create(request).await {
            Ok(event) => {
                loaded += 1;
                info!(event_id = event.id, title = %title, "Seeded demo event");
            }
            Err(e) => warn!(title = %title, error = %e, "Skipping demo event"),
        }
    }

    info!(loaded, total, "Demo seeding finished");
    loaded
}
