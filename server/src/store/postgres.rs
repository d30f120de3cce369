use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, instrument};

use super::{EventBackend, StoreError};
use crate::models::{Event, EventChanges, NewEvent};

const EVENT_COLUMNS: &str = "id, title, description, category, img_url, date_time, created_at";

/// Keeps records in the `events` table created by the embedded migrations.
#[derive(Clone)]
pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }
}

fn log_failure(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| {
        error!(operation, error = %e, "Event query failed");
        StoreError::Database(e)
    }
}

#[async_trait]
impl EventBackend for PostgresBackend {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Event>, StoreError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date_time ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(log_failure("list"))
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Option<Event>, StoreError> {
        sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_failure("get"))
    }

    #[instrument(skip(self, event), fields(title = %event.title))]
    async fn insert(&self, event: NewEvent) -> Result<Event, StoreError> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (title, description, category, img_url, date_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.category)
        .bind(&event.img_url)
        .bind(event.date_time)
        .fetch_one(&self.pool)
        .await
        .map_err(log_failure("insert"))
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: i64, changes: EventChanges) -> Result<Option<Event>, StoreError> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                img_url = COALESCE($5, img_url),
                date_time = COALESCE($6, date_time)
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.category)
        .bind(changes.img_url)
        .bind(changes.date_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_failure("update"))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<Option<Event>, StoreError> {
        sqlx::query_as::<_, Event>(&format!(
            "DELETE FROM events WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_failure("delete"))
    }
}
