use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use eventos_server::config::Config;
use eventos_server::routes::create_routes;
use eventos_server::state::AppState;
use eventos_server::store::{seed::seed_demo_events, EventStore, PostgresBackend};

const DEFAULT_LOG_FILTER: &str = "eventos_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    dotenv().ok();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().expect("Invalid configuration");

    let (store, backend) = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            tracing::info!("Successfully connected to database");

            let backend = PostgresBackend::new(pool);
            backend.migrate().await.expect("Failed to run migrations");

            tracing::info!("Migrations run successfully");

            (
                EventStore::new(Arc::new(backend), config.categories.clone()),
                "postgres",
            )
        }
        None => {
            tracing::info!("DATABASE_URL not set, keeping events in memory");
            (EventStore::in_memory(config.categories.clone()), "memory")
        }
    };

    if config.seed_demo_events {
        seed_demo_events(&store).await;
    }

    let state = AppState::new(store, backend).with_display_offset(config.display_offset);
    let app: Router = create_routes(state, &config.cors_allowed_origins);

    tracing::info!("🚀 Server running at http://{}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
