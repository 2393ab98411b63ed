use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

mod error;
mod middleware;
mod models;
mod rates;
mod routes;
mod state;
mod storage;
mod validation;

use std::sync::Arc;

use common::database::{self, DatabaseConfig};

use crate::rates::{RateGateway, RateGatewayConfig};
use crate::state::AppState;
use crate::storage::{MemStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting converter API service");

    // Pick the store backend: relational when a database is configured,
    // in-memory otherwise
    let store: Arc<dyn Store> = if std::env::var("DATABASE_URL").is_ok() {
        let db_config = DatabaseConfig::from_env()?;
        let pool = database::init_pool(&db_config).await?;

        if database::health_check(&pool).await? {
            info!("Database connection successful");
        } else {
            anyhow::bail!("Failed to connect to database");
        }

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");

        Arc::new(PgStore::new(pool))
    } else {
        warn!("DATABASE_URL not set, falling back to the in-memory store");
        Arc::new(MemStore::new())
    };

    let rate_gateway = RateGateway::new(RateGatewayConfig::from_env())?;

    info!("Converter API service initialized successfully");

    let app_state = AppState {
        store,
        rate_gateway,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Converter API service listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
