use std::sync::Arc;

use anyhow::Result;
use common::{
    database,
    jwt::{JwtConfig, JwtService},
};
use tracing::info;

mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod state;

use crate::{
    repositories::{CardRepository, UserRepository},
    state::AppState,
};

const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:3001";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    common::init_tracing();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    if run_migrations_enabled() {
        database::run_migrations(&pool).await?;
    }

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    let public_origin = std::env::var("PUBLIC_ORIGIN")
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .ok()
        .filter(|origin| !origin.is_empty())
        .unwrap_or_else(|| DEFAULT_PUBLIC_ORIGIN.to_string());

    let app_state = AppState {
        card_store: Arc::new(CardRepository::new(pool.clone())),
        user_repository: UserRepository::new(pool),
        jwt_service,
        public_origin,
    };

    info!("API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("API_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// `DATABASE_RUN_MIGRATIONS`, on unless set to a false-like value
fn run_migrations_enabled() -> bool {
    std::env::var("DATABASE_RUN_MIGRATIONS")
        .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
        .unwrap_or(true)
}
