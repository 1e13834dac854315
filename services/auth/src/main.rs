use anyhow::Result;
use common::{
    cache::{RedisConfig, RedisPool},
    database,
    jwt::{JwtConfig, JwtService},
};
use tracing::info;

mod error;
mod mailer;
mod models;
mod otp;
mod repositories;
mod routes;
mod validation;

use crate::{
    mailer::{MailConfig, Mailer},
    otp::{OtpBackend, OtpConfig, OtpStore},
    repositories::{AdminRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub user_repository: UserRepository,
    pub admin_repository: AdminRepository,
    pub otp_store: OtpStore,
    pub mailer: Mailer,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    common::init_tracing();

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Initialize JWT service
    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    let otp_config = OtpConfig::from_env()?;
    let otp_store = match otp_config.backend {
        OtpBackend::Memory => OtpStore::in_memory(otp_config.ttl_seconds),
        OtpBackend::Redis => {
            let redis_pool = RedisPool::new(&RedisConfig::from_env()?).await?;
            OtpStore::redis(redis_pool, otp_config.ttl_seconds)
        }
    };
    info!(backend = ?otp_config.backend, "OTP store ready");

    let mail_config = MailConfig::from_env()?;
    let mailer = Mailer::new(&mail_config)?;
    info!(host = %mail_config.host, port = mail_config.port, "Mailer configured");

    let app_state = AppState {
        jwt_service,
        user_repository: UserRepository::new(pool.clone()),
        admin_repository: AdminRepository::new(pool),
        otp_store,
        mailer,
    };

    info!("Authentication service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("AUTH_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Authentication service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
