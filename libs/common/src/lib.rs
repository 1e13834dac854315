//! Common library for the V-Card application
//!
//! This crate provides shared functionality used by the auth and API
//! services: MySQL connectivity and migrations, the Redis pool, JWT issuing
//! and verification, validation primitives and shared error types.

pub mod cache;
pub mod database;
pub mod error;
pub mod jwt;
pub mod validation;

/// Install the process-wide tracing subscriber
///
/// Honors `RUST_LOG` and falls back to `info`.
///
/// ```rust,no_run
/// common::init_tracing();
/// tracing::info!("ready");
/// ```
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}
