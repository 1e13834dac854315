//! Authentication service models

pub mod admin;
pub mod user;

// Re-export for convenience
pub use admin::{Admin, AdminAuthRequest};
pub use user::{LoginCredentials, NewUser, PublicUser, SignupRequest, User};
