//! Database repositories for the authentication service

pub mod admin;
pub mod user;

pub use admin::AdminRepository;
pub use user::{CreateUser, UserRepository};
