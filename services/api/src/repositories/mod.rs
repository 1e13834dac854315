//! Repositories for database operations

pub mod card;
#[cfg(test)]
pub mod memory;
pub mod user;

pub use card::{CardRepository, CardStore, InsertOutcome, insert_card};
pub use user::UserRepository;
