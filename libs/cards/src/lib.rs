//! Card domain library
//!
//! Holds everything about a V-Card that does not touch the network: the
//! record model, input validation and normalization, the JSON column codec,
//! slug generation, the template rendering engine and the vCard/QR exports.

pub mod columns;
pub mod export;
pub mod model;
pub mod render;
pub mod slug;
pub mod validation;

pub use model::{
    BusinessProfile, Card, CardType, CardUpdate, Contact, NewCard, PersonalProfile, Product,
    Profile, Service, SocialPlatform, Socials, Template,
};
pub use validation::CardInput;
