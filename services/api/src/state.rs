//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;
use common::jwt::JwtService;

use crate::repositories::{CardStore, UserRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub card_store: Arc<dyn CardStore>,
    pub user_repository: UserRepository,
    pub jwt_service: JwtService,
    /// Origin used to build share links, without a trailing slash
    pub public_origin: String,
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_service.clone()
    }
}
