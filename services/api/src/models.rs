//! API models for request and response payloads

use cards::Card;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User row as shown on the admin dashboard; never carries the password hash
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// `?template=` on the preview endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub template: Option<String>,
}

/// `?type=users|cards` or `?userEmail=` on the admin dashboard
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub user_email: Option<String>,
}

/// `?userEmail=` or `?slug=` on an admin delete
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDeleteQuery {
    pub user_email: Option<String>,
    pub slug: Option<String>,
}

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserSummary>,
}

#[derive(Serialize)]
pub struct CardsResponse {
    pub cards: Vec<Card>,
}

/// Trimmed, non-empty query value
pub fn query_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
