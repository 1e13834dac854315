use serde::{Deserialize, Serialize};

/// Admin account, provisioned directly in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admin {
    pub admin_id: i64,
    pub email: String,
    pub admin_name: Option<String>,
}

/// Body of `POST /auth/admin`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminAuthRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub otp: Option<String>,
}
