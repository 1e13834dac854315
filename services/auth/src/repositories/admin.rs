//! Admin lookups; admins are provisioned out of band

use anyhow::Result;
use sqlx::{MySqlPool, Row};

use crate::models::Admin;

#[derive(Clone)]
pub struct AdminRepository {
    pool: MySqlPool,
}

impl AdminRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Find an admin by lowercased email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Admin>> {
        let row = sqlx::query("SELECT admin_id, admin_name, email FROM admin WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let admin_id: i32 = row.try_get("admin_id")?;
        Ok(Some(Admin {
            admin_id: admin_id.into(),
            email: row.try_get("email")?,
            admin_name: row.try_get("admin_name")?,
        }))
    }
}
