//! User rows as seen by the admin dashboard

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{MySqlPool, Row};
use tracing::info;

use crate::models::UserSummary;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Every user, newest first
    pub async fn list_all(&self) -> DatabaseResult<Vec<UserSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, createdAt
            FROM users
            ORDER BY createdAt DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter()
            .map(|row| -> Result<UserSummary, sqlx::Error> {
                let id: i32 = row.try_get("id")?;
                Ok(UserSummary {
                    id: id.into(),
                    name: row.try_get("name")?,
                    email: row.try_get("email")?,
                    created_at: row.try_get("createdAt")?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(DatabaseError::Query)
    }

    /// Delete a user's cards, then the user, in one transaction
    ///
    /// Returns `false` when neither a user nor a card matched.
    pub async fn delete_user_and_cards(&self, email: &str) -> DatabaseResult<bool> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::Query)?;

        let cards = sqlx::query("DELETE FROM cards WHERE ownerEmail = ?")
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::Query)?;

        let users = sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(email)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::Query)?;

        tx.commit().await.map_err(DatabaseError::Query)?;

        info!(
            email = %email,
            cards = cards.rows_affected(),
            users = users.rows_affected(),
            "Deleted user and their cards"
        );
        Ok(cards.rows_affected() + users.rows_affected() > 0)
    }
}
