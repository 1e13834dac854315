//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use chrono::Utc;
use common::error::is_unique_violation;
use sqlx::{MySqlPool, Row, mysql::MySqlRow};
use tracing::info;

use crate::models::{NewUser, User};

/// Outcome of a signup insert
#[derive(Debug)]
pub enum CreateUser {
    Created(User),
    EmailTaken,
}

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

    /// Create a new user, hashing the password with argon2
    pub async fn create(&self, new_user: &NewUser) -> Result<CreateUser> {
        info!("Creating new user: {}", new_user.email);

        if self.find_by_email(&new_user.email).await?.is_some() {
            return Ok(CreateUser::EmailTaken);
        }

        let password_hash = hash_password(&new_user.password)?;
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, createdAt)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(CreateUser::Created(User {
                id: done.last_insert_id() as i64,
                name: new_user.name.clone(),
                email: new_user.email.clone(),
                password_hash,
                created_at,
            })),
            // Lost a race against a concurrent signup for the same email
            Err(e) if is_unique_violation(&e) => Ok(CreateUser::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        info!("Finding user by email: {}", email);

        let row = sqlx::query(
            r#"
            SELECT id, name, email, password, createdAt
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| user_from_row(&row)).transpose()
    }

    /// Verify a user's password
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

fn user_from_row(row: &MySqlRow) -> Result<User> {
    let id: i32 = row.try_get("id")?;
    Ok(User {
        id: id.into(),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password")?,
        created_at: row.try_get("createdAt")?,
    })
}
