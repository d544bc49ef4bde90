//! Registration and credential checks
//!
//! Passwords are kept as salted SHA-256 digests. There are no sessions;
//! callers get a yes/no answer per request.

use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use regex::Regex;
use sqlx::SqlitePool;
use std::sync::LazyLock;
use tracing::info;

use crate::{Error, Result};

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Stored account, without credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub phone: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl NewUser {
    /// Field checks: phone is exactly 10 ASCII digits, email looks like `x@y.z`
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::InvalidInput("Username is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(Error::InvalidInput("Password is required".to_string()));
        }
        if self.phone.len() != 10 || !self.phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidInput("Phone number must be 10 digits".to_string()));
        }
        if !is_valid_email(&self.email) {
            return Err(Error::InvalidInput("Invalid email format".to_string()));
        }
        Ok(())
    }
}

/// Email shape: something, '@', something, '.', something (prefix match)
const EMAIL_PATTERN: &str = r"^[^@]+@[^@]+\.[^@]+";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn generate_salt() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Map a UNIQUE violation on `users` to the matching conflict message
fn unique_conflict(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("users.username") {
                return Error::Conflict("Username already taken".to_string());
            }
            if message.contains("users.email") {
                return Error::Conflict("Email already registered".to_string());
            }
        }
    }
    Error::Database(err)
}

/// Validate and insert a new account
pub async fn register(pool: &SqlitePool, new_user: &NewUser) -> Result<User> {
    new_user.validate()?;

    let username_taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
        .bind(&new_user.username)
        .fetch_optional(pool)
        .await?;
    if username_taken.is_some() {
        return Err(Error::Conflict("Username already taken".to_string()));
    }

    let email_taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&new_user.email)
        .fetch_optional(pool)
        .await?;
    if email_taken.is_some() {
        return Err(Error::Conflict("Email already registered".to_string()));
    }

    // A concurrent registration can still win between the checks and the
    // insert; the UNIQUE constraints catch it
    let salt = generate_salt();
    let hash = hash_password(&new_user.password, &salt);

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, phone, email, password_hash, password_salt)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, username, phone, email, created_at
        "#,
    )
    .bind(&new_user.username)
    .bind(&new_user.phone)
    .bind(&new_user.email)
    .bind(&hash)
    .bind(&salt)
    .fetch_one(pool)
    .await
    .map_err(unique_conflict)?;

    info!("Registered user {}", user.username);
    Ok(user)
}

/// Check a username/password pair
pub async fn verify_credentials(pool: &SqlitePool, username: &str, password: &str) -> Result<User> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT password_hash, password_salt FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    let matches = row
        .map(|(hash, salt)| hash_password(password, &salt) == hash)
        .unwrap_or(false);
    if !matches {
        info!("Invalid credentials for user {}", username);
        return Err(Error::Unauthorized("Invalid credentials".to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, phone, email, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_one(pool)
    .await?;

    info!("User {} logged in", username);
    Ok(user)
}
