/// User accounts
///
/// Accounts are created at signup and never modified afterwards. Passwords
/// are stored as Argon2id hashes produced by [`crate::auth::password`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(15) NOT NULL UNIQUE,
///     email VARCHAR(50) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::{hash_password, PasswordError};

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    /// Login name, 4-15 characters, unique
    pub username: String,

    /// Contact address, unique
    pub email: String,

    /// Argon2id PHC string; never serialized into responses
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
///
/// Holds the password hash, never the plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Hashes `password` and builds the insert input
    ///
    /// Field constraints (lengths, email shape) are checked by the caller
    /// before this point; the database enforces uniqueness.
    pub fn with_password(
        username: impl Into<String>,
        email: impl Into<String>,
        password: &str,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            username: username.into(),
            email: email.into(),
            password_hash: hash_password(password)?,
        })
    }
}
