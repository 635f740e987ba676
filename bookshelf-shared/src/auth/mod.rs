/// Authentication primitives
///
/// - [`password`]: Argon2id hashing and verification
/// - [`jwt`]: session token signing and validation
///
/// # Example
///
/// ```no_run
/// use bookshelf_shared::auth::password::{hash_password, verify_password};
/// use bookshelf_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let token = create_token(&Claims::new(Uuid::new_v4(), "reader"), "secret-key")?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod jwt;
pub mod password;

/// Identity of the caller, attached to the request by the bearer middleware
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
}

impl AuthContext {
    pub fn from_claims(claims: jwt::Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}
