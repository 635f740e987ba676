/// API route handlers, organized by resource
///
/// - `health`: liveness and database connectivity
/// - `auth`: registration and login
/// - `books`: random sample, search, detail
/// - `reviews`: list and create reviews for a book

pub mod auth;
pub mod books;
pub mod health;
pub mod reviews;

use crate::error::{ApiError, ApiResult};

/// Rejects NUL characters, which PostgreSQL text columns cannot hold
pub(crate) fn reject_nul(fields: &[(&'static str, &str)]) -> ApiResult<()> {
    match fields.iter().find(|(_, value)| value.contains('\0')) {
        Some((field, _)) => Err(ApiError::invalid_field(
            *field,
            "Must not contain NUL characters",
        )),
        None => Ok(()),
    }
}
