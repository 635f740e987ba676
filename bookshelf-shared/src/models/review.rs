/// Reviews and their validation rules
///
/// A review is written through a two-step flow: callers build a [`NewReview`]
/// from untrusted input, call [`NewReview::validate`], and hand the resulting
/// [`ValidReview`] to a `ReviewRepository`. Repositories only accept the
/// validated type, so an out-of-range review never reaches storage.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS reviews (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id),
///     isbn VARCHAR NOT NULL,            -- soft reference to books.isbn
///     review_text TEXT NOT NULL,
///     rating DOUBLE PRECISION NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest accepted review, in characters
pub const MIN_REVIEW_CHARS: usize = 10;

/// Longest accepted review, in characters
pub const MAX_REVIEW_CHARS: usize = 10_000;

/// A stored review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,

    /// Author of the review
    pub user_id: Uuid,

    /// Reviewed book
    pub isbn: String,

    pub review_text: String,

    pub rating: f64,

    pub created_at: DateTime<Utc>,
}

/// Review input as received from a caller
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub user_id: Uuid,
    pub isbn: String,
    pub text: String,
    pub rating: f64,
}

/// Review input that passed [`NewReview::validate`]
///
/// Fields are private; the only way to obtain one is through validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReview {
    user_id: Uuid,
    isbn: String,
    text: String,
    rating: f64,
}

/// Reasons a review is rejected before it is stored
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReviewValidationError {
    #[error("Review must be between {MIN_REVIEW_CHARS} and {MAX_REVIEW_CHARS} characters, got {0}")]
    TextLength(usize),

    #[error("Review must not contain NUL characters")]
    ContainsNul,

    #[error("Rating must be a finite number")]
    RatingNotFinite,
}

impl ReviewValidationError {
    /// Name of the offending input field
    pub fn field(&self) -> &'static str {
        match self {
            ReviewValidationError::TextLength(_) | ReviewValidationError::ContainsNul => "text",
            ReviewValidationError::RatingNotFinite => "rating",
        }
    }
}

impl NewReview {
    /// Checks length and rating constraints
    ///
    /// Length is counted in characters, not bytes. NUL is rejected since
    /// PostgreSQL text columns cannot store it.
    pub fn validate(self) -> Result<ValidReview, ReviewValidationError> {
        let length = self.text.chars().count();
        if !(MIN_REVIEW_CHARS..=MAX_REVIEW_CHARS).contains(&length) {
            return Err(ReviewValidationError::TextLength(length));
        }

        if self.text.contains('\0') {
            return Err(ReviewValidationError::ContainsNul);
        }

        if !self.rating.is_finite() {
            return Err(ReviewValidationError::RatingNotFinite);
        }

        Ok(ValidReview {
            user_id: self.user_id,
            isbn: self.isbn,
            text: self.text,
            rating: self.rating,
        })
    }
}

impl ValidReview {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }
}
