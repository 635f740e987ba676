/// Review endpoints
///
/// - `GET /v1/books/:isbn/reviews`: reviews in posting order
/// - `POST /v1/books/:isbn/reviews`: post a review (bearer token required)
///
/// Reviews reference books by isbn without a database foreign key, so both
/// handlers check that the book exists first.

use super::books::find_book;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use bookshelf_shared::{
    auth::AuthContext,
    models::review::{NewReview, Review},
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Review body as posted by the user
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub rating: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponse {
    pub isbn: String,
    pub reviews: Vec<Review>,
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> ApiResult<Json<ReviewListResponse>> {
    let book = find_book(&state, &isbn).await?;
    let reviews = state.reviews.list_reviews_for_book(&book.isbn).await?;

    Ok(Json(ReviewListResponse {
        isbn: book.isbn,
        reviews,
    }))
}

/// Posts a review as the authenticated user
///
/// # Errors
///
/// - `401 Unauthorized`: missing or invalid token, or the token's account no longer exists
/// - `404 Not Found`: unknown isbn
/// - `422 Unprocessable Entity`: text outside 10..=10000 characters, text containing NUL, or non-finite rating
pub async fn create_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(isbn): Path<String>,
    Json(req): Json<CreateReviewRequest>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    if state.users.find_by_id(auth.user_id).await?.is_none() {
        return Err(ApiError::Unauthorized("Account no longer exists".to_string()));
    }

    let book = find_book(&state, &isbn).await?;

    let review = NewReview {
        user_id: auth.user_id,
        isbn: book.isbn,
        text: req.text,
        rating: req.rating,
    }
    .validate()?;

    let review = state.reviews.add_review(review).await?;
    info!(review_id = %review.id, user_id = %auth.user_id, isbn = %review.isbn, "Review posted");

    Ok((StatusCode::CREATED, Json(review)))
}
