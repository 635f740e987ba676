/// Catalog endpoints
///
/// - `GET /v1/books/random?limit=`: random sample for the landing view
/// - `GET /v1/books/search?isbn=&title=&author=&limit=`: substring search, all terms ANDed
/// - `GET /v1/books/:isbn`: one book with its reviews and third-party rating counts

use super::reject_nul;
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use bookshelf_shared::{
    models::{
        book::{Book, BookSearch, DEFAULT_SEARCH_LIMIT},
        review::Review,
    },
    rating::BookRating,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

/// Sample size when `limit` is omitted
pub const DEFAULT_RANDOM_LIMIT: i64 = 10;

pub const MAX_RANDOM_LIMIT: i64 = 100;

/// Query parameters for the random sample
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RandomBooksQuery {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

/// Query parameters for search; missing terms match everything
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchBooksQuery {
    #[serde(default)]
    pub isbn: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub author: String,

    #[validate(range(min = 1, max = 500, message = "Limit must be between 1 and 500"))]
    pub limit: Option<i64>,
}

/// List of books
#[derive(Debug, Serialize, Deserialize)]
pub struct BookListResponse {
    pub books: Vec<Book>,
    pub count: usize,
}

impl From<Vec<Book>> for BookListResponse {
    fn from(books: Vec<Book>) -> Self {
        Self {
            count: books.len(),
            books,
        }
    }
}

/// Book detail: the record, its reviews, and rating counts when available
#[derive(Debug, Serialize, Deserialize)]
pub struct BookDetailResponse {
    pub book: Book,
    pub reviews: Vec<Review>,
    pub rating: Option<BookRating>,
}

pub async fn random_books(
    State(state): State<AppState>,
    Query(query): Query<RandomBooksQuery>,
) -> ApiResult<Json<BookListResponse>> {
    query.validate()?;

    let limit = query.limit.unwrap_or(DEFAULT_RANDOM_LIMIT).min(MAX_RANDOM_LIMIT);
    let books = state.catalog.list_random_books(limit).await?;

    Ok(Json(books.into()))
}

pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchBooksQuery>,
) -> ApiResult<Json<BookListResponse>> {
    query.validate()?;
    reject_nul(&[
        ("isbn", query.isbn.as_str()),
        ("title", query.title.as_str()),
        ("author", query.author.as_str()),
    ])?;

    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(DEFAULT_SEARCH_LIMIT);
    let search = BookSearch::new(query.isbn, query.title, query.author);
    let books = state.catalog.search_books(&search, limit).await?;

    debug!(?search, results = books.len(), "Catalog search");

    Ok(Json(books.into()))
}

/// Book detail
///
/// The rating lookup goes out only after both database reads have returned.
///
/// # Errors
///
/// - `404 Not Found`: no book with this isbn
pub async fn book_detail(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> ApiResult<Json<BookDetailResponse>> {
    let book = find_book(&state, &isbn).await?;
    let reviews = state.reviews.list_reviews_for_book(&book.isbn).await?;

    let rating = state.ratings.fetch_rating(&book.isbn).await;

    Ok(Json(BookDetailResponse {
        book,
        reviews,
        rating,
    }))
}

/// Looks up a book or fails with 404
pub(crate) async fn find_book(state: &AppState, isbn: &str) -> ApiResult<Book> {
    let not_found = || ApiError::NotFound(format!("Book {} not found", isbn.escape_debug()));

    // No stored isbn can contain NUL
    if isbn.contains('\0') {
        return Err(not_found());
    }

    state
        .catalog
        .get_book_by_isbn(isbn)
        .await?
        .ok_or_else(not_found)
}
