/// PostgreSQL repositories
///
/// Each repository wraps a clone of the shared `PgPool`; cloning is cheap and
/// the pool handles concurrency. All queries use bind parameters.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    CatalogRepository, RepositoryError, RepositoryResult, ReviewRepository, UserRepository,
};
use crate::db::pool::health_check;
use crate::models::{
    book::{Book, BookSearch},
    review::{Review, ValidReview},
    user::{NewUser, User},
};

/// Turns constraint violations into [`RepositoryError::AlreadyExists`] or
/// [`RepositoryError::MissingReference`]
fn map_constraint_violation(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some("users_username_key") => "username",
                Some("users_email_key") => "email",
                Some("books_pkey") => "isbn",
                _ => "record",
            };
            return RepositoryError::AlreadyExists { field };
        }

        if db_err.is_foreign_key_violation() {
            let field = match db_err.constraint() {
                Some("reviews_user_id_fkey") => "user",
                _ => "record",
            };
            return RepositoryError::MissingReference { field };
        }
    }
    RepositoryError::Database(err)
}

/// Book catalog backed by the `books` table
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalog {
    async fn list_random_books(&self, limit: i64) -> RepositoryResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, title, author, year
            FROM books
            ORDER BY RANDOM()
            LIMIT $1
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn search_books(&self, search: &BookSearch, limit: i64) -> RepositoryResult<Vec<Book>> {
        let [isbn, title, author] = search.patterns();
        debug!(isbn = %isbn, title = %title, author = %author, limit, "Searching catalog");

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, title, author, year
            FROM books
            WHERE isbn ILIKE $1 ESCAPE '\'
              AND title ILIKE $2 ESCAPE '\'
              AND author ILIKE $3 ESCAPE '\'
            LIMIT $4
            "#,
        )
        .bind(isbn)
        .bind(title)
        .bind(author)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> RepositoryResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, title, author, year
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn insert_books(&self, books: &[Book]) -> RepositoryResult<u64> {
        let mut tx = self.pool.begin().await?;

        for book in books {
            sqlx::query("INSERT INTO books (isbn, title, author, year) VALUES ($1, $2, $3, $4)")
                .bind(&book.isbn)
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.year)
                .execute(&mut *tx)
                .await
                .map_err(map_constraint_violation)?;
        }

        // Dropping `tx` on an early return above rolls the batch back
        tx.commit().await?;

        info!(rows = books.len(), "Inserted books");
        Ok(books.len() as u64)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}

/// Reviews backed by the `reviews` table
#[derive(Debug, Clone)]
pub struct PgReviews {
    pool: PgPool,
}

impl PgReviews {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviews {
    async fn add_review(&self, review: ValidReview) -> RepositoryResult<Review> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, isbn, review_text, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, isbn, review_text, rating, created_at
            "#,
        )
        .bind(review.user_id())
        .bind(review.isbn())
        .bind(review.text())
        .bind(review.rating())
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)?;

        debug!(review_id = %review.id, isbn = %review.isbn, "Review stored");
        Ok(review)
    }

    async fn list_reviews_for_book(&self, isbn: &str) -> RepositoryResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, isbn, review_text, rating, created_at
            FROM reviews
            WHERE isbn = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(isbn)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}

/// Accounts backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgUsers {
    pool: PgPool,
}

impl PgUsers {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUsers {
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_constraint_violation)?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
