/// Data-access interfaces
///
/// One trait per entity, exposing only the operations the application uses.
/// Handlers and the importer depend on these traits, never on `PgPool`
/// directly, so the same code runs against PostgreSQL in production and
/// against the in-memory stores in tests.
///
/// - [`postgres`]: sqlx implementations backed by a `PgPool`
/// - [`memory`]: `RwLock`-guarded implementations for tests and demos
///
/// # Example
///
/// ```no_run
/// use bookshelf_shared::models::book::{BookSearch, DEFAULT_SEARCH_LIMIT};
/// use bookshelf_shared::repository::{postgres::PgCatalog, CatalogRepository};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = PgCatalog::new(pool);
/// let hits = catalog
///     .search_books(&BookSearch::new("", "dune", ""), DEFAULT_SEARCH_LIMIT)
///     .await?;
/// println!("{} matches", hits.len());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    book::{Book, BookSearch},
    review::{Review, ValidReview},
    user::{NewUser, User},
};

pub mod memory;
pub mod postgres;

/// Result alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by repositories
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write
    #[error("{field} already exists")]
    AlreadyExists { field: &'static str },

    /// A foreign key points at a row that does not exist
    #[error("Referenced {field} does not exist")]
    MissingReference { field: &'static str },

    /// Any other storage failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to the book catalog, plus the bulk load used by the importer
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Up to `limit` books in a fresh random order on every call
    async fn list_random_books(&self, limit: i64) -> RepositoryResult<Vec<Book>>;

    /// Books whose isbn, title and author all contain the corresponding term
    ///
    /// Matching is case-insensitive; empty terms match everything. At most
    /// `limit` rows are returned, in no particular order.
    async fn search_books(&self, search: &BookSearch, limit: i64) -> RepositoryResult<Vec<Book>>;

    /// Exact isbn lookup; `None` when the isbn is unknown
    async fn get_book_by_isbn(&self, isbn: &str) -> RepositoryResult<Option<Book>>;

    /// Inserts every book or none of them
    ///
    /// A duplicate isbn (within `books` or against stored rows) fails the
    /// whole batch with [`RepositoryError::AlreadyExists`].
    async fn insert_books(&self, books: &[Book]) -> RepositoryResult<u64>;

    /// Cheap liveness probe for health checks
    async fn ping(&self) -> RepositoryResult<()>;
}

/// Review storage
///
/// Reviews hold a soft reference to their book: implementations do not check
/// that the isbn exists. Callers that need that guarantee look the book up first.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn add_review(&self, review: ValidReview) -> RepositoryResult<Review>;

    /// All reviews for `isbn`, oldest first
    async fn list_reviews_for_book(&self, isbn: &str) -> RepositoryResult<Vec<Review>>;
}

/// Account storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with [`RepositoryError::AlreadyExists`] when the username or email is taken
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
}
