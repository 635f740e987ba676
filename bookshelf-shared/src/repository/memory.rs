/// In-memory repositories
///
/// Same contracts as the PostgreSQL implementations, held behind
/// `tokio::sync::RwLock`. Used by the unit and HTTP tests, which then run
/// without a database.
///
/// # Example
///
/// ```
/// use bookshelf_shared::models::book::Book;
/// use bookshelf_shared::repository::{memory::MemoryCatalog, CatalogRepository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let catalog = MemoryCatalog::with_books(vec![Book::new("0001", "T1", "A1", 2000)]);
/// assert!(catalog.get_book_by_isbn("0001").await?.is_some());
/// # Ok(())
/// # }
/// ```

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CatalogRepository, RepositoryError, RepositoryResult, ReviewRepository, UserRepository,
};
use crate::models::{
    book::{Book, BookSearch},
    review::{Review, ValidReview},
    user::{NewUser, User},
};

fn clamp_limit(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

/// Catalog keyed by isbn
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    books: RwLock<BTreeMap<String, Book>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the catalog; later entries win on duplicate isbns
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let books = books
            .into_iter()
            .map(|book| (book.isbn.clone(), book))
            .collect();

        Self {
            books: RwLock::new(books),
        }
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn list_random_books(&self, limit: i64) -> RepositoryResult<Vec<Book>> {
        let mut books: Vec<Book> = self.books.read().await.values().cloned().collect();
        books.shuffle(&mut rand::thread_rng());
        books.truncate(clamp_limit(limit));
        Ok(books)
    }

    async fn search_books(&self, search: &BookSearch, limit: i64) -> RepositoryResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(books
            .values()
            .filter(|book| search.matches(book))
            .take(clamp_limit(limit))
            .cloned()
            .collect())
    }

    async fn get_book_by_isbn(&self, isbn: &str) -> RepositoryResult<Option<Book>> {
        Ok(self.books.read().await.get(isbn).cloned())
    }

    async fn insert_books(&self, books: &[Book]) -> RepositoryResult<u64> {
        let mut stored = self.books.write().await;

        let mut seen = HashSet::with_capacity(books.len());
        for book in books {
            if stored.contains_key(&book.isbn) || !seen.insert(book.isbn.as_str()) {
                return Err(RepositoryError::AlreadyExists { field: "isbn" });
            }
        }

        for book in books {
            stored.insert(book.isbn.clone(), book.clone());
        }

        Ok(books.len() as u64)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Reviews in insertion order
#[derive(Debug, Default)]
pub struct MemoryReviews {
    reviews: RwLock<Vec<Review>>,
}

impl MemoryReviews {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for MemoryReviews {
    async fn add_review(&self, review: ValidReview) -> RepositoryResult<Review> {
        let review = Review {
            id: Uuid::new_v4(),
            user_id: review.user_id(),
            isbn: review.isbn().to_string(),
            review_text: review.text().to_string(),
            rating: review.rating(),
            created_at: Utc::now(),
        };

        self.reviews.write().await.push(review.clone());
        Ok(review)
    }

    async fn list_reviews_for_book(&self, isbn: &str) -> RepositoryResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews.iter().filter(|r| r.isbn == isbn).cloned().collect())
    }
}

/// Accounts with username and email uniqueness
#[derive(Debug, Default)]
pub struct MemoryUsers {
    users: RwLock<Vec<User>>,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn create_user(&self, user: NewUser) -> RepositoryResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::AlreadyExists { field: "username" });
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists { field: "email" });
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::DEFAULT_SEARCH_LIMIT;
    use crate::models::review::NewReview;

    fn sample_catalog() -> MemoryCatalog {
        MemoryCatalog::with_books(vec![
            Book::new("0001234567", "The Hobbit", "J.R.R. Tolkien", 1937),
            Book::new("0441172717", "Dune", "Frank Herbert", 1965),
            Book::new("1231231234", "Dune Messiah", "Frank Herbert", 1969),
            Book::new("0553293354", "Foundation", "Isaac Asimov", 1951),
        ])
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_book_by_isbn() {
        let catalog = sample_catalog();

        let book = catalog.get_book_by_isbn("0441172717").await.unwrap();
        assert_eq!(book, Some(Book::new("0441172717", "Dune", "Frank Herbert", 1965)));

        assert_eq!(catalog.get_book_by_isbn("9999999999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_search_returns_everything_up_to_limit() {
        let catalog = sample_catalog();

        let all = catalog
            .search_books(&BookSearch::default(), DEFAULT_SEARCH_LIMIT)
            .await
            .unwrap();
        assert_eq!(all.len(), 4);

        let capped = catalog.search_books(&BookSearch::default(), 2).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn test_isbn_search_filters_on_substring() {
        let catalog = sample_catalog();

        let hits = catalog
            .search_books(&BookSearch::new("123", "", ""), DEFAULT_SEARCH_LIMIT)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|b| b.isbn.contains("123")));
    }

    #[tokio::test]
    async fn test_search_is_conjunctive() {
        let catalog = sample_catalog();

        let hits = catalog
            .search_books(&BookSearch::new("", "dune", "herbert"), DEFAULT_SEARCH_LIMIT)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);

        let none = catalog
            .search_books(&BookSearch::new("", "dune", "asimov"), DEFAULT_SEARCH_LIMIT)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_random_books_respects_limit() {
        let catalog = sample_catalog();

        assert_eq!(catalog.list_random_books(3).await.unwrap().len(), 3);
        assert_eq!(catalog.list_random_books(10).await.unwrap().len(), 4);
        assert!(catalog.list_random_books(-1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_books_is_all_or_nothing() {
        let catalog = sample_catalog();

        let result = catalog
            .insert_books(&[
                Book::new("5550000001", "New", "Author", 2020),
                Book::new("0441172717", "Dune again", "Frank Herbert", 1965),
            ])
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { field: "isbn" })
        ));
        assert_eq!(catalog.len().await, 4);
        assert_eq!(catalog.get_book_by_isbn("5550000001").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_insert_books_rejects_duplicates_within_batch() {
        let catalog = MemoryCatalog::new();

        let result = catalog
            .insert_books(&[
                Book::new("0001", "T1", "A1", 2000),
                Book::new("0001", "T1 again", "A1", 2000),
            ])
            .await;

        assert!(result.is_err());
        assert!(catalog.is_empty().await);
    }

    #[tokio::test]
    async fn test_reviews_are_listed_per_book() {
        let reviews = MemoryReviews::new();
        let user_id = Uuid::new_v4();

        for (isbn, text) in [
            ("0001", "first review text"),
            ("0002", "other book review"),
            ("0001", "second review text"),
        ] {
            let valid = NewReview {
                user_id,
                isbn: isbn.to_string(),
                text: text.to_string(),
                rating: 4.0,
            }
            .validate()
            .unwrap();
            reviews.add_review(valid).await.unwrap();
        }

        let listed = reviews.list_reviews_for_book("0001").await.unwrap();
        let texts: Vec<&str> = listed.iter().map(|r| r.review_text.as_str()).collect();
        assert_eq!(texts, ["first review text", "second review text"]);

        assert!(reviews.list_reviews_for_book("0003").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_rejected() {
        let users = MemoryUsers::new();
        let created = users
            .create_user(new_user("reader", "reader@example.com"))
            .await
            .unwrap();

        assert!(matches!(
            users.create_user(new_user("reader", "other@example.com")).await,
            Err(RepositoryError::AlreadyExists { field: "username" })
        ));
        assert!(matches!(
            users.create_user(new_user("other", "reader@example.com")).await,
            Err(RepositoryError::AlreadyExists { field: "email" })
        ));

        assert_eq!(users.find_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(users.find_by_username("reader").await.unwrap(), Some(created));
        assert_eq!(users.find_by_username("nobody").await.unwrap(), None);
    }
}
