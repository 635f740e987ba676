/// Book catalog records
///
/// Books are written once by the importer and never modified, so there is no
/// update type. The `isbn` is the primary key.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS books (
///     isbn VARCHAR PRIMARY KEY,
///     title VARCHAR NOT NULL,
///     author VARCHAR NOT NULL,
///     year INTEGER NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};

/// Maximum rows returned by a search when the caller does not ask for fewer
pub const DEFAULT_SEARCH_LIMIT: i64 = 500;

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// ISBN, unique across the catalog
    pub isbn: String,

    /// Title as imported
    pub title: String,

    /// Author as imported
    pub author: String,

    /// Publication year
    pub year: i32,
}

impl Book {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year,
        }
    }
}

/// Raw search terms for a catalog query
///
/// Each term is a plain substring; [`BookSearch::patterns`] turns them into
/// `LIKE` patterns. A book matches only when all three fields match, and an
/// empty term matches every value of its field.
///
/// # Example
///
/// ```
/// use bookshelf_shared::models::book::BookSearch;
///
/// let search = BookSearch::new("123", "", "");
/// assert_eq!(search.patterns(), ["%123%".to_string(), "%%".to_string(), "%%".to_string()]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSearch {
    pub isbn: String,
    pub title: String,
    pub author: String,
}

impl BookSearch {
    pub fn new(isbn: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
        }
    }

    /// Wildcard patterns for isbn, title and author, in that order
    pub fn patterns(&self) -> [String; 3] {
        [
            wildcard_pattern(&self.isbn),
            wildcard_pattern(&self.title),
            wildcard_pattern(&self.author),
        ]
    }

    /// Case-insensitive substring match against a book, mirroring the SQL query
    pub fn matches(&self, book: &Book) -> bool {
        contains_ignore_case(&book.isbn, &self.isbn)
            && contains_ignore_case(&book.title, &self.title)
            && contains_ignore_case(&book.author, &self.author)
    }
}

/// Wraps a raw term as `%term%`, escaping `\`, `%` and `_` so they match literally
pub fn wildcard_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
