/// CSV catalog loader
///
/// Reads `isbn,title,author,year` rows (header first) and writes them through
/// [`CatalogRepository::insert_books`]. The whole file is parsed before
/// anything is written, and the write itself is a single transaction, so an
/// import either lands completely or not at all.
///
/// # Example
///
/// ```no_run
/// use bookshelf_shared::importer::import_books;
/// use bookshelf_shared::repository::postgres::PgCatalog;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("books.csv")?;
/// let summary = import_books(&PgCatalog::new(pool), file).await?;
/// println!("imported {} books", summary.rows_imported);
/// # Ok(())
/// # }
/// ```

use std::io::Read;

use tracing::{debug, info};

use crate::models::book::Book;
use crate::repository::{CatalogRepository, RepositoryError};

/// Columns expected in every row
pub const EXPECTED_COLUMNS: usize = 4;

/// Errors that abort an import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("Failed to store books: {0}")]
    Storage(#[from] RepositoryError),
}

/// Outcome of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_imported: u64,
}

/// Parses every data row of a CSV source into books
///
/// Fails on the first row that does not have exactly four columns or whose
/// year is not an integer.
pub fn read_books<R: Read>(reader: R) -> Result<Vec<Book>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut books = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != EXPECTED_COLUMNS {
            return Err(ImportError::InvalidRow {
                line,
                reason: format!("expected {} columns, found {}", EXPECTED_COLUMNS, record.len()),
            });
        }

        let year = record[3].trim().parse::<i32>().map_err(|_| ImportError::InvalidRow {
            line,
            reason: format!("year {:?} is not an integer", &record[3]),
        })?;

        books.push(Book::new(&record[0], &record[1], &record[2], year));
    }

    debug!(rows = books.len(), "Parsed catalog CSV");
    Ok(books)
}

/// Parses `reader` and stores every row in one batch
pub async fn import_books<C, R>(catalog: &C, reader: R) -> Result<ImportSummary, ImportError>
where
    C: CatalogRepository + ?Sized,
    R: Read,
{
    let books = read_books(reader)?;
    let rows_imported = catalog.insert_books(&books).await?;

    info!(rows_imported, "Catalog import finished");
    Ok(ImportSummary { rows_imported })
}
