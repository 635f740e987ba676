//! # Bookshelf Catalog Importer
//!
//! One-shot loader that reads a `isbn,title,author,year` CSV file and writes
//! every row into the `books` table in a single transaction.
//!
//! ## Modules
//!
//! - `config`: Environment configuration
//!
//! ## Example
//!
//! ```no_run
//! use bookshelf_import::{config::ImportConfig, run, Cli};
//! use clap::Parser;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cli = Cli::parse_from(["bookshelf-import", "books.csv"]);
//! let summary = run(&cli, &ImportConfig::from_env()?).await?;
//! println!("{} rows", summary.rows_imported);
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use bookshelf_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    importer::{import_books, ImportSummary},
    repository::postgres::PgCatalog,
};
use clap::Parser;
use std::{fs::File, path::PathBuf};

pub mod config;

use config::ImportConfig;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "bookshelf-import", version, about = "Load a book catalog CSV into PostgreSQL")]
pub struct Cli {
    /// CSV file with a header row and isbn,title,author,year columns
    #[arg(default_value = "books.csv")]
    pub file: PathBuf,

    /// Skip running schema migrations before the import
    #[arg(long)]
    pub skip_migrations: bool,
}

/// Opens the file, connects, migrates and imports
///
/// The file is opened before connecting so a bad path fails fast.
pub async fn run(cli: &Cli, config: &ImportConfig) -> anyhow::Result<ImportSummary> {
    let file = File::open(&cli.file)
        .with_context(|| format!("Failed to open {}", cli.file.display()))?;

    let pool = create_pool(DatabaseConfig::with_url(config.database_url.clone())).await?;

    if !cli.skip_migrations {
        run_migrations(&pool).await?;
    }

    let result = import_books(&PgCatalog::new(pool.clone()), file).await;
    close_pool(pool).await;

    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_books_csv() {
        let cli = Cli::try_parse_from(["bookshelf-import"]).unwrap();

        assert_eq!(cli.file, PathBuf::from("books.csv"));
        assert!(!cli.skip_migrations);
    }

    #[test]
    fn test_cli_accepts_path_and_flag() {
        let cli =
            Cli::try_parse_from(["bookshelf-import", "data/catalog.csv", "--skip-migrations"])
                .unwrap();

        assert_eq!(cli.file, PathBuf::from("data/catalog.csv"));
        assert!(cli.skip_migrations);
    }

    #[tokio::test]
    async fn test_missing_file_fails_before_connecting() {
        let cli = Cli::try_parse_from(["bookshelf-import", "/nonexistent/books.csv"]).unwrap();
        let config = ImportConfig {
            database_url: "postgresql://127.0.0.1:1/unreachable".to_string(),
        };

        let err = run(&cli, &config).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/books.csv"));
    }
}
