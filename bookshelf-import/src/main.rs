//! # Bookshelf Catalog Importer
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/bookshelf cargo run -p bookshelf-import -- books.csv
//! ```
//!
//! Exits non-zero when the file cannot be read, a row is malformed, or any
//! insert fails. A failed import leaves the `books` table unchanged.

use bookshelf_import::{config::ImportConfig, run, Cli};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf_import=info,bookshelf_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ImportConfig::from_env()?;

    tracing::info!(file = %cli.file.display(), "Starting catalog import");

    match run(&cli, &config).await {
        Ok(summary) => {
            tracing::info!(rows = summary.rows_imported, "import successful");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "import failed");
            Err(e)
        }
    }
}
