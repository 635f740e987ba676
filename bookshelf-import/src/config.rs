/// Importer configuration
///
/// Only `DATABASE_URL` is read. A `.env` file in the working directory is
/// loaded first when present.

use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub database_url: String,
}

impl ImportConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        Ok(Self { database_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_required() {
        assert!(ImportConfig::from_lookup(|_| None).is_err());
        assert!(ImportConfig::from_lookup(|_| Some("  ".to_string())).is_err());
    }

    #[test]
    fn test_database_url_read() {
        let config = ImportConfig::from_lookup(|key| {
            (key == "DATABASE_URL").then(|| "postgresql://localhost/bookshelf".to_string())
        })
        .unwrap();

        assert_eq!(config.database_url, "postgresql://localhost/bookshelf");
    }
}
