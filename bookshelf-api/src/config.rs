/// Configuration management for the API server
///
/// Configuration comes from environment variables (optionally seeded from a
/// `.env` file) and is validated once at startup.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `API_HOST` / `API_PORT`: bind address (default: 0.0.0.0:8080)
/// - `CORS_ORIGINS`: comma-separated allowed origins, `*` for any (default: `*`)
/// - `PRODUCTION`: enables HSTS (default: false)
/// - `JWT_SECRET`: session token signing key, at least 32 characters (required)
/// - `JWT_EXPIRATION_HOURS`: session length (default: 24)
/// - `RATING_API_KEY`: rating service key; lookups are disabled when unset
/// - `RATING_API_URL`: rating service root (default: https://www.goodreads.com)
/// - `RATING_API_TIMEOUT_SECONDS`: per-lookup timeout (default: 5)
///
/// # Example
///
/// ```no_run
/// use bookshelf_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use bookshelf_shared::rating::http::{RatingGatewayConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::{env, time::Duration};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rating: RatingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` means permissive
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing key. Generate with: `openssl rand -hex 32`
    pub secret: String,

    pub expiration_hours: i64,
}

/// External rating service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
    /// None disables rating lookups
    pub api_key: Option<String>,

    pub base_url: String,

    pub timeout_seconds: u64,
}

impl RatingConfig {
    /// Gateway settings, or None when no API key is configured
    pub fn gateway_config(&self) -> Option<RatingGatewayConfig> {
        self.api_key.as_ref().map(|key| RatingGatewayConfig {
            base_url: self.base_url.clone(),
            api_key: key.clone(),
            timeout: Duration::from_secs(self.timeout_seconds),
        })
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `JWT_SECRET` is missing, the
    /// secret is shorter than 32 characters, or a numeric variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from any key/value source
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let api_host = non_empty("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = non_empty("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = non_empty("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = non_empty("PRODUCTION")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let database_url = non_empty("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = non_empty("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = non_empty("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let expiration_hours = non_empty("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|| "24".to_string())
            .parse::<i64>()?;

        let rating_timeout = non_empty("RATING_API_TIMEOUT_SECONDS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u64>()?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_hours,
            },
            rating: RatingConfig {
                api_key: non_empty("RATING_API_KEY"),
                base_url: non_empty("RATING_API_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout_seconds: rating_timeout,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}
