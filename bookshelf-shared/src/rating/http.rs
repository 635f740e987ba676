/// HTTP rating gateway
///
/// Issues `GET {base_url}/book/review_counts.json?key=..&isbns=..` once per
/// lookup with a bounded client timeout. No retries. Nothing here touches the
/// database, so callers never hold a transaction open across the request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use super::{BookRating, RatingGateway};

/// Default service root
pub const DEFAULT_BASE_URL: &str = "https://www.goodreads.com";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors inside the gateway; never returned from [`RatingGateway::fetch_rating`]
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    #[error("Rating request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Connection settings for the rating service
#[derive(Debug, Clone)]
pub struct RatingGatewayConfig {
    /// Service root, without trailing slash
    pub base_url: String,

    pub api_key: String,

    /// Upper bound on the whole request, including body download
    pub timeout: Duration,
}

impl RatingGatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReviewCountsResponse {
    books: Vec<BookRating>,
}

/// reqwest-backed [`RatingGateway`]
#[derive(Debug, Clone)]
pub struct HttpRatingGateway {
    client: reqwest::Client,
    config: RatingGatewayConfig,
}

impl HttpRatingGateway {
    pub fn new(config: RatingGatewayConfig) -> Result<Self, RatingError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/book/review_counts.json",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// One lookup; non-200 responses are `Ok(None)`, transport and decode failures are errors
    pub async fn try_fetch(&self, isbn: &str) -> Result<Option<BookRating>, RatingError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("key", self.config.api_key.as_str()), ("isbns", isbn)])
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            warn!(isbn, status = %response.status(), "Rating service returned no data");
            return Ok(None);
        }

        let body: ReviewCountsResponse = response.json().await?;
        let rating = body.books.into_iter().next();
        if rating.is_none() {
            warn!(isbn, "Rating service response had no books");
        }
        Ok(rating)
    }
}

#[async_trait]
impl RatingGateway for HttpRatingGateway {
    async fn fetch_rating(&self, isbn: &str) -> Option<BookRating> {
        match self.try_fetch(isbn).await {
            Ok(rating) => rating,
            Err(e) => {
                warn!(isbn, error = %e, "Rating lookup failed");
                None
            }
        }
    }
}
