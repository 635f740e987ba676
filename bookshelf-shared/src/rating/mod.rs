/// Third-party rating lookups
///
/// Book-detail responses include aggregate rating counts from an external
/// review service. The lookup is best-effort: every failure mode (missing API
/// key, non-200 status, network error, timeout, unexpected body) yields `None`
/// so the detail view still renders.
///
/// - [`http`]: reqwest-backed gateway for the `review_counts.json` endpoint

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

pub mod http;

/// Aggregate rating counts for one book, as reported by the rating service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRating {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub isbn: String,

    #[serde(default)]
    pub isbn13: String,

    #[serde(default)]
    pub ratings_count: u64,

    #[serde(default)]
    pub reviews_count: u64,

    #[serde(default)]
    pub text_reviews_count: u64,

    #[serde(default)]
    pub work_ratings_count: u64,

    #[serde(default)]
    pub work_reviews_count: u64,

    #[serde(default)]
    pub work_text_reviews_count: u64,

    /// Sent by the service as a decimal string ("3.93"); plain numbers are accepted too
    #[serde(default, deserialize_with = "string_or_number")]
    pub average_rating: Option<f64>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Source of [`BookRating`]s
#[async_trait]
pub trait RatingGateway: Send + Sync {
    /// Rating counts for `isbn`, or `None` when the service has nothing usable
    async fn fetch_rating(&self, isbn: &str) -> Option<BookRating>;
}

/// Gateway used when no API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledRatingGateway;

#[async_trait]
impl RatingGateway for DisabledRatingGateway {
    async fn fetch_rating(&self, _isbn: &str) -> Option<BookRating> {
        None
    }
}
