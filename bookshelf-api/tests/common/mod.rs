/// Common test utilities for API tests
///
/// Builds the full router over the in-memory repositories, so these tests
/// need neither PostgreSQL nor network access.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookshelf_api::{
    app::{build_router, AppState},
    config::Config,
};
use bookshelf_shared::{
    auth::jwt::{create_token, Claims},
    models::{book::Book, user::NewUser},
    rating::{BookRating, RatingGateway},
    repository::{
        memory::{MemoryCatalog, MemoryReviews, MemoryUsers},
        UserRepository,
    },
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Isbn the stub rating gateway knows about
pub const RATED_ISBN: &str = "0441172717";

/// Answers for [`RATED_ISBN`] only
pub struct StubRatingGateway;

#[async_trait]
impl RatingGateway for StubRatingGateway {
    async fn fetch_rating(&self, isbn: &str) -> Option<BookRating> {
        (isbn == RATED_ISBN).then(|| BookRating {
            id: 53732,
            isbn: RATED_ISBN.to_string(),
            ratings_count: 42,
            reviews_count: 50,
            average_rating: Some(4.25),
            ..Default::default()
        })
    }
}

pub fn sample_books() -> Vec<Book> {
    vec![
        Book::new("0001234567", "The Hobbit", "J.R.R. Tolkien", 1937),
        Book::new(RATED_ISBN, "Dune", "Frank Herbert", 1965),
        Book::new("1231231234", "Dune Messiah", "Frank Herbert", 1969),
        Book::new("0553293354", "Foundation", "Isaac Asimov", 1951),
    ]
}

pub fn test_config() -> Config {
    let vars: HashMap<&str, &str> = [
        ("DATABASE_URL", "postgresql://localhost/bookshelf_test"),
        ("JWT_SECRET", JWT_SECRET),
    ]
    .into_iter()
    .collect();

    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test config should load")
}

/// Test context with a router over seeded in-memory storage
pub struct TestContext {
    pub app: Router,
    pub reviews: Arc<MemoryReviews>,
    pub users: Arc<MemoryUsers>,
}

impl TestContext {
    pub fn new() -> Self {
        let reviews = Arc::new(MemoryReviews::new());
        let users = Arc::new(MemoryUsers::new());

        let state = AppState::new(
            Arc::new(MemoryCatalog::with_books(sample_books())),
            reviews.clone(),
            users.clone(),
            Arc::new(StubRatingGateway),
            test_config(),
        );

        Self {
            app: build_router(state),
            reviews,
            users,
        }
    }

    /// Stores an account directly and signs a token for it
    pub async fn token(&self, username: &str) -> String {
        let user = self
            .users
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: "not-a-real-hash".to_string(),
            })
            .await
            .expect("user should be created");

        create_token(&Claims::new(user.id, username), JWT_SECRET).expect("token should sign")
    }

    /// Validly signed token whose account does not exist
    pub fn orphan_token(&self) -> String {
        create_token(&Claims::new(Uuid::new_v4(), "ghost"), JWT_SECRET)
            .expect("token should sign")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn post_with_token(&self, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body), Some(token)).await
    }

    /// Runs one request through the router; an empty body comes back as `Value::Null`
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }
}
