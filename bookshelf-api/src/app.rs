/// Application state and router builder
///
/// `AppState` is the application context: built once in `main` and handed to
/// every handler through axum's `State` extractor. It owns the repositories,
/// the rating gateway and the configuration; there is no other global state.
///
/// # Example
///
/// ```no_run
/// use bookshelf_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::from_pool(pool, config)?);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::{auth::require_bearer, security::SecurityHeadersLayer}};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use bookshelf_shared::{
    rating::{http::HttpRatingGateway, DisabledRatingGateway, RatingGateway},
    repository::{
        postgres::{PgCatalog, PgReviews, PgUsers},
        CatalogRepository, ReviewRepository, UserRepository,
    },
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

/// Shared application state
///
/// Cloned for each request; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub users: Arc<dyn UserRepository>,
    pub ratings: Arc<dyn RatingGateway>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        reviews: Arc<dyn ReviewRepository>,
        users: Arc<dyn UserRepository>,
        ratings: Arc<dyn RatingGateway>,
        config: Config,
    ) -> Self {
        Self {
            catalog,
            reviews,
            users,
            ratings,
            config: Arc::new(config),
        }
    }

    /// PostgreSQL repositories over `pool`, plus the rating gateway the config asks for
    pub fn from_pool(pool: PgPool, config: Config) -> anyhow::Result<Self> {
        let ratings: Arc<dyn RatingGateway> = match config.rating.gateway_config() {
            Some(gateway_config) => {
                info!(base_url = %gateway_config.base_url, "Rating lookups enabled");
                Arc::new(HttpRatingGateway::new(gateway_config)?)
            }
            None => {
                info!("RATING_API_KEY not set, rating lookups disabled");
                Arc::new(DisabledRatingGateway)
            }
        };

        Ok(Self::new(
            Arc::new(PgCatalog::new(pool.clone())),
            Arc::new(PgReviews::new(pool.clone())),
            Arc::new(PgUsers::new(pool)),
            ratings,
            config,
        ))
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register
///     │   └── POST /login
///     └── /books/
///         ├── GET  /random
///         ├── GET  /search
///         ├── GET  /:isbn
///         ├── GET  /:isbn/reviews
///         └── POST /:isbn/reviews      (bearer token)
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let create_review = post(routes::reviews::create_review).route_layer(
        axum::middleware::from_fn_with_state(state.clone(), require_bearer),
    );

    let book_routes = Router::new()
        .route("/random", get(routes::books::random_books))
        .route("/search", get(routes::books::search_books))
        .route("/:isbn", get(routes::books::book_detail))
        .route(
            "/:isbn/reviews",
            get(routes::reviews::list_reviews).merge(create_review),
        );

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/books", book_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
