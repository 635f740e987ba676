//! # Bookshelf Shared Library
//!
//! Types, storage and integrations shared by the Bookshelf API server and the
//! catalog importer.
//!
//! ## Module Organization
//!
//! - `auth`: password hashing and session tokens
//! - `db`: connection pool and embedded migrations
//! - `importer`: CSV catalog loader
//! - `models`: plain data records (books, reviews, users)
//! - `rating`: external rating-service gateway
//! - `repository`: data-access traits with PostgreSQL and in-memory implementations

pub mod auth;
pub mod db;
pub mod importer;
pub mod models;
pub mod rating;
pub mod repository;

/// Current version of the Bookshelf shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
