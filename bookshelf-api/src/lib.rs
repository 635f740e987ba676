//! # Bookshelf API Server Library
//!
//! Router, handlers and configuration for the Bookshelf catalog service.
//! The binary in `main.rs` wires these to PostgreSQL; tests wire them to
//! the in-memory repositories.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Bearer authentication and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
