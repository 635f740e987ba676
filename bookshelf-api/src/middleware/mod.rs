/// Custom middleware for the API server
///
/// - `security`: security response headers
/// - `auth`: bearer-token authentication for write routes

pub mod auth;
pub mod security;
