//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// # Routes
/// - `GET /answer/api/v1/user/info` - Current user information
pub fn auth_routes() -> Router {
    Router::new().route("/answer/api/v1/user/info", get(handlers::user_info_handler))
}
