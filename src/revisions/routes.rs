// src/revisions/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn revisions_routes() -> Router {
    Router::new().route("/answer/api/v1/revisions", get(handlers::get_revision_list))
}
