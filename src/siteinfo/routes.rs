// src/siteinfo/routes.rs

use axum::{routing::get, Router};

use super::handlers;

pub fn siteinfo_routes() -> Router {
    Router::new().route("/answer/api/v1/siteinfo", get(handlers::get_site_info))
}
