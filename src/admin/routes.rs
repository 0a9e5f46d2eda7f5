// src/admin/routes.rs

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers;

pub fn admin_routes() -> Router {
    Router::new()
        // Site settings
        .route(
            "/answer/admin/api/siteinfo/general",
            get(handlers::siteinfo::get_site_general).put(handlers::siteinfo::update_site_general),
        )
        .route(
            "/answer/admin/api/siteinfo/interface",
            get(handlers::siteinfo::get_site_interface)
                .put(handlers::siteinfo::update_site_interface),
        )
        .route(
            "/answer/admin/api/setting/smtp",
            get(handlers::smtp::get_smtp_config).put(handlers::smtp::update_smtp_config),
        )
        .route(
            "/answer/admin/api/theme/options",
            get(handlers::options::get_theme_options),
        )
        .route(
            "/answer/admin/api/language/options",
            get(handlers::options::get_language_options),
        )
        // Users
        .route(
            "/answer/admin/api/users/page",
            get(handlers::users::get_user_page),
        )
        .route(
            "/answer/admin/api/user/status",
            put(handlers::users::update_user_status),
        )
        .route(
            "/answer/admin/api/dashboard",
            get(handlers::dashboard::get_dashboard),
        )
}
