// src/main.rs
use axum::{extract::Extension, middleware, Router};
use clap::Parser;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod admin;
mod auth;
mod cli;
mod common;
mod i18n;
mod logging_middleware;
mod revisions;
mod services;
mod siteinfo;
mod users;

#[cfg(test)]
mod test_support;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use cli::{Cli, Command};
use common::config::{load_env_file, AppConfig};
use common::dev_mode::{log_dev_mode_status, DevModeConfig};
use common::validation::LocaleCatalog;
use common::AppState;
use services::cache::CacheService;
use services::email::SmtpMailer;
use services::encryption::SecretCipher;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let env_file = load_env_file(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Some(path) = &env_file {
        info!(path = %path.display(), "Loaded configuration file");
    }

    let config = AppConfig::from_env();

    let command = cli.command.unwrap_or(Command::Run {
        dev: false,
        prod: false,
    });

    match command {
        Command::Init {
            admin_username,
            admin_email,
        } => cli::init(&config, &admin_username, admin_email).await,
        Command::Check => cli::check(&config).await,
        Command::Upgrade => cli::upgrade(&config).await,
        Command::Dump { path } => cli::dump(&config, path).await.map(|_| ()),
        Command::Token { user_id, hours } => cli::token(&config, &user_id, hours),
        Command::GenKey => {
            cli::gen_key();
            Ok(())
        }
        run @ Command::Run { .. } => {
            let dev_mode = DevModeConfig::from_env().with_cli_override(run.dev_mode_override());
            run_server(config, dev_mode).await
        }
    }
}

async fn run_server(config: AppConfig, dev_mode: DevModeConfig) -> anyhow::Result<()> {
    info!(admin_emails = config.admin_emails.len(), "Loaded admin emails");
    log_dev_mode_status(&dev_mode);

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    let pool = cli::connect(&config).await?;
    common::migrations::run_migrations(&pool, config.default_language).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let catalog = LocaleCatalog::load(config.default_language)?;
    info!(default_language = %catalog.default_language(), "Message catalogs loaded");

    let cipher = match SecretCipher::from_env() {
        Ok(cipher) => Some(cipher),
        Err(e) => {
            warn!(error = %e, "SMTP password will be stored unencrypted");
            None
        }
    };

    let app_state = AppState::new(
        pool,
        &config,
        dev_mode,
        catalog,
        cipher,
        Arc::new(SmtpMailer),
    );
    CacheService::start_cleanup_task(app_state.cache.clone());
    info!("Services initialized");

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let origins: Vec<axum::http::HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let app = Router::new()
        .merge(auth::auth_routes())
        .merge(siteinfo::siteinfo_routes())
        .merge(revisions::revisions_routes())
        .merge(admin::admin_routes())
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared.clone()))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::ACCEPT_LANGUAGE,
                ])
                .allow_credentials(true),
        )
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
