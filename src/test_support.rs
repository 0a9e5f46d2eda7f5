//! Shared fixtures for module tests

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::common::config::AppConfig;
use crate::common::dev_mode::DevModeConfig;
use crate::common::migrations::run_migrations;
use crate::common::validation::LocaleCatalog;
use crate::common::AppState;
use crate::i18n::Language;
use crate::services::email::tests::RecordingTransport;
use crate::services::encryption::SecretCipher;

pub const TEST_JWT_SECRET: &str = "test_secret_key";

pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    run_migrations(&pool, Language::English)
        .await
        .expect("migrations");
    pool
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::from_env();
    config.jwt_secret = TEST_JWT_SECRET.to_string();
    config.admin_emails = ["root@example.com".to_string()].into_iter().collect();
    config.default_language = Language::English;
    config
}

pub struct TestApp {
    pub state: AppState,
    pub shared: Arc<RwLock<AppState>>,
    pub transport: Arc<RecordingTransport>,
}

pub async fn test_app() -> TestApp {
    let cipher = SecretCipher::from_key(&SecretCipher::generate_key()).expect("cipher");
    build_test_app(Some(cipher)).await
}

/// App without `ENCRYPTION_MASTER_KEY`; secrets are stored in plain text
pub async fn test_app_without_cipher() -> TestApp {
    build_test_app(None).await
}

async fn build_test_app(cipher: Option<SecretCipher>) -> TestApp {
    let transport = Arc::new(RecordingTransport::default());
    let state = AppState::new(
        test_pool().await,
        &test_config(),
        DevModeConfig::disabled(),
        LocaleCatalog::load(Language::English).expect("catalog"),
        cipher,
        transport.clone(),
    );

    TestApp {
        shared: Arc::new(RwLock::new(state.clone())),
        state,
        transport,
    }
}

/// Inserts a user row directly and returns its id
pub async fn insert_user(
    pool: &SqlitePool,
    id: &str,
    username: &str,
    created_at: &str,
    status: i64,
    mail_status: i64,
) -> String {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, e_mail, display_name, status, mail_status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(format!("{}@example.com", username))
    .bind(username)
    .bind(status)
    .bind(mail_status)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("insert user");
    id.to_string()
}
