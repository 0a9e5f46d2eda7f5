// src/common/migrations.rs
//! Database schema creation and seeded defaults

use serde_json::json;
use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

use crate::common::{generate_user_id, now_timestamp};
use crate::i18n::Language;
use crate::services::email::EmailConfig;
use crate::siteinfo::models::{SITE_TYPE_GENERAL, SITE_TYPE_INTERFACE, SITE_TYPE_SMTP};
use crate::users::models::{EMAIL_STATUS_AVAILABLE, USER_STATUS_AVAILABLE};

/// Tables the service needs, in creation order
pub const TABLES: [&str; 3] = ["users", "site_info", "revisions"];

/// Creates missing tables and indexes, then seeds default site info.
///
/// Existing rows are never touched unless `RESET_DB=true`, which drops every table first.
pub async fn run_migrations(pool: &SqlitePool, default_language: Language) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - dropping all tables and recreating schema");
        drop_all_tables(pool).await?;
    }

    create_user_tables(pool).await?;
    create_site_info_tables(pool).await?;
    create_revision_tables(pool).await?;
    create_indexes(pool).await?;

    init_default_site_info(pool, default_language).await?;

    info!("Database migration completed");
    Ok(())
}

/// Tables from [`TABLES`] that do not exist yet
pub async fn missing_tables(pool: &SqlitePool) -> Result<Vec<&'static str>, sqlx::Error> {
    let mut missing = Vec::new();
    for table in TABLES {
        let exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(pool)
        .await?;
        if exists == 0 {
            missing.push(table);
        }
    }
    Ok(missing)
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT UNIQUE NOT NULL,
            e_mail TEXT UNIQUE NOT NULL,
            display_name TEXT NOT NULL DEFAULT '',
            avatar TEXT NOT NULL DEFAULT '',
            rank INTEGER NOT NULL DEFAULT 0,
            status INTEGER NOT NULL DEFAULT 1,
            mail_status INTEGER NOT NULL DEFAULT 1,
            is_admin INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            suspended_at TEXT,
            deleted_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_site_info_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS site_info (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT UNIQUE NOT NULL,
            content TEXT NOT NULL,
            status INTEGER NOT NULL DEFAULT 1,
            created_at TEXT,
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_revision_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS revisions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            object_type INTEGER NOT NULL DEFAULT 0,
            object_id TEXT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT '',
            log TEXT NOT NULL DEFAULT '',
            status INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_users_status ON users(status, mail_status)",
        "CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_revisions_object_id ON revisions(object_id, created_at)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}

async fn insert_site_info_if_absent(
    pool: &SqlitePool,
    site_type: &str,
    content: &str,
) -> Result<bool, sqlx::Error> {
    let now = now_timestamp();
    let result = sqlx::query(
        r#"
        INSERT INTO site_info (type, content, status, created_at, updated_at)
        VALUES (?, ?, 1, ?, ?)
        ON CONFLICT(type) DO NOTHING
        "#,
    )
    .bind(site_type)
    .bind(content)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Seeds the general, interface and smtp sections on first start.
/// `SITE_NAME`, `SITE_URL`, `CONTACT_EMAIL` and `SMTP_*` provide the values.
async fn init_default_site_info(
    pool: &SqlitePool,
    default_language: Language,
) -> Result<(), sqlx::Error> {
    let general = json!({
        "name": env::var("SITE_NAME").unwrap_or_else(|_| "Answer".to_string()),
        "short_description": "",
        "description": "",
        "site_url": env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
        "contact_email": env::var("CONTACT_EMAIL").unwrap_or_default(),
    });
    let interface = json!({
        "logo": "",
        "theme": "default",
        "language": default_language.abbr(),
    });

    let seeds = [
        (SITE_TYPE_GENERAL, general.to_string()),
        (SITE_TYPE_INTERFACE, interface.to_string()),
        (SITE_TYPE_SMTP, json!(EmailConfig::from_env()).to_string()),
    ];

    for (site_type, content) in seeds {
        if insert_site_info_if_absent(pool, site_type, &content).await? {
            info!(site_type = %site_type, "Seeded default site info");
        }
    }

    Ok(())
}

/// Creates an administrator unless the email is already registered.
/// Returns the id of the new or existing user.
pub async fn ensure_admin_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
) -> Result<String, sqlx::Error> {
    if let Some(id) = sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE e_mail = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?
    {
        sqlx::query("UPDATE users SET is_admin = 1 WHERE id = ?")
            .bind(&id)
            .execute(pool)
            .await?;
        return Ok(id);
    }

    let id = generate_user_id();
    sqlx::query(
        r#"
        INSERT INTO users (id, username, e_mail, display_name, status, mail_status, is_admin, created_at)
        VALUES (?, ?, ?, ?, ?, ?, 1, ?)
        "#,
    )
    .bind(&id)
    .bind(username)
    .bind(email)
    .bind(username)
    .bind(USER_STATUS_AVAILABLE)
    .bind(EMAIL_STATUS_AVAILABLE)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    info!(user_id = %id, "Created admin user");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent_and_seed_once() {
        let pool = pool().await;
        assert_eq!(missing_tables(&pool).await.unwrap(), TABLES.to_vec());

        run_migrations(&pool, Language::Chinese).await.unwrap();
        sqlx::query("UPDATE site_info SET content = '{\"theme\":\"dark\"}' WHERE type = 'interface'")
            .execute(&pool)
            .await
            .unwrap();
        run_migrations(&pool, Language::English).await.unwrap();

        assert!(missing_tables(&pool).await.unwrap().is_empty());
        let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM site_info")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 3);

        let interface =
            sqlx::query_scalar::<_, String>("SELECT content FROM site_info WHERE type = 'interface'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(interface, "{\"theme\":\"dark\"}");
    }

    #[tokio::test]
    async fn test_ensure_admin_user_reuses_existing_email() {
        let pool = pool().await;
        run_migrations(&pool, Language::English).await.unwrap();

        let first = ensure_admin_user(&pool, "admin", "admin@example.com").await.unwrap();
        let second = ensure_admin_user(&pool, "other", "admin@example.com").await.unwrap();
        assert_eq!(first, second);

        let is_admin = sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = ?")
            .bind(&first)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(is_admin);
    }

    #[tokio::test]
    async fn test_seeded_timestamps_share_the_stored_format() {
        let pool = pool().await;
        run_migrations(&pool, Language::English).await.unwrap();
        let admin = ensure_admin_user(&pool, "admin", "admin@example.com").await.unwrap();

        let mut stamps = sqlx::query_scalar::<_, String>("SELECT created_at FROM site_info")
            .fetch_all(&pool)
            .await
            .unwrap();
        stamps.push(
            sqlx::query_scalar::<_, String>("SELECT created_at FROM users WHERE id = ?")
                .bind(&admin)
                .fetch_one(&pool)
                .await
                .unwrap(),
        );

        let expected_len = now_timestamp().len();
        for stamp in stamps {
            assert_eq!(stamp.len(), expected_len, "{}", stamp);
            assert!(stamp.ends_with('Z'), "{}", stamp);
        }
    }
}
