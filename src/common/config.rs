// src/common/config.rs
//! Process configuration read from the environment (and an optional env file)

use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::i18n::Language;

/// Runtime configuration shared by the server and the CLI commands
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub admin_emails: HashSet<String>,
    pub default_language: Language,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()));

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            format!("sqlite://{}", data_dir.join("answer.db").display())
        });

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());

        let admin_emails = parse_admin_emails(&env::var("ADMIN_EMAILS").unwrap_or_default());

        let default_language = match env::var("DEFAULT_LANGUAGE") {
            Ok(raw) => Language::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Unsupported DEFAULT_LANGUAGE, using en_US");
                Language::English
            }),
            Err(_) => Language::English,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Self {
            database_url,
            port,
            data_dir,
            jwt_secret,
            admin_emails,
            default_language,
            cors_origins,
        }
    }

    /// Filesystem path of the SQLite database, if the URL points at a file
    pub fn sqlite_path(&self) -> Option<PathBuf> {
        let path_part = self.database_url.strip_prefix("sqlite://")?;
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if path_without_params.is_empty() || path_without_params.starts_with(':') {
            return None;
        }
        Some(PathBuf::from(path_without_params))
    }
}

/// Loads environment variables from `path`, or from `./.env` when no path is
/// given, and returns the file that was read.
///
/// Runs before logging is set up (the file may carry `RUST_LOG`), so the caller
/// reports the result.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, dotenv::Error> {
    match path {
        Some(path) => {
            dotenv::from_path(path)?;
            Ok(Some(path.to_path_buf()))
        }
        None => Ok(dotenv::dotenv().ok()),
    }
}

/// Comma-separated, case-insensitive list of admin emails
pub fn parse_admin_emails(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_emails() {
        let emails = parse_admin_emails(" Admin@Example.com, ,ops@example.com ");
        assert_eq!(emails.len(), 2);
        assert!(emails.contains("admin@example.com"));
        assert!(emails.contains("ops@example.com"));
    }

    #[test]
    fn test_load_env_file_reports_the_file_read() {
        let path = env::temp_dir().join(format!("answer-env-{}.env", std::process::id()));
        std::fs::write(&path, "ANSWER_CONFIG_TEST_MARKER=loaded\n").unwrap();

        let loaded = load_env_file(Some(&path)).unwrap();
        assert_eq!(loaded, Some(path.clone()));
        assert_eq!(env::var("ANSWER_CONFIG_TEST_MARKER").unwrap(), "loaded");

        std::fs::remove_file(&path).unwrap();
        assert!(load_env_file(Some(&path)).is_err());
    }

    #[test]
    fn test_sqlite_path() {
        let mut config = AppConfig::from_env();

        config.database_url = "sqlite://data/answer.db?mode=rwc".to_string();
        assert_eq!(config.sqlite_path(), Some(PathBuf::from("data/answer.db")));

        config.database_url = "sqlite::memory:".to_string();
        assert_eq!(config.sqlite_path(), None);

        config.database_url = "sqlite://:memory:".to_string();
        assert_eq!(config.sqlite_path(), None);
    }
}
