// src/cli.rs
//! Command line interface: server start and maintenance commands

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

use crate::auth::issue_token;
use crate::common::config::AppConfig;
use crate::common::migrations::{ensure_admin_user, missing_tables, run_migrations};
use crate::common::validation::LocaleCatalog;
use crate::services::encryption::SecretCipher;

#[derive(Debug, Parser)]
#[command(name = "answer-api", version, about = "Back office API for a community Q&A site")]
pub struct Cli {
    /// Env file to load instead of ./.env
    #[arg(short = 'C', long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Run {
        /// Bypass authentication with the DEV_USER_* identity
        #[arg(long, conflicts_with = "prod")]
        dev: bool,
        /// Force authentication even if DEV_MODE=true
        #[arg(long)]
        prod: bool,
    },
    /// Create the data directory, schema, default settings and an admin user
    Init {
        #[arg(long, default_value = "admin")]
        admin_username: String,
        /// Falls back to ADMIN_EMAIL
        #[arg(long)]
        admin_email: Option<String>,
    },
    /// Verify the configuration, database access and schema
    Check,
    /// Create missing tables and indexes in an existing database
    Upgrade,
    /// Write a consistent copy of the SQLite database
    Dump {
        #[arg(short, long, default_value = "./backup")]
        path: PathBuf,
    },
    /// Print a bearer token for a user
    Token {
        user_id: String,
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
    /// Print a new random ENCRYPTION_MASTER_KEY
    GenKey,
}

impl Command {
    /// `Some(true)` for `--dev`, `Some(false)` for `--prod`
    pub fn dev_mode_override(&self) -> Option<bool> {
        match self {
            Command::Run { dev: true, .. } => Some(true),
            Command::Run { prod: true, .. } => Some(false),
            _ => None,
        }
    }
}

/// Opens the configured database, creating the file and its directory if needed
pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    if let Some(db_path) = config.sqlite_path() {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await
        .with_context(|| format!("connecting to {}", config.database_url))?;
    Ok(pool)
}

pub async fn init(
    config: &AppConfig,
    admin_username: &str,
    admin_email: Option<String>,
) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let pool = connect(config).await?;
    run_migrations(&pool, config.default_language).await?;

    let admin_email = admin_email.or_else(|| std::env::var("ADMIN_EMAIL").ok());
    match admin_email {
        Some(email) => {
            let id = ensure_admin_user(&pool, admin_username, &email).await?;
            println!("Admin user: {} ({})", admin_username, id);
        }
        None => warn!("No admin email given, skipping admin user creation"),
    }

    println!("Initialized {}", config.database_url);
    Ok(())
}

pub async fn check(config: &AppConfig) -> anyhow::Result<()> {
    LocaleCatalog::load(config.default_language).context("loading message catalogs")?;
    println!("[ok] message catalogs ({})", config.default_language);

    match SecretCipher::from_env() {
        Ok(_) => println!("[ok] ENCRYPTION_MASTER_KEY"),
        Err(e) => println!("[warn] {}: SMTP password is stored in plain text", e),
    }

    let pool = connect(config).await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    println!("[ok] database {}", config.database_url);

    let missing = missing_tables(&pool).await?;
    if !missing.is_empty() {
        bail!("missing tables: {} (run `init` or `upgrade`)", missing.join(", "));
    }
    println!("[ok] schema");
    Ok(())
}

pub async fn upgrade(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let missing = missing_tables(&pool).await?;
    run_migrations(&pool, config.default_language).await?;
    info!(created = ?missing, "Upgrade finished");
    println!("Upgraded {}", config.database_url);
    Ok(())
}

/// Writes `answer_<timestamp>.db` into `dir` using `VACUUM INTO`
pub async fn dump(config: &AppConfig, dir: PathBuf) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(&dir).await?;
    let target = dir.join(format!("answer_{}.db", Utc::now().format("%Y%m%d%H%M%S")));
    let target_str = target.to_string_lossy().replace('\'', "''");

    let pool = connect(config).await?;
    sqlx::query(&format!("VACUUM INTO '{}'", target_str))
        .execute(&pool)
        .await
        .context("writing database dump")?;

    println!("Dumped database to {}", target.display());
    Ok(target)
}

pub fn token(config: &AppConfig, user_id: &str, hours: i64) -> anyhow::Result<()> {
    if hours <= 0 {
        bail!("token lifetime must be positive");
    }
    let token = issue_token(&config.jwt_secret, user_id, Duration::hours(hours))?;
    println!("{}", token);
    Ok(())
}

pub fn gen_key() {
    println!("ENCRYPTION_MASTER_KEY={}", SecretCipher::generate_key());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["answer-api"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_run_dev_flags() {
        let cli = Cli::parse_from(["answer-api", "run", "--dev"]);
        assert_eq!(cli.command.unwrap().dev_mode_override(), Some(true));

        let cli = Cli::parse_from(["answer-api", "run", "--prod"]);
        assert_eq!(cli.command.unwrap().dev_mode_override(), Some(false));

        assert!(Cli::try_parse_from(["answer-api", "run", "--dev", "--prod"]).is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["answer-api", "check", "-C", "/etc/answer.env"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/answer.env")));
        assert!(matches!(cli.command, Some(Command::Check)));
    }

    #[test]
    fn test_token_requires_positive_lifetime() {
        let config = AppConfig::from_env();
        assert!(token(&config, "U_ABC123", 0).is_err());
    }
}
