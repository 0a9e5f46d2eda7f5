// src/common/dev_mode.rs
//! Development mode: requests are authenticated as a fixed local user

use std::env;
use tracing::{info, warn};

/// Fixed id of the dev-mode user
pub const DEV_USER_ID: &str = "U_DEV000";

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub user_name: String,
    pub user_is_admin: bool,
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false)
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("DEV_MODE"),
            user_email: env::var("DEV_USER_EMAIL").unwrap_or_else(|_| "dev@test.com".to_string()),
            user_name: env::var("DEV_USER_NAME").unwrap_or_else(|_| "dev".to_string()),
            user_is_admin: env_flag("DEV_USER_IS_ADMIN"),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            user_email: String::new(),
            user_name: String::new(),
            user_is_admin: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `--dev` / `--prod` from the command line win over `DEV_MODE`
    pub fn with_cli_override(mut self, cli: Option<bool>) -> Self {
        if let Some(enabled) = cli {
            info!(dev_mode = enabled, "Dev mode set from command line");
            self.enabled = enabled;
        }
        self
    }
}

/// Logs dev mode status on startup
pub fn log_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        warn!(
            user = %config.user_name,
            admin = config.user_is_admin,
            "DEV MODE ENABLED: authentication bypassed, do not use in production"
        );
    } else {
        info!("Production mode - authentication required");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let config = DevModeConfig::disabled().with_cli_override(Some(true));
        assert!(config.is_enabled());

        let config = config.with_cli_override(None);
        assert!(config.is_enabled());

        let config = config.with_cli_override(Some(false));
        assert!(!config.is_enabled());
    }
}
