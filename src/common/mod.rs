// Common module - shared types and utilities across all modules

pub mod config;
pub mod dev_mode;
pub mod error;
pub mod extract;
pub mod helpers;
pub mod id_generator;
pub mod migrations;
pub mod state;
pub mod validation;

pub use error::ApiError;
pub use extract::{ValidatedJson, ValidatedQuery};
pub use helpers::{now_timestamp, safe_email_log, PageModel};
pub use id_generator::*;
pub use state::AppState;
