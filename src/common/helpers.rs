// Helper functions for safe logging, timestamps and paged responses

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Masks email addresses for safe logging
///
/// # Example
/// ```ignore
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if email.len() > 3 && !domain.contains('@') => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => "***@***.***".to_string(),
    }
}

/// Current time as stored in every timestamp column: RFC 3339, UTC, fixed
/// microsecond precision, so text order is time order
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// One page of a listing plus the total number of matches
#[derive(Debug, Clone, Serialize)]
pub struct PageModel<T> {
    pub count: i64,
    pub list: Vec<T>,
}
