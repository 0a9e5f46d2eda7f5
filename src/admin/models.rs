// src/admin/models.rs

use serde::Serialize;

use crate::services::email::DeliveryReport;

#[derive(Debug, Serialize)]
pub struct DashboardInfo {
    pub user_count: i64,
    pub suspended_user_count: i64,
    pub revision_count: i64,
    pub smtp_configured: bool,
    /// Outcome of the most recent email delivery since startup
    pub last_email_delivery: Option<DeliveryReport>,
    pub database_status: String,
    pub uptime_seconds: i64,
    pub last_updated: String,
}
