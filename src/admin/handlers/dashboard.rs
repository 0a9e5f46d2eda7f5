// src/admin/handlers/dashboard.rs

use axum::{extract::Extension, Json};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::RequireAdmin;
use crate::admin::models::DashboardInfo;
use crate::common::{ApiError, AppState};
use crate::users::models::{USER_STATUS_AVAILABLE, USER_STATUS_SUSPENDED};

/// GET /answer/admin/api/dashboard - Counts and service health
pub async fn get_dashboard(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    RequireAdmin(authed): RequireAdmin,
) -> Result<Json<DashboardInfo>, ApiError> {
    let state = state_lock.read().await.clone();

    let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE status IN (?, ?)")
        .bind(USER_STATUS_AVAILABLE)
        .bind(USER_STATUS_SUSPENDED)
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error counting users for dashboard");
            ApiError::DatabaseError(e)
        })?;

    let suspended_user_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE status = ?")
            .bind(USER_STATUS_SUSPENDED)
            .fetch_one(&state.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Database error counting suspended users for dashboard");
                ApiError::DatabaseError(e)
            })?;

    let revision_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM revisions")
        .fetch_one(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error counting revisions for dashboard");
            ApiError::DatabaseError(e)
        })?;

    let database_status = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "healthy",
        Err(e) => {
            error!(error = %e, "Database health check failed");
            "unhealthy"
        }
    };

    let smtp_configured = state.email_service.get_email_config().await?.is_configured();

    let now = Utc::now();
    let info = DashboardInfo {
        user_count,
        suspended_user_count,
        revision_count,
        smtp_configured,
        last_email_delivery: state.email_service.last_delivery(),
        database_status: database_status.to_string(),
        uptime_seconds: (now - state.started_at).num_seconds(),
        last_updated: now.to_rfc3339_opts(SecondsFormat::Micros, true),
    };

    info!(admin_user_id = %authed.id, user_count, "Dashboard fetched");
    Ok(Json(info))
}
