// src/admin/handlers/smtp.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::RequireAdmin;
use crate::common::{ApiError, AppState, ValidatedJson};
use crate::siteinfo::models::{GetSmtpConfigResp, UpdateSmtpConfigReq};

/// GET /answer/admin/api/setting/smtp
pub async fn get_smtp_config(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: RequireAdmin,
) -> Result<Json<GetSmtpConfigResp>, ApiError> {
    let state = state_lock.read().await.clone();

    let config = state.site_info_service.get_smtp_config().await?;
    Ok(Json(config))
}

/// PUT /answer/admin/api/setting/smtp - Saves the settings; a test email, if
/// requested, is delivered in the background
pub async fn update_smtp_config(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    RequireAdmin(authed): RequireAdmin,
    ValidatedJson(req): ValidatedJson<UpdateSmtpConfigReq>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let test_email_queued = !req.test_email_recipient.is_empty();
    state.site_info_service.update_smtp_config(req).await?;

    info!(
        admin_user_id = %authed.id,
        test_email_queued = test_email_queued,
        "SMTP settings updated"
    );
    Ok(Json(serde_json::json!({
        "success": true,
        "test_email_queued": test_email_queued,
    })))
}
