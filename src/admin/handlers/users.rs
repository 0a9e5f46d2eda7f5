// src/admin/handlers/users.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::RequireAdmin;
use crate::common::{ApiError, AppState, PageModel, ValidatedJson, ValidatedQuery};
use crate::users::models::{GetUserPageReq, UpdateUserStatusReq, UserPageItem};

/// GET /answer/admin/api/users/page
pub async fn get_user_page(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    RequireAdmin(authed): RequireAdmin,
    ValidatedQuery(req): ValidatedQuery<GetUserPageReq>,
) -> Result<Json<PageModel<UserPageItem>>, ApiError> {
    let state = state_lock.read().await.clone();

    let page = state.user_backyard_service.get_user_page(&req).await?;

    info!(
        admin_user_id = %authed.id,
        status = ?req.status,
        count = page.count,
        "Fetched user page"
    );
    Ok(Json(page))
}

/// PUT /answer/admin/api/user/status
pub async fn update_user_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    RequireAdmin(authed): RequireAdmin,
    ValidatedJson(req): ValidatedJson<UpdateUserStatusReq>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    state.user_backyard_service.update_user_status(&req).await?;

    info!(
        admin_user_id = %authed.id,
        user_id = %req.user_id,
        status = %req.status,
        "User status changed by admin"
    );
    Ok(Json(serde_json::json!({ "success": true })))
}
