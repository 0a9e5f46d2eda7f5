// src/admin/handlers/siteinfo.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::RequireAdmin;
use crate::common::{ApiError, AppState, ValidatedJson};
use crate::siteinfo::models::{
    SiteGeneralReq, SiteGeneralResp, SiteInterfaceReq, SiteInterfaceResp,
};

/// GET /answer/admin/api/siteinfo/general
pub async fn get_site_general(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: RequireAdmin,
) -> Result<Json<SiteGeneralResp>, ApiError> {
    let state = state_lock.read().await.clone();

    let general = state.site_info_service.get_site_general().await?;
    Ok(Json(general))
}

/// PUT /answer/admin/api/siteinfo/general
pub async fn update_site_general(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    RequireAdmin(authed): RequireAdmin,
    ValidatedJson(req): ValidatedJson<SiteGeneralReq>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    state.site_info_service.save_site_general(&authed.id, req).await?;

    info!(admin_user_id = %authed.id, "Site general settings updated");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /answer/admin/api/siteinfo/interface
pub async fn get_site_interface(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _admin: RequireAdmin,
) -> Result<Json<SiteInterfaceResp>, ApiError> {
    let state = state_lock.read().await.clone();

    let interface = state.site_info_service.get_site_interface().await?;
    Ok(Json(interface))
}

/// PUT /answer/admin/api/siteinfo/interface
pub async fn update_site_interface(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    RequireAdmin(authed): RequireAdmin,
    ValidatedJson(req): ValidatedJson<SiteInterfaceReq>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    state.site_info_service.save_site_interface(&authed.id, req).await?;

    info!(admin_user_id = %authed.id, "Site interface settings updated");
    Ok(Json(serde_json::json!({ "success": true })))
}
