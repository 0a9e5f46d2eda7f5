// src/siteinfo/handlers.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::SiteInfoResp;
use crate::common::{ApiError, AppState};

/// GET /answer/api/v1/siteinfo - Public general and interface settings
pub async fn get_site_info(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<SiteInfoResp>, ApiError> {
    let state = state_lock.read().await.clone();
    let site_info = state.site_info_common.get_site_info().await?;
    Ok(Json(site_info))
}
