//! Authentication handlers

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use super::extractors::AuthedUser;
use super::models::UserInfoResp;
use crate::common::{ApiError, AppState};
use crate::users::models::UserStatusFilter;

/// GET /answer/api/v1/user/info - Current user
pub async fn user_info_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<UserInfoResp>, ApiError> {
    let state = state_lock.read().await.clone();

    let Some(user) = state.user_backyard_service.get_user_info(&authed.id).await? else {
        warn!(user_id = %authed.id, "Authenticated user has no stored profile");
        return Err(ApiError::NotFound("user not found".to_string()));
    };

    Ok(Json(UserInfoResp {
        status: UserStatusFilter::of(&user).as_str().to_string(),
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        avatar: user.avatar,
        is_admin: authed.is_admin,
    }))
}
