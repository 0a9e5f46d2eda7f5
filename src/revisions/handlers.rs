// src/revisions/handlers.rs

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{GetRevisionListReq, RevisionListItem};
use crate::common::{ApiError, AppState, ValidatedQuery};

/// GET /answer/api/v1/revisions?object_id= - Revisions of an object, newest first
pub async fn get_revision_list(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ValidatedQuery(req): ValidatedQuery<GetRevisionListReq>,
) -> Result<Json<Vec<RevisionListItem>>, ApiError> {
    let state = state_lock.read().await.clone();

    let revisions = state
        .revision_service
        .get_revision_list(&req.object_id)
        .await?;

    debug!(object_id = %req.object_id, count = revisions.len(), "Listed revisions");
    Ok(Json(revisions))
}
