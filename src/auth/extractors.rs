//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::models::Claims;
use crate::common::dev_mode::DEV_USER_ID;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::users::models::{
    user_status_cache_key, User, UserCacheInfo, USER_STATUS_DELETED, USER_STATUS_SUSPENDED,
};

/// Authenticated user extractor
///
/// Validates the bearer token, rejects users whose recent status change (from
/// the status cache) or stored status is suspended or deleted, and marks
/// administrators by the `is_admin` column or the configured admin emails.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
}

fn reject_inactive(user_id: &str, user_status: i64) -> Result<(), ApiError> {
    match user_status {
        USER_STATUS_DELETED => {
            warn!(user_id = %user_id, "Authentication rejected: user deleted");
            Err(ApiError::Unauthorized("user not found".into()))
        }
        USER_STATUS_SUSPENDED => {
            warn!(user_id = %user_id, "Authentication rejected: user suspended");
            Err(ApiError::Forbidden("user suspended".into()))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        if app_state.dev_mode.is_enabled() {
            let email = app_state.dev_mode.user_email.clone();
            let is_admin = app_state.dev_mode.user_is_admin
                || app_state.admin_emails.contains(&email.to_lowercase());

            debug!(
                user_id = DEV_USER_ID,
                email = %safe_email_log(&email),
                is_admin = is_admin,
                "DEV MODE: Authentication bypassed"
            );

            return Ok(AuthedUser {
                id: DEV_USER_ID.to_string(),
                email,
                is_admin,
            });
        }

        let token = match parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        {
            Some(t) => t.to_string(),
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        let bare_token = token.strip_prefix("Bearer ").unwrap_or(&token);

        let decoded = match decode::<Claims>(
            bare_token,
            &DecodingKey::from_secret(app_state.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "JWT token validation failed");
                return Err(ApiError::Unauthorized("invalid token".into()));
            }
        };

        let user_id = decoded.claims.sub;

        // A recent status change is visible here before anything else is read
        if let Some(raw) = app_state.cache.get_string(&user_status_cache_key(&user_id)).await {
            match serde_json::from_str::<UserCacheInfo>(&raw) {
                Ok(info) => reject_inactive(&user_id, info.user_status)?,
                Err(e) => warn!(error = %e, user_id = %user_id, "Ignoring malformed status cache entry"),
            }
        }

        let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&user_id)
            .fetch_optional(&app_state.db)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    user_id = %user_id,
                    "Database error during user lookup in authentication"
                );
                ApiError::DatabaseError(e)
            })?;

        let Some(user) = user else {
            warn!(user_id = %user_id, "Authentication failed: user not found in database");
            return Err(ApiError::Unauthorized("user not found".into()));
        };

        reject_inactive(&user.id, user.status)?;

        let is_admin = user.is_admin || app_state.admin_emails.contains(&user.e_mail.to_lowercase());
        debug!(
            user_id = %user.id,
            email = %safe_email_log(&user.e_mail),
            is_admin = is_admin,
            "User authenticated"
        );

        Ok(AuthedUser {
            id: user.id,
            email: user.e_mail,
            is_admin,
        })
    }
}
