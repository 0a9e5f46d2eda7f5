// src/admin/handlers/mod.rs

pub mod dashboard;
pub mod options;
pub mod siteinfo;
pub mod smtp;
pub mod users;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use crate::auth::AuthedUser;
use crate::common::{safe_email_log, ApiError};

/// Authenticated administrator
///
/// Goes ahead of any body or query extractor so that non-admins are refused
/// before their input is looked at.
#[derive(Debug)]
pub struct RequireAdmin(pub AuthedUser);

fn require_admin(authed: &AuthedUser, action: &str) -> Result<(), ApiError> {
    if !authed.is_admin {
        warn!(
            user_id = %authed.id,
            email = %safe_email_log(&authed.email),
            action = %action,
            "Back office access denied: admin privileges required"
        );
        return Err(ApiError::Forbidden("Admin privileges required".to_string()));
    }
    Ok(())
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authed = AuthedUser::from_request_parts(parts, state).await?;
        require_admin(&authed, &format!("{} {}", parts.method, parts.uri.path()))?;
        Ok(RequireAdmin(authed))
    }
}
