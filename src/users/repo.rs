// src/users/repo.rs

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, error};

use super::models::{
    user_status_cache_key, user_status_changed_cache_ttl, User, UserCacheInfo, UserPageFilter,
    UserStatusFilter, EMAIL_STATUS_AVAILABLE, EMAIL_STATUS_TO_BE_VERIFIED, USER_STATUS_AVAILABLE,
    USER_STATUS_DELETED, USER_STATUS_SUSPENDED,
};
use crate::common::{now_timestamp, ApiError};
use crate::services::cache::CacheService;

/// User storage used by the back office
#[async_trait]
pub trait UserBackyardRepo: Send + Sync {
    /// Writes the new status, stamps `suspended_at`/`deleted_at` when entering
    /// those states and records the change in the status cache
    async fn update_user_status(
        &self,
        user_id: &str,
        user_status: i64,
        mail_status: i64,
    ) -> Result<(), ApiError>;

    async fn get_user_info(&self, user_id: &str) -> Result<Option<User>, ApiError>;

    /// One page of users and the total number matching `filter`
    async fn get_user_page(
        &self,
        page: i64,
        page_size: i64,
        filter: &UserPageFilter,
    ) -> Result<(Vec<User>, i64), ApiError>;
}

#[derive(Clone)]
pub struct SqliteUserBackyardRepo {
    db: SqlitePool,
    cache: CacheService,
}

impl SqliteUserBackyardRepo {
    pub fn new(db: SqlitePool, cache: CacheService) -> Self {
        Self { db, cache }
    }
}

fn status_condition(status: Option<UserStatusFilter>) -> String {
    let visible = format!("status IN ({}, {})", USER_STATUS_AVAILABLE, USER_STATUS_SUSPENDED);
    match status {
        None => visible,
        Some(UserStatusFilter::Normal) => format!(
            "status = {} AND mail_status = {}",
            USER_STATUS_AVAILABLE, EMAIL_STATUS_AVAILABLE
        ),
        Some(UserStatusFilter::Inactive) => {
            format!("{} AND mail_status = {}", visible, EMAIL_STATUS_TO_BE_VERIFIED)
        }
        Some(UserStatusFilter::Suspended) => format!("status = {}", USER_STATUS_SUSPENDED),
        Some(UserStatusFilter::Deleted) => format!("status = {}", USER_STATUS_DELETED),
    }
}

fn order_column(status: Option<UserStatusFilter>) -> &'static str {
    match status {
        Some(UserStatusFilter::Deleted) => "deleted_at",
        Some(UserStatusFilter::Suspended) => "suspended_at",
        _ => "created_at",
    }
}

#[async_trait]
impl UserBackyardRepo for SqliteUserBackyardRepo {
    async fn update_user_status(
        &self,
        user_id: &str,
        user_status: i64,
        mail_status: i64,
    ) -> Result<(), ApiError> {
        let now = now_timestamp();

        let mut sql = "UPDATE users SET status = ?, mail_status = ?".to_string();
        let stamp = match user_status {
            USER_STATUS_SUSPENDED => Some("suspended_at"),
            USER_STATUS_DELETED => Some("deleted_at"),
            _ => None,
        };
        if let Some(column) = stamp {
            sql.push_str(&format!(", {} = ?", column));
        }
        sql.push_str(" WHERE id = ?");

        let mut query = sqlx::query(&sql).bind(user_status).bind(mail_status);
        if stamp.is_some() {
            query = query.bind(&now);
        }
        query.bind(user_id).execute(&self.db).await.map_err(|e| {
            error!(error = %e, user_id = %user_id, "Failed to update user status");
            ApiError::DatabaseError(e)
        })?;

        let cache_info = UserCacheInfo {
            user_id: user_id.to_string(),
            user_status,
            email_status: mail_status,
        };
        let value = serde_json::to_string(&cache_info).map_err(|e| {
            error!(error = %e, "Failed to serialize user status cache entry");
            ApiError::InternalServer("failed to cache user status".to_string())
        })?;
        self.cache
            .set_string(
                &user_status_cache_key(user_id),
                &value,
                user_status_changed_cache_ttl(),
            )
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user_id, "Failed to cache user status");
                ApiError::InternalServer("failed to cache user status".to_string())
            })?;

        debug!(user_id = %user_id, user_status, mail_status, "User status written");
        Ok(())
    }

    async fn get_user_info(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user_id, "Failed to load user");
                ApiError::DatabaseError(e)
            })
    }

    async fn get_user_page(
        &self,
        page: i64,
        page_size: i64,
        filter: &UserPageFilter,
    ) -> Result<(Vec<User>, i64), ApiError> {
        let mut where_clause = format!(" WHERE {}", status_condition(filter.status));

        let pattern = filter
            .query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", q));
        if pattern.is_some() {
            where_clause.push_str(" AND (username LIKE ? OR e_mail LIKE ? OR display_name LIKE ?)");
        }

        let sql = format!(
            "SELECT * FROM users{} ORDER BY {} DESC LIMIT ? OFFSET ?",
            where_clause,
            order_column(filter.status)
        );
        let count_sql = format!("SELECT COUNT(*) FROM users{}", where_clause);

        let mut query = sqlx::query_as::<_, User>(&sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(pattern) = &pattern {
            query = query.bind(pattern).bind(pattern).bind(pattern);
            count_query = count_query.bind(pattern).bind(pattern).bind(pattern);
        }

        // Pages past the end read as empty rather than overflowing
        let offset = page.saturating_sub(1).max(0).saturating_mul(page_size);
        let users = query
            .bind(page_size)
            .bind(offset)
            .fetch_all(&self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list users");
                ApiError::DatabaseError(e)
            })?;

        let total = count_query.fetch_one(&self.db).await.map_err(|e| {
            error!(error = %e, "Failed to count users");
            ApiError::DatabaseError(e)
        })?;

        Ok((users, total))
    }
}
