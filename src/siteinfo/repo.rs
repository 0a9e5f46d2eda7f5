// src/siteinfo/repo.rs

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, error};

use super::models::SiteInfo;
use crate::common::{now_timestamp, ApiError};

/// Storage of site info sections keyed by type
#[async_trait]
pub trait SiteInfoRepo: Send + Sync {
    async fn get_by_type(&self, site_type: &str) -> Result<Option<SiteInfo>, ApiError>;

    /// Inserts or replaces the section of `site_type`
    async fn save_by_type(&self, site_type: &str, content: &str) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct SqliteSiteInfoRepo {
    db: SqlitePool,
}

impl SqliteSiteInfoRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SiteInfoRepo for SqliteSiteInfoRepo {
    async fn get_by_type(&self, site_type: &str) -> Result<Option<SiteInfo>, ApiError> {
        sqlx::query_as::<_, SiteInfo>(
            "SELECT id, type, content, status, created_at, updated_at FROM site_info WHERE type = ?",
        )
        .bind(site_type)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, site_type = %site_type, "Failed to load site info");
            ApiError::DatabaseError(e)
        })
    }

    async fn save_by_type(&self, site_type: &str, content: &str) -> Result<(), ApiError> {
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO site_info (type, content, status, created_at, updated_at)
            VALUES (?, ?, 1, ?, ?)
            ON CONFLICT(type) DO UPDATE SET
                content = excluded.content,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(site_type)
        .bind(content)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, site_type = %site_type, "Failed to save site info");
            ApiError::DatabaseError(e)
        })?;

        debug!(site_type = %site_type, "Site info saved");
        Ok(())
    }
}
