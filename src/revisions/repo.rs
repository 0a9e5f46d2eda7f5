// src/revisions/repo.rs

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{error, info};

use super::models::{NewRevision, Revision, RevisionListItem, REVISION_STATUS_NORMAL};
use crate::common::{generate_revision_id, now_timestamp, ApiError};

#[async_trait]
pub trait RevisionRepo: Send + Sync {
    async fn add_revision(&self, revision: &NewRevision) -> Result<Revision, ApiError>;

    async fn get_last_revision_by_object_id(
        &self,
        object_id: &str,
    ) -> Result<Option<Revision>, ApiError>;

    /// Revisions of `object_id`, newest first
    async fn get_revision_list(&self, object_id: &str) -> Result<Vec<RevisionListItem>, ApiError>;
}

#[derive(Clone)]
pub struct SqliteRevisionRepo {
    db: SqlitePool,
}

impl SqliteRevisionRepo {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RevisionRepo for SqliteRevisionRepo {
    async fn add_revision(&self, revision: &NewRevision) -> Result<Revision, ApiError> {
        let stored = Revision {
            id: generate_revision_id(),
            user_id: revision.user_id.clone(),
            object_type: revision.object_type,
            object_id: revision.object_id.clone(),
            title: revision.title.clone(),
            content: revision.content.clone(),
            log: revision.log.clone(),
            status: REVISION_STATUS_NORMAL,
            created_at: now_timestamp(),
        };

        sqlx::query(
            r#"
            INSERT INTO revisions (id, user_id, object_type, object_id, title, content, log, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.user_id)
        .bind(stored.object_type)
        .bind(&stored.object_id)
        .bind(&stored.title)
        .bind(&stored.content)
        .bind(&stored.log)
        .bind(stored.status)
        .bind(&stored.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, object_id = %revision.object_id, "Failed to add revision");
            ApiError::DatabaseError(e)
        })?;

        info!(revision_id = %stored.id, object_id = %stored.object_id, "Revision added");
        Ok(stored)
    }

    async fn get_last_revision_by_object_id(
        &self,
        object_id: &str,
    ) -> Result<Option<Revision>, ApiError> {
        sqlx::query_as::<_, Revision>(
            "SELECT * FROM revisions WHERE object_id = ? ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .bind(object_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, object_id = %object_id, "Failed to load last revision");
            ApiError::DatabaseError(e)
        })
    }

    async fn get_revision_list(&self, object_id: &str) -> Result<Vec<RevisionListItem>, ApiError> {
        sqlx::query_as::<_, RevisionListItem>(
            r#"
            SELECT r.id, r.user_id, r.object_type, r.object_id, r.title, r.content, r.log,
                   r.status, r.created_at, u.username, u.display_name
            FROM revisions r
            LEFT JOIN users u ON u.id = r.user_id
            WHERE r.object_id = ?
            ORDER BY r.created_at DESC, r.rowid DESC
            "#,
        )
        .bind(object_id)
        .fetch_all(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, object_id = %object_id, "Failed to list revisions");
            ApiError::DatabaseError(e)
        })
    }
}
