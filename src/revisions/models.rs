// src/revisions/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const REVISION_STATUS_NORMAL: i64 = 1;

/// Object type of back office site info sections
pub const OBJECT_TYPE_SITE_INFO: i64 = 9;

/// A stored edit of an object
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Revision {
    pub id: String,
    pub user_id: String,
    pub object_type: i64,
    pub object_id: String,
    pub title: String,
    pub content: String,
    pub log: String,
    pub status: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewRevision {
    pub user_id: String,
    pub object_type: i64,
    pub object_id: String,
    pub title: String,
    pub content: String,
    pub log: String,
}

/// Revision joined with its author's public names
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RevisionListItem {
    pub id: String,
    pub user_id: String,
    pub object_type: i64,
    pub object_id: String,
    pub title: String,
    pub content: String,
    pub log: String,
    pub status: i64,
    pub created_at: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetRevisionListReq {
    #[serde(default)]
    pub object_id: String,
}
