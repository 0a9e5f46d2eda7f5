// src/revisions/services.rs

use std::sync::Arc;
use tracing::debug;

use super::models::{NewRevision, Revision, RevisionListItem};
use super::repo::RevisionRepo;
use crate::common::ApiError;

pub struct RevisionService {
    repo: Arc<dyn RevisionRepo>,
}

impl RevisionService {
    pub fn new(repo: Arc<dyn RevisionRepo>) -> Self {
        Self { repo }
    }

    pub async fn add_revision(&self, revision: &NewRevision) -> Result<Revision, ApiError> {
        self.repo.add_revision(revision).await
    }

    /// Adds `revision` unless the object's last revision has the same content
    pub async fn record_if_changed(
        &self,
        revision: &NewRevision,
    ) -> Result<Option<Revision>, ApiError> {
        if let Some(last) = self.get_last_revision(&revision.object_id).await? {
            if last.content == revision.content {
                debug!(object_id = %revision.object_id, "Content unchanged, no revision added");
                return Ok(None);
            }
        }
        self.add_revision(revision).await.map(Some)
    }

    pub async fn get_last_revision(&self, object_id: &str) -> Result<Option<Revision>, ApiError> {
        self.repo.get_last_revision_by_object_id(object_id).await
    }

    pub async fn get_revision_list(
        &self,
        object_id: &str,
    ) -> Result<Vec<RevisionListItem>, ApiError> {
        self.repo.get_revision_list(object_id).await
    }
}
