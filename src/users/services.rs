// src/users/services.rs

use std::sync::Arc;
use tracing::{info, warn};

use super::models::{
    GetUserPageReq, UpdateUserStatusReq, User, UserPageFilter, UserPageItem, UserStatusFilter,
    EMAIL_STATUS_AVAILABLE, EMAIL_STATUS_TO_BE_VERIFIED, USER_STATUS_AVAILABLE,
    USER_STATUS_DELETED, USER_STATUS_SUSPENDED,
};
use super::repo::UserBackyardRepo;
use crate::common::{ApiError, PageModel};

/// Back office user administration
pub struct UserBackyardService {
    repo: Arc<dyn UserBackyardRepo>,
}

impl UserBackyardService {
    pub fn new(repo: Arc<dyn UserBackyardRepo>) -> Self {
        Self { repo }
    }

    pub async fn get_user_info(&self, user_id: &str) -> Result<Option<User>, ApiError> {
        self.repo.get_user_info(user_id).await
    }

    pub async fn update_user_status(&self, req: &UpdateUserStatusReq) -> Result<(), ApiError> {
        let user = self
            .repo
            .get_user_info(&req.user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

        // Deleted users stay deleted
        if user.status == USER_STATUS_DELETED {
            info!(user_id = %user.id, "Status change ignored for deleted user");
            return Ok(());
        }

        let Some(target) = req.status_filter() else {
            warn!(user_id = %user.id, status = %req.status, "Unknown target user status");
            return Err(ApiError::validation(format!("unknown status {}", req.status)));
        };

        let (user_status, mail_status) = match target {
            UserStatusFilter::Inactive => (user.status, EMAIL_STATUS_TO_BE_VERIFIED),
            UserStatusFilter::Suspended => (USER_STATUS_SUSPENDED, user.mail_status),
            UserStatusFilter::Deleted => (USER_STATUS_DELETED, user.mail_status),
            UserStatusFilter::Normal => (USER_STATUS_AVAILABLE, EMAIL_STATUS_AVAILABLE),
        };

        self.repo
            .update_user_status(&user.id, user_status, mail_status)
            .await?;

        info!(
            user_id = %user.id,
            status = target.as_str(),
            user_status,
            mail_status,
            "User status updated"
        );
        Ok(())
    }

    pub async fn get_user_page(
        &self,
        req: &GetUserPageReq,
    ) -> Result<PageModel<UserPageItem>, ApiError> {
        let filter = UserPageFilter {
            status: req.status_filter(),
            query: req.query.clone(),
        };

        let (users, count) = self
            .repo
            .get_user_page(req.page(), req.page_size(), &filter)
            .await?;

        Ok(PageModel {
            count,
            list: users.into_iter().map(UserPageItem::from).collect(),
        })
    }
}
