// src/users/models.rs

use chrono::Duration;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const USER_STATUS_AVAILABLE: i64 = 1;
pub const USER_STATUS_SUSPENDED: i64 = 9;
pub const USER_STATUS_DELETED: i64 = 10;

pub const EMAIL_STATUS_AVAILABLE: i64 = 1;
pub const EMAIL_STATUS_TO_BE_VERIFIED: i64 = 2;

pub const USER_STATUS_CHANGED_CACHE_KEY: &str = "answer:user:status:";

pub fn user_status_changed_cache_ttl() -> Duration {
    Duration::days(7)
}

pub fn user_status_cache_key(user_id: &str) -> String {
    format!("{}{}", USER_STATUS_CHANGED_CACHE_KEY, user_id)
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub e_mail: String,
    pub display_name: String,
    pub avatar: String,
    pub rank: i64,
    pub status: i64,
    pub mail_status: i64,
    pub is_admin: bool,
    pub created_at: String,
    pub suspended_at: Option<String>,
    pub deleted_at: Option<String>,
}

/// Status names used by the back office
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatusFilter {
    Normal,
    Suspended,
    Deleted,
    Inactive,
}

impl UserStatusFilter {
    pub const NAMES: &'static [&'static str] = &["normal", "suspended", "deleted", "inactive"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "normal" => Some(Self::Normal),
            "suspended" => Some(Self::Suspended),
            "deleted" => Some(Self::Deleted),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Suspended => "suspended",
            Self::Deleted => "deleted",
            Self::Inactive => "inactive",
        }
    }

    /// Status name shown for a stored user
    pub fn of(user: &User) -> Self {
        match user.status {
            USER_STATUS_DELETED => Self::Deleted,
            USER_STATUS_SUSPENDED => Self::Suspended,
            _ if user.mail_status == EMAIL_STATUS_TO_BE_VERIFIED => Self::Inactive,
            _ => Self::Normal,
        }
    }
}

/// Written to the cache whenever a user's status changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCacheInfo {
    pub user_id: String,
    pub user_status: i64,
    pub email_status: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserStatusReq {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub status: String,
}

impl UpdateUserStatusReq {
    pub fn status_filter(&self) -> Option<UserStatusFilter> {
        UserStatusFilter::parse(&self.status)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetUserPageReq {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub query: Option<String>,
    pub status: Option<String>,
}

impl GetUserPageReq {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(10).clamp(1, 100)
    }

    pub fn status_filter(&self) -> Option<UserStatusFilter> {
        self.status.as_deref().and_then(UserStatusFilter::parse)
    }
}

/// Repository-level listing filter
#[derive(Debug, Clone, Default)]
pub struct UserPageFilter {
    pub status: Option<UserStatusFilter>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPageItem {
    pub user_id: String,
    pub created_at: String,
    pub deleted_at: Option<String>,
    pub suspended_at: Option<String>,
    pub username: String,
    pub e_mail: String,
    pub rank: i64,
    pub display_name: String,
    pub avatar: String,
    pub status: String,
}

impl From<User> for UserPageItem {
    fn from(user: User) -> Self {
        let status = UserStatusFilter::of(&user).as_str().to_string();
        Self {
            user_id: user.id,
            created_at: user.created_at,
            deleted_at: user.deleted_at,
            suspended_at: user.suspended_at,
            username: user.username,
            e_mail: user.e_mail,
            rank: user.rank,
            display_name: user.display_name,
            avatar: user.avatar,
            status,
        }
    }
}
