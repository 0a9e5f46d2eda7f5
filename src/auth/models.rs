//! Authentication data models

use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Current user as returned by `/answer/api/v1/user/info`
#[derive(Serialize, Debug)]
pub struct UserInfoResp {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    pub is_admin: bool,
    pub status: String,
}
