use serde::{Deserialize, Serialize};

use super::auth::LoginResponse;
use crate::session::Role;

/// Profile of the signed-in user.
///
/// A profile primed from the login response lacks `department`,
/// `token_usage` and `updated_at` until the first real fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserDetailResponse {
    /// Local view of the profile after applying an edit.
    pub fn with_update(&self, update: &UpdateProfileRequest) -> Self {
        Self {
            username: update.username.clone(),
            department: Some(update.department.clone()),
            ..self.clone()
        }
    }
}

impl From<&LoginResponse> for UserDetailResponse {
    fn from(login: &LoginResponse) -> Self {
        Self {
            user_id: login.user_id,
            email: login.email.clone(),
            username: login.username.clone(),
            department: None,
            role: login.role.clone(),
            token_usage: None,
            created_at: login.created_at.clone(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub department: String,
}
