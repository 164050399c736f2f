use blogpilot_core::models::{UpdateProfileRequest, UserDetailResponse};

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    pub async fn my_profile(&self) -> Result<UserDetailResponse> {
        self.http.get("/api/profile/me", &[]).await
    }

    pub async fn update_profile(&self, req: &UpdateProfileRequest) -> Result<UserDetailResponse> {
        self.http.put("/api/profile/me", req).await
    }

    pub async fn user_profile(&self, user_id: i64) -> Result<UserDetailResponse> {
        self.http.get(&format!("/api/profile/{user_id}"), &[]).await
    }
}
