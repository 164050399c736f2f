use blogpilot_core::models::DashboardResponse;

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    pub async fn dashboard(&self) -> Result<DashboardResponse> {
        self.http.get("/api/admin/dashboard", &[]).await
    }
}
