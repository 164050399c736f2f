use blogpilot_core::models::{
    MessageResponse, NoticeDetail, NoticeRequest, NoticeSummary, NoticesPageResponse, Paged,
};

use super::{ApiClient, page_query};
use crate::error::Result;

impl ApiClient {
    pub async fn notices(&self, page: u32, size: u32) -> Result<Paged<NoticeSummary>> {
        let res: NoticesPageResponse = self.http.get("/api/notices", &page_query(page, size)).await?;
        Ok(res.into())
    }

    pub async fn notice(&self, id: i64) -> Result<NoticeDetail> {
        self.http.get(&format!("/api/notices/{id}"), &[]).await
    }

    pub async fn create_notice(&self, req: &NoticeRequest) -> Result<NoticeDetail> {
        self.http.post("/api/notices", req).await
    }

    pub async fn update_notice(&self, id: i64, req: &NoticeRequest) -> Result<MessageResponse> {
        self.http.put(&format!("/api/notices/{id}"), req).await
    }

    pub async fn delete_notice(&self, id: i64) -> Result<MessageResponse> {
        self.http.delete(&format!("/api/notices/{id}")).await
    }
}
