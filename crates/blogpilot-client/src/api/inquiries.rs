use blogpilot_core::models::{
    AdminAnswerRequest, CreateInquiryRequest, InquiriesResponse, InquiryDetail, InquiryListItem,
    InquiryStatus, MessageResponse, Paged,
};

use super::{ApiClient, page_query};
use crate::error::Result;

fn list_query(page: u32, size: u32, status: Option<InquiryStatus>) -> Vec<(&'static str, String)> {
    let mut query = page_query(page, size);
    if let Some(status) = status {
        query.push(("status", status.as_str().to_string()));
    }
    query
}

impl ApiClient {
    pub async fn my_inquiries(
        &self,
        page: u32,
        size: u32,
        status: Option<InquiryStatus>,
    ) -> Result<Paged<InquiryListItem>> {
        let res: InquiriesResponse = self
            .http
            .get("/api/inquiries/my", &list_query(page, size, status))
            .await?;
        Ok(res.into_paged(page, size))
    }

    pub async fn my_inquiry(&self, id: i64) -> Result<InquiryDetail> {
        self.http.get(&format!("/api/inquiries/my/{id}"), &[]).await
    }

    pub async fn create_inquiry(&self, req: &CreateInquiryRequest) -> Result<InquiryDetail> {
        self.http.post("/api/inquiries", req).await
    }

    pub async fn admin_inquiries(
        &self,
        status: Option<InquiryStatus>,
        page: u32,
        size: u32,
    ) -> Result<Paged<InquiryListItem>> {
        let res: InquiriesResponse = self
            .http
            .get("/api/admin/inquiries", &list_query(page, size, status))
            .await?;
        Ok(res.into_paged(page, size))
    }

    pub async fn admin_inquiry(&self, id: i64) -> Result<InquiryDetail> {
        self.http.get(&format!("/api/admin/inquiries/{id}"), &[]).await
    }

    pub async fn create_answer(&self, id: i64, req: &AdminAnswerRequest) -> Result<InquiryDetail> {
        self.http
            .post(&format!("/api/admin/inquiries/{id}/answer"), req)
            .await
    }

    pub async fn delete_answer(&self, id: i64) -> Result<MessageResponse> {
        self.http
            .delete(&format!("/api/admin/inquiries/{id}/answer"))
            .await
    }
}
