use blogpilot_core::models::Faq;

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    pub async fn faqs(&self) -> Result<Vec<Faq>> {
        self.http.get("/api/faqs", &[]).await
    }
}
