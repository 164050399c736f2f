use blogpilot_core::models::{BlogTemplateRequest, BlogTemplateResponse};

use super::ApiClient;
use crate::error::Result;

const MY_TEMPLATE: &str = "/api/blog-templates/me";

impl ApiClient {
    /// The user's template, `None` when none has been created yet.
    pub async fn my_template(&self) -> Result<Option<BlogTemplateResponse>> {
        match self.http.get(MY_TEMPLATE, &[]).await {
            Ok(template) => Ok(Some(template)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn create_template(&self, req: &BlogTemplateRequest) -> Result<BlogTemplateResponse> {
        self.http.post(MY_TEMPLATE, req).await
    }

    pub async fn update_template(&self, req: &BlogTemplateRequest) -> Result<BlogTemplateResponse> {
        self.http.put(MY_TEMPLATE, req).await
    }
}
