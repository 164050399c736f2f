use blogpilot_core::models::{CreateUploadRequest, CreateUploadResponse};
use tracing::debug;

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    pub async fn create_upload(&self, req: &CreateUploadRequest) -> Result<CreateUploadResponse> {
        self.http.post("/api/uploads", req).await
    }

    /// Request a presigned URL, PUT the bytes there and return the public
    /// URL of the stored object.
    pub async fn upload_file(&self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        let slot = self
            .create_upload(&CreateUploadRequest {
                file_name: file_name.to_string(),
                content_type: content_type.to_string(),
            })
            .await?;
        debug!(file_name, size = bytes.len(), "uploading to presigned URL");
        self.http
            .put_presigned(&slot.presigned_url, content_type, bytes)
            .await?;
        Ok(slot.final_url)
    }
}
