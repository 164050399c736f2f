use serde::{Deserialize, Serialize};

use super::page::{PageMeta, Paged};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_new: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub is_new: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub can_edit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticesPageResponse {
    #[serde(default)]
    pub notices: Vec<NoticeSummary>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl From<NoticesPageResponse> for Paged<NoticeSummary> {
    fn from(res: NoticesPageResponse) -> Self {
        Paged {
            items: res.notices,
            meta: res.meta,
        }
    }
}

/// Body for creating and updating a notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeRequest {
    pub title: String,
    pub content: String,
    pub is_important: bool,
}

/// Acknowledgement body for update/delete style endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}
