use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::page::{PageMeta, Paged};
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryStatus {
    Pending,
    InProgress,
    Completed,
}

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 3] = [
        InquiryStatus::Pending,
        InquiryStatus::InProgress,
        InquiryStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "PENDING",
            InquiryStatus::InProgress => "IN_PROGRESS",
            InquiryStatus::Completed => "COMPLETED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "대기중",
            InquiryStatus::InProgress => "답변중",
            InquiryStatus::Completed => "답변완료",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase().replace('-', "_");
        InquiryStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == upper)
            .ok_or_else(|| CoreError::invalid_value("status", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryCategory {
    Feature,
    Payment,
    Account,
    Etc,
}

impl InquiryCategory {
    pub const ALL: [InquiryCategory; 4] = [
        InquiryCategory::Feature,
        InquiryCategory::Payment,
        InquiryCategory::Account,
        InquiryCategory::Etc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryCategory::Feature => "FEATURE",
            InquiryCategory::Payment => "PAYMENT",
            InquiryCategory::Account => "ACCOUNT",
            InquiryCategory::Etc => "ETC",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InquiryCategory::Feature => "기능 문의",
            InquiryCategory::Payment => "결제/환불",
            InquiryCategory::Account => "계정 문의",
            InquiryCategory::Etc => "기타",
        }
    }
}

impl fmt::Display for InquiryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InquiryCategory {
    type Err = CoreError;

    /// Accepts the enum name or the Korean label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        InquiryCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed) || c.label() == trimmed)
            .ok_or_else(|| CoreError::invalid_value("category", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryListItem {
    pub id: i64,
    pub title: String,
    #[serde(alias = "inquiryCategory")]
    pub category: InquiryCategory,
    pub status: InquiryStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryAnswer {
    #[serde(alias = "content")]
    pub answer_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryDetail {
    pub id: i64,
    pub title: String,
    #[serde(alias = "inquiryCategory")]
    pub category: InquiryCategory,
    pub content: String,
    pub status: InquiryStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<InquiryAnswer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiriesPageResponse {
    #[serde(default)]
    pub inquiries: Vec<InquiryListItem>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl From<InquiriesPageResponse> for Paged<InquiryListItem> {
    fn from(res: InquiriesPageResponse) -> Self {
        Paged {
            items: res.inquiries,
            meta: res.meta,
        }
    }
}

/// `GET /api/inquiries/my` answers with either a bare list or a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InquiriesResponse {
    List(Vec<InquiryListItem>),
    Page(InquiriesPageResponse),
}

impl InquiriesResponse {
    /// Normalise to a page. A bare list is treated as the only page.
    pub fn into_paged(self, page: u32, size: u32) -> Paged<InquiryListItem> {
        match self {
            InquiriesResponse::List(items) => {
                let total = items.len() as u64;
                Paged {
                    items,
                    meta: PageMeta::single_page(page, size, total),
                }
            }
            InquiriesResponse::Page(res) => res.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryRequest {
    pub title: String,
    pub inquiry_category: InquiryCategory,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAnswerRequest {
    pub answer_content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!("pending".parse::<InquiryStatus>().unwrap(), InquiryStatus::Pending);
        assert_eq!("in-progress".parse::<InquiryStatus>().unwrap(), InquiryStatus::InProgress);
        assert!("DONE".parse::<InquiryStatus>().is_err());
    }

    #[test]
    fn test_category_from_label() {
        assert_eq!("결제/환불".parse::<InquiryCategory>().unwrap(), InquiryCategory::Payment);
        assert_eq!("etc".parse::<InquiryCategory>().unwrap(), InquiryCategory::Etc);
    }

    #[test]
    fn test_bare_list_normalises_to_single_page() {
        let raw = r#"[{"id": 1, "title": "결제 관련 문의", "category": "PAYMENT",
                       "status": "PENDING", "createdAt": "2024-11-10"}]"#;
        let res: InquiriesResponse = serde_json::from_str(raw).unwrap();
        let paged = res.into_paged(1, 5);
        assert_eq!(paged.len(), 1);
        assert_eq!(paged.meta.total_elements, 1);
        assert!(paged.meta.first && paged.meta.last);
    }

    #[test]
    fn test_page_envelope_is_kept() {
        let raw = r#"{"inquiries": [], "currentPage": 3, "totalPages": 3,
                      "totalElements": 11, "size": 5, "first": false, "last": true}"#;
        let res: InquiriesResponse = serde_json::from_str(raw).unwrap();
        let paged = res.into_paged(1, 5);
        assert_eq!(paged.meta.current_page, 3);
        assert_eq!(paged.meta.total_elements, 11);
    }
}
