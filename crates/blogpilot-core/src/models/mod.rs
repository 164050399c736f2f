//! Request and response types for the dashboard REST API.
//!
//! Field names follow the API's camelCase JSON. Timestamps are kept as the
//! strings the server sends; they are displayed, never computed on.

pub mod auth;
pub mod blog;
pub mod dashboard;
pub mod faq;
pub mod inquiry;
pub mod notice;
pub mod page;
pub mod profile;
pub mod template;
pub mod upload;

pub use auth::{
    EmailCheckResponse, LoginRequest, LoginResponse, LogoutRequest, RefreshRequest,
    RefreshResponse, SignupRequest, SignupResponse,
};
pub use blog::{Blog, BlogUpdateRequest, BlogsMyResponse};
pub use dashboard::{DashboardComparison, DashboardResponse, TodayBlogItem};
pub use faq::Faq;
pub use inquiry::{
    AdminAnswerRequest, CreateInquiryRequest, InquiriesPageResponse, InquiriesResponse,
    InquiryAnswer, InquiryCategory, InquiryDetail, InquiryListItem, InquiryStatus,
};
pub use notice::{MessageResponse, NoticeDetail, NoticeRequest, NoticeSummary, NoticesPageResponse};
pub use page::{PageMeta, Paged};
pub use profile::{UpdateProfileRequest, UserDetailResponse};
pub use template::{BlogTemplateRequest, BlogTemplateResponse, Platform};
pub use upload::{CreateUploadRequest, CreateUploadResponse};
