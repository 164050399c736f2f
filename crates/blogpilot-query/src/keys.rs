//! Key registry. One constructor per read query.
//!
//! Equal arguments always build equal keys; any differing argument builds a
//! different key.

use blogpilot_core::Resource;
use blogpilot_core::models::InquiryStatus;

use crate::key::{KeyParam, QueryKey};

pub fn auth_user() -> QueryKey {
    QueryKey::new(Resource::Auth, "user")
}

pub fn email_check(email: &str) -> QueryKey {
    QueryKey::new(Resource::Auth, "email-check").param(email.trim())
}

pub fn my_template() -> QueryKey {
    QueryKey::new(Resource::Templates, "me")
}

pub fn my_blogs(page: u32, category: Option<&str>) -> QueryKey {
    QueryKey::new(Resource::Blogs, "my")
        .param(page)
        .param(KeyParam::opt_text(category))
}

pub fn profile_me() -> QueryKey {
    QueryKey::new(Resource::Profile, "me")
}

pub fn user_profile(user_id: Option<i64>) -> QueryKey {
    QueryKey::new(Resource::Profile, "user").param(KeyParam::opt_int(user_id))
}

pub fn dashboard() -> QueryKey {
    QueryKey::new(Resource::Dashboard, "summary")
}

pub fn faqs() -> QueryKey {
    QueryKey::new(Resource::Faqs, "all")
}

pub fn notices_list(page: u32, size: u32) -> QueryKey {
    QueryKey::new(Resource::Notices, "list").param(page).param(size)
}

pub fn notice_detail(id: Option<i64>) -> QueryKey {
    QueryKey::new(Resource::Notices, "detail").param(KeyParam::opt_int(id))
}

pub fn my_inquiries(page: u32, size: u32, status: Option<InquiryStatus>) -> QueryKey {
    QueryKey::new(Resource::Inquiries, "my")
        .param(page)
        .param(size)
        .param(KeyParam::opt_status(status))
}

pub fn my_inquiry_detail(id: Option<i64>) -> QueryKey {
    QueryKey::new(Resource::Inquiries, "my-detail").param(KeyParam::opt_int(id))
}

pub fn admin_inquiries(status: Option<InquiryStatus>, page: u32, size: u32) -> QueryKey {
    QueryKey::new(Resource::Inquiries, "admin")
        .param(KeyParam::opt_status(status))
        .param(page)
        .param(size)
}

pub fn admin_inquiry_detail(id: Option<i64>) -> QueryKey {
    QueryKey::new(Resource::Inquiries, "admin-detail").param(KeyParam::opt_int(id))
}
