//! Form validation applied before any request is issued.
//!
//! Every check returns the first failing field as a [`ValidationError`]
//! carrying a user-facing message. Checks that normalise input (trimmed
//! titles, `HH:MM:SS` post times) hand back the cleaned request.

use regex::Regex;
use std::sync::LazyLock;
use time::Time;
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::error::ValidationError;
use crate::models::{
    AdminAnswerRequest, BlogTemplateRequest, BlogUpdateRequest, CreateInquiryRequest,
    LoginRequest, NoticeRequest, SignupRequest, UpdateProfileRequest,
};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_INQUIRY_CONTENT_LEN: usize = 10;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

const TIME_WITH_SECONDS: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const TIME_WITHOUT_SECONDS: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

type Result<T> = std::result::Result<T, ValidationError>;

fn require(field: &'static str, value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(ValidationError::new(field, message))
    } else {
        Ok(())
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

pub fn validate_signup(req: &SignupRequest) -> Result<()> {
    require("username", &req.username, "이름을 입력해주세요.")?;
    require("email", &req.email, "이메일을 입력해주세요.")?;
    if !is_valid_email(&req.email) {
        return Err(ValidationError::new("email", "올바른 이메일 형식이 아닙니다."));
    }
    require("department", &req.department, "부서를 입력해주세요.")?;
    require("password", &req.password, "비밀번호를 입력해주세요.")?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::new(
            "password",
            format!("비밀번호는 {MIN_PASSWORD_LEN}자 이상이어야 합니다."),
        ));
    }
    Ok(())
}

pub fn validate_login(req: &LoginRequest) -> Result<()> {
    require("email", &req.email, "이메일을 입력해주세요.")?;
    require("password", &req.password, "비밀번호를 입력해주세요.")
}

/// Parse `HH:MM` or `HH:MM:SS` and render it as `HH:MM:SS`.
pub fn normalize_post_time(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let invalid = || ValidationError::new("dailyPostTime", "게시 시간은 HH:MM 형식이어야 합니다.");
    let parsed = Time::parse(raw, TIME_WITH_SECONDS)
        .or_else(|_| Time::parse(raw, TIME_WITHOUT_SECONDS))
        .map_err(|_| invalid())?;
    parsed.format(TIME_WITH_SECONDS).map_err(|_| invalid())
}

pub fn validate_template(req: &BlogTemplateRequest) -> Result<BlogTemplateRequest> {
    if req.categories.iter().all(|c| c.trim().is_empty()) {
        return Err(ValidationError::new("categories", "카테고리를 하나 이상 선택해주세요."));
    }
    if req.platforms.is_empty() {
        return Err(ValidationError::new("platforms", "플랫폼을 하나 이상 선택해주세요."));
    }
    require("shopUrl", &req.shop_url, "쇼핑몰 URL을 입력해주세요.")?;
    if req.char_limit == 0 {
        return Err(ValidationError::new("charLimit", "글자 수는 0보다 커야 합니다."));
    }
    if req.include_images && req.image_count.unwrap_or(0) < 1 {
        return Err(ValidationError::new("imageCount", "이미지 개수를 1개 이상 입력해주세요."));
    }
    let daily_post_time = normalize_post_time(&req.daily_post_time)?;

    Ok(BlogTemplateRequest {
        title: req.title.trim().to_string(),
        categories: req
            .categories
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        shop_url: req.shop_url.trim().to_string(),
        image_count: if req.include_images { req.image_count } else { None },
        daily_post_time,
        ..req.clone()
    })
}

pub fn validate_blog_update(req: &BlogUpdateRequest) -> Result<BlogUpdateRequest> {
    require("title", &req.title, "제목을 입력해주세요.")?;
    require("content", &req.content, "내용을 입력해주세요.")?;
    Ok(BlogUpdateRequest {
        title: req.title.trim().to_string(),
        ..req.clone()
    })
}

pub fn validate_notice(req: &NoticeRequest) -> Result<()> {
    require("title", &req.title, "제목을 입력해주세요.")
}

pub fn validate_inquiry(req: &CreateInquiryRequest) -> Result<CreateInquiryRequest> {
    require("title", &req.title, "제목을 입력해주세요.")?;
    let content = req.content.trim();
    if content.chars().count() < MIN_INQUIRY_CONTENT_LEN {
        return Err(ValidationError::new(
            "content",
            format!("문의 내용을 {MIN_INQUIRY_CONTENT_LEN}자 이상 입력해주세요."),
        ));
    }
    Ok(CreateInquiryRequest {
        title: req.title.trim().to_string(),
        inquiry_category: req.inquiry_category,
        content: content.to_string(),
    })
}

pub fn validate_answer(req: &AdminAnswerRequest) -> Result<()> {
    require("answerContent", &req.answer_content, "답변 내용을 입력해주세요.")
}

pub fn validate_profile_update(req: &UpdateProfileRequest) -> Result<UpdateProfileRequest> {
    require("username", &req.username, "이름을 입력해주세요.")?;
    Ok(UpdateProfileRequest {
        username: req.username.trim().to_string(),
        department: req.department.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InquiryCategory, Platform};

    fn template() -> BlogTemplateRequest {
        BlogTemplateRequest {
            title: " 내 템플릿 ".into(),
            categories: vec!["식품".into()],
            platforms: vec![Platform::Naver],
            shop_url: "https://shop.example.com".into(),
            include_images: true,
            image_count: Some(2),
            char_limit: 1000,
            daily_post_time: "08:30".into(),
        }
    }

    #[test]
    fn test_signup_rules() {
        let mut req = SignupRequest {
            username: "kim".into(),
            email: "a@b.com".into(),
            department: "마케팅".into(),
            password: "pw123456".into(),
        };
        assert!(validate_signup(&req).is_ok());

        req.password = "short".into();
        assert_eq!(validate_signup(&req).unwrap_err().field, "password");

        req.password = "pw123456".into();
        req.email = "not-an-email".into();
        assert_eq!(validate_signup(&req).unwrap_err().field, "email");

        req.email = "a@b.com".into();
        req.department = "  ".into();
        assert_eq!(validate_signup(&req).unwrap_err().field, "department");
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req = LoginRequest {
            email: "a@b.com".into(),
            password: String::new(),
        };
        assert_eq!(validate_login(&req).unwrap_err().field, "password");
    }

    #[test]
    fn test_post_time_normalised() {
        assert_eq!(normalize_post_time("08:30").unwrap(), "08:30:00");
        assert_eq!(normalize_post_time("23:05:59").unwrap(), "23:05:59");
        assert!(normalize_post_time("25:00").is_err());
        assert!(normalize_post_time("morning").is_err());
    }

    #[test]
    fn test_template_cleaned() {
        let cleaned = validate_template(&template()).unwrap();
        assert_eq!(cleaned.title, "내 템플릿");
        assert_eq!(cleaned.daily_post_time, "08:30:00");
        assert_eq!(cleaned.image_count, Some(2));
    }

    #[test]
    fn test_template_rules() {
        let mut req = template();
        req.platforms.clear();
        assert_eq!(validate_template(&req).unwrap_err().field, "platforms");

        let mut req = template();
        req.image_count = None;
        assert_eq!(validate_template(&req).unwrap_err().field, "imageCount");

        let mut req = template();
        req.include_images = false;
        req.image_count = Some(4);
        assert_eq!(validate_template(&req).unwrap().image_count, None);

        let mut req = template();
        req.char_limit = 0;
        assert_eq!(validate_template(&req).unwrap_err().field, "charLimit");
    }

    #[test]
    fn test_inquiry_content_length() {
        let mut req = CreateInquiryRequest {
            title: "결제 문의".into(),
            inquiry_category: InquiryCategory::Payment,
            content: "  짧은 내용  ".into(),
        };
        assert_eq!(validate_inquiry(&req).unwrap_err().field, "content");

        req.content = "결제가 두 번 청구되었습니다. 확인 부탁드립니다.".into();
        assert!(validate_inquiry(&req).is_ok());
    }

    #[test]
    fn test_blog_update_title_trimmed() {
        let req = BlogUpdateRequest {
            title: "  새 제목 ".into(),
            content: "본문".into(),
            category: "식품".into(),
            blog_template_id: None,
        };
        assert_eq!(validate_blog_update(&req).unwrap().title, "새 제목");
    }
}
