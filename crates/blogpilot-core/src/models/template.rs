use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Publishing platform. Serialized as the API slug; unknown slugs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Naver,
    Tistory,
    Medium,
    Brunch,
    Velog,
    Other(String),
}

impl Platform {
    pub const KNOWN: [Platform; 5] = [
        Platform::Naver,
        Platform::Tistory,
        Platform::Medium,
        Platform::Brunch,
        Platform::Velog,
    ];

    /// Accepts a slug in any case or a display name.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "naver" => return Platform::Naver,
            "tistory" => return Platform::Tistory,
            "medium" => return Platform::Medium,
            "brunch" => return Platform::Brunch,
            "velog" => return Platform::Velog,
            _ => {}
        }
        Platform::KNOWN
            .into_iter()
            .find(|p| p.display_name() == trimmed)
            .unwrap_or_else(|| Platform::Other(trimmed.to_string()))
    }

    pub fn slug(&self) -> &str {
        match self {
            Platform::Naver => "naver",
            Platform::Tistory => "tistory",
            Platform::Medium => "medium",
            Platform::Brunch => "brunch",
            Platform::Velog => "velog",
            Platform::Other(s) => s,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Platform::Naver => "네이버 블로그",
            Platform::Tistory => "티스토리",
            Platform::Medium => "미디움",
            Platform::Brunch => "브런치",
            Platform::Velog => "벨로그",
            Platform::Other(s) => s,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Platform::parse(&raw))
    }
}

/// Content categories offered when configuring a template.
pub const CATEGORIES: [&str; 8] = [
    "남성 의류",
    "여성 의류",
    "생활용품",
    "신발",
    "메이크업 제품",
    "액세서리",
    "전자제품",
    "식품",
];

/// The per-user generation template. At most one exists per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogTemplateResponse {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub shop_url: String,
    #[serde(default)]
    pub include_images: bool,
    #[serde(default)]
    pub image_count: Option<u32>,
    pub char_limit: u32,
    /// `HH:MM:SS`
    pub daily_post_time: String,
}

/// Body for both creating and updating the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogTemplateRequest {
    pub title: String,
    pub categories: Vec<String>,
    pub platforms: Vec<Platform>,
    pub shop_url: String,
    pub include_images: bool,
    pub image_count: Option<u32>,
    pub char_limit: u32,
    pub daily_post_time: String,
}

impl From<&BlogTemplateResponse> for BlogTemplateRequest {
    fn from(t: &BlogTemplateResponse) -> Self {
        Self {
            title: t.title.clone(),
            categories: t.categories.clone(),
            platforms: t.platforms.clone(),
            shop_url: t.shop_url.clone(),
            include_images: t.include_images,
            image_count: t.image_count,
            char_limit: t.char_limit,
            daily_post_time: t.daily_post_time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_parse_slug_and_display() {
        assert_eq!(Platform::parse("Naver"), Platform::Naver);
        assert_eq!(Platform::parse("티스토리"), Platform::Tistory);
        assert_eq!(Platform::parse("wordpress"), Platform::Other("wordpress".into()));
        assert_eq!(Platform::Velog.display_name(), "벨로그");
    }

    #[test]
    fn test_template_platforms_serialize_as_slugs() {
        let req = BlogTemplateRequest {
            title: "kim의 템플릿".into(),
            categories: vec!["식품".into()],
            platforms: vec![Platform::Naver, Platform::Brunch],
            shop_url: "https://shop.example.com".into(),
            include_images: false,
            image_count: None,
            char_limit: 500,
            daily_post_time: "08:00:00".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["platforms"], serde_json::json!(["naver", "brunch"]));
        assert_eq!(json["imageCount"], serde_json::Value::Null);
        assert_eq!(json["dailyPostTime"], "08:00:00");
    }
}
