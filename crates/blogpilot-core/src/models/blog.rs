use serde::{Deserialize, Serialize};

use super::page::{PageMeta, Paged};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_template_id: Option<serde_json::Value>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogsMyResponse {
    #[serde(default)]
    pub blogs: Vec<Blog>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl From<BlogsMyResponse> for Paged<Blog> {
    fn from(res: BlogsMyResponse) -> Self {
        Paged {
            items: res.blogs,
            meta: res.meta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogUpdateRequest {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blog_template_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blogs_page_parses_flattened_meta() {
        let raw = r#"{
            "blogs": [{"id": 1, "title": "t", "content": "c", "category": "식품",
                       "createdAt": "2024-11-15T09:00:00", "isToday": true}],
            "currentPage": 2, "totalPages": 4, "totalElements": 31,
            "size": 10, "first": false, "last": false
        }"#;
        let res: BlogsMyResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(res.meta.current_page, 2);
        assert_eq!(res.blogs.len(), 1);
        assert!(res.blogs[0].is_today);

        let paged: Paged<Blog> = res.into();
        assert_eq!(paged.meta.total_elements, 31);
    }
}
