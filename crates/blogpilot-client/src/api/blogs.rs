use blogpilot_core::models::{Blog, BlogUpdateRequest, BlogsMyResponse, Paged};

use super::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// `category` is left out of the query when unset.
    pub async fn my_blogs(&self, page: u32, category: Option<&str>) -> Result<Paged<Blog>> {
        let mut query = vec![("page", page.to_string())];
        if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
            query.push(("category", category.to_string()));
        }
        let res: BlogsMyResponse = self.http.get("/api/blogs/my", &query).await?;
        Ok(res.into())
    }

    pub async fn update_blog(&self, id: i64, req: &BlogUpdateRequest) -> Result<Blog> {
        self.http.put(&format!("/api/blogs/{id}"), req).await
    }
}
