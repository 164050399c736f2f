use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated admin dashboard, recomputed server-side on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub today_blog_count: u64,
    pub active_user_count: u64,
    pub total_blog_count: u64,
    pub total_token_usage: u64,
    #[serde(default)]
    pub category_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub platform_usage: BTreeMap<String, u64>,
    #[serde(default)]
    pub today_blog_item_list: Vec<TodayBlogItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<DashboardComparison>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayBlogItem {
    pub title: String,
    pub platform: String,
    pub category: String,
    pub created_at: String,
    pub username: String,
    pub publish_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Period-over-period change of the headline counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardComparison {
    pub today_blog_count_change_rate: f64,
    pub today_blog_count_change: i64,
    pub active_user_count_change_rate: f64,
    pub active_user_count_change: i64,
    pub total_token_usage_change_rate: f64,
    pub total_token_usage_change: i64,
}
