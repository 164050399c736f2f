use anyhow::Result;
use blogpilot_client::BlogPilotClient;
use blogpilot_core::models::DashboardComparison;
use colored::Colorize;

use super::require_admin;
use crate::cli::OutputFormat;
use crate::output::{print_field, print_json, print_table, truncate};

pub async fn run(client: &BlogPilotClient, format: OutputFormat) -> Result<()> {
    require_admin(client).await?;
    let summary = client.dashboard().await?;
    if format == OutputFormat::Json {
        return print_json(&summary);
    }

    print_field("Posts today", summary.today_blog_count);
    print_field("Active users", summary.active_user_count);
    print_field("Posts total", summary.total_blog_count);
    print_field("Token usage", summary.total_token_usage);
    if let Some(comparison) = &summary.comparison {
        print_comparison(comparison);
    }

    if !summary.category_distribution.is_empty() {
        println!();
        println!("{}", "Categories".bold());
        print_table(
            &["Category", "Posts"],
            summary
                .category_distribution
                .iter()
                .map(|(name, count)| [name.clone(), count.to_string()]),
        );
    }
    if !summary.platform_usage.is_empty() {
        println!();
        println!("{}", "Platforms".bold());
        print_table(
            &["Platform", "Posts"],
            summary
                .platform_usage
                .iter()
                .map(|(name, count)| [name.clone(), count.to_string()]),
        );
    }
    if !summary.today_blog_item_list.is_empty() {
        println!();
        println!("{}", "Today".bold());
        print_table(
            &["Title", "Author", "Platform", "Category", "Status"],
            summary.today_blog_item_list.iter().map(|item| {
                let status = match &item.failure_reason {
                    Some(reason) => format!("{} ({})", item.publish_status, truncate(reason, 30)),
                    None => item.publish_status.clone(),
                };
                [
                    truncate(&item.title, 40),
                    item.username.clone(),
                    item.platform.clone(),
                    item.category.clone(),
                    status,
                ]
            }),
        );
    }
    Ok(())
}

fn signed(rate: f64, change: i64) -> String {
    let text = format!("{change:+} ({rate:+.1}%)");
    if change >= 0 {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

fn print_comparison(comparison: &DashboardComparison) {
    print_field(
        "vs. yesterday",
        format!(
            "posts {}, users {}, tokens {}",
            signed(
                comparison.today_blog_count_change_rate,
                comparison.today_blog_count_change
            ),
            signed(
                comparison.active_user_count_change_rate,
                comparison.active_user_count_change
            ),
            signed(
                comparison.total_token_usage_change_rate,
                comparison.total_token_usage_change
            ),
        ),
    );
}
