use anyhow::Result;
use blogpilot_client::BlogPilotClient;
use blogpilot_core::models::BlogUpdateRequest;
use colored::Colorize;

use super::{read_text, require_login};
use crate::cli::{OutputFormat, PostsCommands};
use crate::output::{print_json, print_page_footer, print_table, truncate, yes_no};

pub async fn run(client: &BlogPilotClient, command: &PostsCommands, format: OutputFormat) -> Result<()> {
    require_login(client).await?;
    match command {
        PostsCommands::List(args) => {
            let page = client.my_blogs(args.page, args.category.as_deref()).await?;
            if format == OutputFormat::Json {
                return print_json(&page);
            }
            print_table(
                &["ID", "Title", "Category", "Created", "Today"],
                page.items.iter().map(|b| {
                    [
                        b.id.to_string(),
                        truncate(&b.title, 40),
                        b.category.clone(),
                        b.created_at.clone(),
                        yes_no(b.is_today),
                    ]
                }),
            );
            print_page_footer(&page.meta);
            Ok(())
        }
        PostsCommands::Edit(args) => {
            let content = read_text(&args.content, &args.file)?;
            let updated = client
                .update_blog(
                    args.id,
                    &BlogUpdateRequest {
                        title: args.title.clone(),
                        content,
                        category: args.category.clone(),
                        blog_template_id: None,
                    },
                )
                .await?;
            if format == OutputFormat::Json {
                return print_json(&updated);
            }
            println!("{} {}", "Post".cyan(), updated.id.to_string().cyan());
            Ok(())
        }
    }
}
