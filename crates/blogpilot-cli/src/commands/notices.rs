use anyhow::Result;
use blogpilot_client::BlogPilotClient;
use blogpilot_client::queries::DEFAULT_NOTICE_PAGE_SIZE;
use blogpilot_core::models::{NoticeDetail, NoticeRequest};
use colored::Colorize;

use super::{read_text, require_admin};
use crate::cli::{NoticeFields, NoticesCommands, OutputFormat};
use crate::output::{print_field, print_json, print_page_footer, print_table, truncate};

pub async fn run(client: &BlogPilotClient, command: &NoticesCommands, format: OutputFormat) -> Result<()> {
    match command {
        NoticesCommands::List(args) => {
            let size = args.size.unwrap_or(DEFAULT_NOTICE_PAGE_SIZE);
            let page = client.notices(args.page, size).await?;
            if format == OutputFormat::Json {
                return print_json(&page);
            }
            print_table(
                &["ID", "Title", "Created"],
                page.items.iter().map(|n| {
                    let mut title = truncate(&n.title, 50);
                    if n.is_important {
                        title = format!("[중요] {title}");
                    }
                    if n.is_new {
                        title = format!("{title} N");
                    }
                    [n.id.to_string(), title, n.created_at.clone()]
                }),
            );
            print_page_footer(&page.meta);
            Ok(())
        }
        NoticesCommands::Show(args) => {
            let notice = client.notice(Some(args.id)).await?;
            show(&notice, format)
        }
        NoticesCommands::Create(fields) => {
            require_admin(client).await?;
            let created = client.create_notice(&request(fields)?).await?;
            show(&created, format)
        }
        NoticesCommands::Update(args) => {
            require_admin(client).await?;
            let res = client.update_notice(args.id, &request(&args.fields)?).await?;
            if format == OutputFormat::Json {
                print_json(&res)?;
            }
            Ok(())
        }
        NoticesCommands::Delete(args) => {
            require_admin(client).await?;
            let res = client.delete_notice(args.id).await?;
            if format == OutputFormat::Json {
                print_json(&res)?;
            }
            Ok(())
        }
    }
}

fn request(fields: &NoticeFields) -> Result<NoticeRequest> {
    Ok(NoticeRequest {
        title: fields.title.trim().to_string(),
        content: read_text(&fields.content, &fields.file)?,
        is_important: fields.important,
    })
}

fn show(notice: &NoticeDetail, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(notice);
    }
    let marker = if notice.is_important { "[중요] " } else { "" };
    println!("{}{}", marker.red(), notice.title.bold());
    print_field("Created", &notice.created_at);
    if let Some(updated_at) = &notice.updated_at {
        print_field("Updated", updated_at);
    }
    println!();
    println!("{}", notice.content);
    Ok(())
}
