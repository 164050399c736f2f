use anyhow::Result;
use blogpilot_client::BlogPilotClient;
use blogpilot_client::queries::{DEFAULT_ADMIN_INQUIRY_PAGE_SIZE, DEFAULT_MY_INQUIRY_PAGE_SIZE};
use blogpilot_core::models::{CreateInquiryRequest, InquiryDetail, InquiryListItem, InquiryStatus, Paged};
use colored::{ColoredString, Colorize};

use super::{require_admin, require_login};
use crate::cli::{InquiriesAdminCommands, InquiriesCommands, OutputFormat};
use crate::output::{print_field, print_json, print_page_footer, print_table, truncate};

pub async fn run(client: &BlogPilotClient, command: &InquiriesCommands, format: OutputFormat) -> Result<()> {
    match command {
        InquiriesCommands::My(args) => {
            require_login(client).await?;
            let size = args.size.unwrap_or(DEFAULT_MY_INQUIRY_PAGE_SIZE);
            let page = client.my_inquiries(args.page, size, args.status).await?;
            list(&page, false, format)
        }
        InquiriesCommands::Show(args) => {
            require_login(client).await?;
            let inquiry = client.my_inquiry(Some(args.id)).await?;
            show(&inquiry, format)
        }
        InquiriesCommands::Create(args) => {
            require_login(client).await?;
            let created = client
                .create_inquiry(&CreateInquiryRequest {
                    title: args.title.clone(),
                    inquiry_category: args.category,
                    content: args.content.clone(),
                })
                .await?;
            if format == OutputFormat::Json {
                print_json(&created)?;
            }
            Ok(())
        }
        InquiriesCommands::Admin(admin) => {
            require_admin(client).await?;
            run_admin(client, &admin.command, format).await
        }
    }
}

async fn run_admin(
    client: &BlogPilotClient,
    command: &InquiriesAdminCommands,
    format: OutputFormat,
) -> Result<()> {
    match command {
        InquiriesAdminCommands::List(args) => {
            let size = args.size.unwrap_or(DEFAULT_ADMIN_INQUIRY_PAGE_SIZE);
            let page = client.admin_inquiries(args.status, args.page, size).await?;
            list(&page, true, format)
        }
        InquiriesAdminCommands::Show(args) => {
            let inquiry = client.admin_inquiry(Some(args.id)).await?;
            show(&inquiry, format)
        }
        InquiriesAdminCommands::Answer(args) => {
            let answered = client.create_answer(args.id, &args.content).await?;
            if format == OutputFormat::Json {
                print_json(&answered)?;
            }
            Ok(())
        }
        InquiriesAdminCommands::DeleteAnswer(args) => {
            let res = client.delete_answer(args.id).await?;
            if format == OutputFormat::Json {
                print_json(&res)?;
            }
            Ok(())
        }
    }
}

fn status_label(status: InquiryStatus) -> ColoredString {
    match status {
        InquiryStatus::Pending => status.label().yellow(),
        InquiryStatus::InProgress => status.label().blue(),
        InquiryStatus::Completed => status.label().green(),
    }
}

fn list(page: &Paged<InquiryListItem>, with_author: bool, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(page);
    }
    let mut headers = vec!["ID", "Title", "Category", "Status", "Created"];
    if with_author {
        headers.push("Author");
    }
    print_table(
        &headers,
        page.items.iter().map(|i| {
            let mut row = vec![
                i.id.to_string(),
                truncate(&i.title, 40),
                i.category.label().to_string(),
                status_label(i.status).to_string(),
                i.created_at.clone(),
            ];
            if with_author {
                row.push(
                    i.username
                        .clone()
                        .or_else(|| i.email.clone())
                        .unwrap_or_else(|| "-".into()),
                );
            }
            row
        }),
    );
    print_page_footer(&page.meta);
    Ok(())
}

fn show(inquiry: &InquiryDetail, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(inquiry);
    }
    println!("{}", inquiry.title.bold());
    print_field("Category", inquiry.category.label());
    print_field("Status", status_label(inquiry.status));
    print_field("Created", &inquiry.created_at);
    if let Some(author) = inquiry.username.as_ref().or(inquiry.email.as_ref()) {
        print_field("Author", author);
    }
    println!();
    println!("{}", inquiry.content);
    if let Some(answer) = &inquiry.answer {
        println!();
        println!("{}", "답변".green().bold());
        if let Some(answered_at) = &answer.answered_at {
            print_field("Answered", answered_at);
        }
        println!("{}", answer.answer_content);
    }
    Ok(())
}
