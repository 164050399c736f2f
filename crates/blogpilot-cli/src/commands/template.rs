use anyhow::Result;
use blogpilot_client::BlogPilotClient;
use blogpilot_core::models::template::CATEGORIES;
use blogpilot_core::models::{BlogTemplateRequest, BlogTemplateResponse, Platform};

use super::require_login;
use crate::cli::{OutputFormat, TemplateCommands, TemplateFields};
use crate::output::{print_field, print_info, print_json};

const DEFAULT_CHAR_LIMIT: u32 = 1500;
const DEFAULT_POST_TIME: &str = "09:00";

pub async fn run(client: &BlogPilotClient, command: &TemplateCommands, format: OutputFormat) -> Result<()> {
    match command {
        TemplateCommands::Options => options(format),
        TemplateCommands::Show => {
            require_login(client).await?;
            match client.my_template().await? {
                Some(template) => show(&template, format),
                None => {
                    print_info("No template yet. Create one with: blogpilot template create");
                    Ok(())
                }
            }
        }
        TemplateCommands::Create(fields) => {
            require_login(client).await?;
            let created = client.create_template(&new_request(fields)).await?;
            show(&created, format)
        }
        TemplateCommands::Update(fields) => {
            require_login(client).await?;
            let Some(current) = client.my_template().await? else {
                anyhow::bail!("No template to update. Create one with: blogpilot template create");
            };
            let mut req = BlogTemplateRequest::from(&current);
            apply(&mut req, fields);
            let updated = client.update_template(&req).await?;
            show(&updated, format)
        }
    }
}

fn new_request(fields: &TemplateFields) -> BlogTemplateRequest {
    let mut req = BlogTemplateRequest {
        title: String::new(),
        categories: Vec::new(),
        platforms: Vec::new(),
        shop_url: String::new(),
        include_images: false,
        image_count: None,
        char_limit: DEFAULT_CHAR_LIMIT,
        daily_post_time: DEFAULT_POST_TIME.to_string(),
    };
    apply(&mut req, fields);
    req
}

/// Overlay the fields given on the command line.
fn apply(req: &mut BlogTemplateRequest, fields: &TemplateFields) {
    if let Some(title) = &fields.title {
        req.title = title.clone();
    }
    if !fields.categories.is_empty() {
        req.categories = fields.categories.clone();
    }
    if !fields.platforms.is_empty() {
        req.platforms = fields.platforms.iter().map(|p| Platform::parse(p)).collect();
    }
    if let Some(shop_url) = &fields.shop_url {
        req.shop_url = shop_url.clone();
    }
    if let Some(include_images) = fields.include_images {
        req.include_images = include_images;
    }
    if let Some(image_count) = fields.image_count {
        req.image_count = Some(image_count);
    }
    if let Some(char_limit) = fields.char_limit {
        req.char_limit = char_limit;
    }
    if let Some(post_time) = &fields.post_time {
        req.daily_post_time = post_time.clone();
    }
}

fn show(template: &BlogTemplateResponse, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(template);
    }
    let platforms: Vec<String> = template.platforms.iter().map(|p| p.to_string()).collect();
    print_field("Title", &template.title);
    print_field("Categories", template.categories.join(", "));
    print_field("Platforms", platforms.join(", "));
    print_field("Shop URL", &template.shop_url);
    let images = match (template.include_images, template.image_count) {
        (true, Some(count)) => format!("{count} per post"),
        (true, None) => "yes".to_string(),
        (false, _) => "no".to_string(),
    };
    print_field("Images", images);
    print_field("Char limit", template.char_limit);
    print_field("Daily post time", &template.daily_post_time);
    Ok(())
}

fn options(format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "categories": CATEGORIES,
            "platforms": Platform::KNOWN,
        }));
    }
    print_field("Categories", CATEGORIES.join(", "));
    let platforms: Vec<String> = Platform::KNOWN
        .iter()
        .map(|p| format!("{} ({})", p.slug(), p.display_name()))
        .collect();
    print_field("Platforms", platforms.join(", "));
    Ok(())
}
