use anyhow::Result;
use blogpilot_client::BlogPilotClient;
use blogpilot_core::models::{UpdateProfileRequest, UserDetailResponse};
use colored::Colorize;

use super::{require_admin, require_login};
use crate::cli::{OutputFormat, ProfileCommands};
use crate::output::{print_field, print_json};

pub async fn run(client: &BlogPilotClient, command: &ProfileCommands, format: OutputFormat) -> Result<()> {
    match command {
        ProfileCommands::Show => {
            require_login(client).await?;
            let profile = client.profile().await?;
            show(&profile, format)
        }
        ProfileCommands::Update(args) => {
            require_login(client).await?;
            let updated = client
                .update_profile(&UpdateProfileRequest {
                    username: args.username.clone(),
                    department: args.department.clone(),
                })
                .await?;
            show(&updated, format)
        }
        ProfileCommands::User(args) => {
            require_admin(client).await?;
            let profile = client.user_profile(Some(args.id)).await?;
            show(&profile, format)
        }
    }
}

fn show(profile: &UserDetailResponse, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(profile);
    }
    println!("{} {}", profile.username.bold(), format!("<{}>", profile.email).dimmed());
    print_field("User ID", profile.user_id);
    print_field("Role", &profile.role);
    print_field("Department", profile.department.as_deref().unwrap_or("-"));
    if let Some(tokens) = profile.token_usage {
        print_field("Token usage", tokens);
    }
    if let Some(created_at) = &profile.created_at {
        print_field("Joined", created_at);
    }
    Ok(())
}
