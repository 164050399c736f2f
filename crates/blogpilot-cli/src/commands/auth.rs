use anyhow::Result;
use blogpilot_client::BlogPilotClient;
use blogpilot_core::models::SignupRequest;
use colored::Colorize;

use crate::cli::{AuthCommands, OutputFormat};
use crate::config::ProfileStore;
use crate::output::{print_error, print_field, print_json};

pub async fn run(
    client: &BlogPilotClient,
    command: &AuthCommands,
    profile: &str,
    format: OutputFormat,
) -> Result<()> {
    match command {
        AuthCommands::Login(args) => {
            client.login(&args.email, &args.password).await?;
            ProfileStore::open_default()?.remember_server(profile, client.api().http().base_url())?;
            Ok(())
        }
        AuthCommands::Logout => {
            if !client.session().is_authenticated().await {
                println!("No session found for profile \"{profile}\"");
                return Ok(());
            }
            client.logout().await?;
            Ok(())
        }
        AuthCommands::Whoami => whoami(client, profile, format).await,
        AuthCommands::Signup(args) => {
            let created = client
                .signup(&SignupRequest {
                    username: args.username.trim().to_string(),
                    email: args.email.trim().to_string(),
                    department: args.department.trim().to_string(),
                    password: args.password.clone(),
                })
                .await?;
            if format == OutputFormat::Json {
                print_json(&created)?;
            }
            Ok(())
        }
        AuthCommands::CheckEmail(args) => {
            let res = client.check_email(&args.email).await?;
            if format == OutputFormat::Json {
                print_json(&res)?;
            }
            Ok(())
        }
    }
}

async fn whoami(client: &BlogPilotClient, profile: &str, format: OutputFormat) -> Result<()> {
    let Some(session) = client.session().current().await else {
        print_error(&format!("Not logged in (profile: \"{profile}\")"));
        return Ok(());
    };
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "profile": profile,
            "server": client.api().http().base_url(),
            "email": session.email,
            "username": session.username,
            "role": session.role,
            "canRefresh": session.can_refresh(),
        }));
    }
    print_field("Profile", profile);
    print_field("Server", client.api().http().base_url().cyan());
    print_field("User", format!("{} <{}>", session.username, session.email));
    print_field("Role", &session.role);
    print_field("Token", session.token_preview());
    if !session.can_refresh() {
        println!(
            "  {}",
            "legacy session without refresh token; log in again when it expires".yellow()
        );
    }
    Ok(())
}
