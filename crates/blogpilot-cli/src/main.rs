mod cli;
mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use blogpilot_client::config::loader::load_config;
use blogpilot_client::observability::init_tracing_with_level;
use blogpilot_client::{BlogPilotClient, ClientError};
use clap::Parser;

use cli::{Cli, Commands, OutputFormat};
use config::ProfileStore;
use output::{print_error, render_events};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut client_config = load_config(cli.config.as_deref())
        .map_err(anyhow::Error::msg)
        .context("Failed to load client configuration")?;
    let level = if cli.verbose {
        "debug"
    } else {
        client_config.logging.level.as_str()
    };
    init_tracing_with_level(level);

    let profile = cli.profile.as_str();
    let store = ProfileStore::open_default()?;
    let format = store.resolve_format(cli.format, profile)?;

    if let Commands::Config(args) = &cli.command {
        return commands::config::run(&args.command, profile, format);
    }

    client_config.api.base_url =
        store.resolve_server(cli.server.as_deref(), profile, &client_config.api.base_url)?;
    let client = BlogPilotClient::with_file_storage(client_config, profile)
        .context("Failed to create API client")?;
    client.init().await;

    let mut events = client.subscribe();
    let outcome = dispatch(&client, &cli.command, profile, format).await;
    let shown = render_events(&mut events);

    match outcome {
        Ok(()) => Ok(()),
        // The failure was already reported as a notification.
        Err(e) if shown > 0 && e.downcast_ref::<ClientError>().is_some() => {
            tracing::debug!(error = %e, "command failed");
            std::process::exit(1);
        }
        Err(e) => Err(e),
    }
}

async fn dispatch(
    client: &BlogPilotClient,
    command: &Commands,
    profile: &str,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Auth(args) => commands::auth::run(client, &args.command, profile, format).await,
        Commands::Posts(args) => commands::posts::run(client, &args.command, format).await,
        Commands::Template(args) => commands::template::run(client, &args.command, format).await,
        Commands::Notices(args) => commands::notices::run(client, &args.command, format).await,
        Commands::Inquiries(args) => commands::inquiries::run(client, &args.command, format).await,
        Commands::Faqs => commands::faqs::run(client, format).await,
        Commands::Profile(args) => commands::profile::run(client, &args.command, format).await,
        Commands::Dashboard => commands::dashboard::run(client, format).await,
        Commands::Upload(args) => commands::upload::run(client, args, format).await,
        Commands::Config(args) => commands::config::run(&args.command, profile, format),
    }
}
