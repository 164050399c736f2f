use anyhow::Result;
use colored::Colorize;

use crate::cli::{ConfigCommands, OutputFormat};
use crate::config::ProfileStore;
use crate::output::{print_field, print_json, print_success, print_table};

pub fn run(command: &ConfigCommands, profile: &str, format: OutputFormat) -> Result<()> {
    let store = ProfileStore::open_default()?;
    match command {
        ConfigCommands::Show => {
            let cfg = store.load_profile(profile)?;
            if format == OutputFormat::Json {
                return print_json(&cfg);
            }
            print_field("Profile", profile);
            print_field("Server", cfg.server.as_deref().unwrap_or("(not set)"));
            print_field("Format", cfg.format.as_deref().unwrap_or("table"));
            print_field("File", store.path().display().to_string().dimmed());
        }
        ConfigCommands::Set(args) => {
            store.set(profile, &args.key, &args.value)?;
            print_success(&format!("Set {} = {}", args.key, args.value));
        }
        ConfigCommands::Profiles => {
            let all = store.load_all()?;
            if format == OutputFormat::Json {
                return print_json(&all);
            }
            print_table(
                &["Profile", "Server", "Format"],
                all.iter().map(|(name, cfg)| {
                    let marker = if name == profile { "*" } else { "" };
                    [
                        format!("{name}{marker}"),
                        cfg.server.clone().unwrap_or_else(|| "-".into()),
                        cfg.format.clone().unwrap_or_else(|| "-".into()),
                    ]
                }),
            );
        }
    }
    Ok(())
}
