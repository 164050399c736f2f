pub mod auth;
pub mod config;
pub mod dashboard;
pub mod faqs;
pub mod inquiries;
pub mod notices;
pub mod posts;
pub mod profile;
pub mod template;
pub mod upload;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use blogpilot_client::BlogPilotClient;

/// Inline text, else the file's contents, else stdin.
fn read_text(inline: &Option<String>, file: &Option<PathBuf>) -> Result<String> {
    if let Some(text) = inline {
        return Ok(text.clone());
    }
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

async fn require_login(client: &BlogPilotClient) -> Result<()> {
    if !client.session().is_authenticated().await {
        anyhow::bail!("Not logged in. Run: blogpilot auth login --email <email>");
    }
    Ok(())
}

/// Admin screens are hidden from other roles; the server still enforces
/// access on its own.
async fn require_admin(client: &BlogPilotClient) -> Result<()> {
    require_login(client).await?;
    if !client.session().is_admin().await {
        anyhow::bail!("This command requires an admin account");
    }
    Ok(())
}
