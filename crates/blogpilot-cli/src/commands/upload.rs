use std::path::Path;

use anyhow::{Context, Result};
use blogpilot_client::BlogPilotClient;

use super::require_login;
use crate::cli::{OutputFormat, UploadArgs};
use crate::output::print_json;

/// MIME type for common image extensions.
fn guess_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

pub async fn run(client: &BlogPilotClient, args: &UploadArgs, format: OutputFormat) -> Result<()> {
    require_login(client).await?;
    let content_type = match &args.content_type {
        Some(ct) => ct.clone(),
        None => guess_content_type(&args.file)
            .with_context(|| {
                format!(
                    "Cannot guess the image type of {}; pass --content-type",
                    args.file.display()
                )
            })?
            .to_string(),
    };
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .context("Invalid file name")?;
    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read file: {}", args.file.display()))?;

    let url = client.upload_image(file_name, &content_type, bytes).await?;
    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "url": url }));
    }
    println!("{url}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a/cover.PNG")), Some("image/png"));
        assert_eq!(guess_content_type(Path::new("photo.jpeg")), Some("image/jpeg"));
        assert_eq!(guess_content_type(Path::new("notes.txt")), None);
        assert_eq!(guess_content_type(Path::new("README")), None);
    }
}
