use anyhow::Result;
use blogpilot_client::BlogPilotClient;
use colored::Colorize;

use crate::cli::OutputFormat;
use crate::output::print_json;

pub async fn run(client: &BlogPilotClient, format: OutputFormat) -> Result<()> {
    let mut faqs = client.faqs().await?;
    faqs.sort_by_key(|f| f.sort_order);
    if format == OutputFormat::Json {
        return print_json(&faqs);
    }
    if faqs.is_empty() {
        println!("Nothing found.");
    }
    for faq in &faqs {
        println!("{} {}", "Q.".cyan().bold(), faq.question.bold());
        println!("{} {}", "A.".green(), faq.answer);
        println!();
    }
    Ok(())
}
