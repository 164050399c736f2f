use anyhow::Result;
use blogpilot_core::models::PageMeta;
use blogpilot_core::{ClientEvent, Notification, NotificationVariant, SessionEvent};
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tokio::sync::broadcast::Receiver;

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "•".cyan(), msg);
}

pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{}: {}", label.cyan(), value);
}

/// Rounded table with a header row.
pub fn print_table<I, R>(headers: &[&str], rows: I)
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| h.to_string()));
    let mut empty = true;
    for row in rows {
        builder.push_record(row);
        empty = false;
    }
    if empty {
        println!("Nothing found.");
        return;
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}

pub fn print_page_footer(meta: &PageMeta) {
    println!(
        "Page {}/{} ({} total)",
        meta.current_page,
        meta.total_pages.max(1),
        meta.total_elements
    );
}

pub fn yes_no(flag: bool) -> String {
    if flag { "yes".into() } else { "-".into() }
}

/// Shorten long text to one table cell.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let head: String = single_line.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{head}…")
}

fn print_notification(n: &Notification) {
    let line = match &n.description {
        Some(description) => format!("{} {}", n.title.bold(), description),
        None => n.title.bold().to_string(),
    };
    match n.variant {
        NotificationVariant::Success => print_success(&line),
        NotificationVariant::Destructive => print_error(&line),
        NotificationVariant::Default => print_info(&line),
    }
}

/// Print notifications and session changes received so far. Returns how
/// many user-facing messages were shown.
pub fn render_events(rx: &mut Receiver<ClientEvent>) -> usize {
    let mut shown = 0;
    while let Ok(event) = rx.try_recv() {
        match event {
            ClientEvent::Notification(n) => {
                print_notification(&n);
                shown += 1;
            }
            ClientEvent::Session(SessionEvent::Expired { redirect_to }) => {
                print_error(&format!(
                    "세션이 만료되었습니다. 다시 로그인해주세요. (blogpilot auth login, web: {redirect_to})"
                ));
                shown += 1;
            }
            ClientEvent::Session(event) => tracing::debug!(?event, "session event"),
        }
    }
    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("짧은 글", 10), "짧은 글");
        assert_eq!(truncate("줄\n바꿈", 10), "줄 바꿈");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_render_events_counts_user_messages() {
        let events = blogpilot_core::EventBroadcaster::new();
        let mut rx = events.subscribe();
        events.notify(Notification::success("완료", None));
        events.send_session(SessionEvent::Refreshed);
        events.send_session(SessionEvent::Expired {
            redirect_to: "/auth".into(),
        });
        assert_eq!(render_events(&mut rx), 2);
        assert_eq!(render_events(&mut rx), 0);
    }
}
