//! Terminal host adapter: pages are printed to stdout, controls are typed.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use embedkit_application::{ChannelId, MessageHandle, RenderSink};
use embedkit_core::embed::EmbedDocument;
use embedkit_core::error::Result;
use embedkit_core::pager::{Control, Page, SessionId};

#[derive(Debug, Default)]
pub struct TerminalSink {
    next_id: AtomicU64,
}

impl TerminalSink {
    fn print(page: &Page, label: Option<&str>) {
        println!("{}", "─".repeat(60));
        match page {
            Page::Embed(document) => print!("{}", render_document(document)),
            Page::Text(text) => println!("{text}"),
        }
        if let Some(label) = label {
            println!("[{label}]");
        }
    }
}

#[async_trait]
impl RenderSink for TerminalSink {
    async fn render_page(
        &self,
        channel: &ChannelId,
        page: &Page,
        label: Option<&str>,
    ) -> Result<MessageHandle> {
        Self::print(page, label);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Ok(MessageHandle::new(channel.clone(), id.to_string()))
    }

    async fn update_page(
        &self,
        _handle: &MessageHandle,
        page: &Page,
        label: Option<&str>,
    ) -> Result<()> {
        Self::print(page, label);
        Ok(())
    }

    async fn attach_controls(
        &self,
        _handle: &MessageHandle,
        _session_id: &SessionId,
        controls: &[Control],
    ) -> Result<()> {
        let keys: Vec<String> = controls
            .iter()
            .map(|control| format!("{} {}", control.label(), key_for(control)))
            .collect();
        println!("{}   (or a page number)", keys.join("  "));
        Ok(())
    }

    async fn detach_controls(&self, _handle: &MessageHandle) -> Result<()> {
        println!("(view closed)");
        Ok(())
    }
}

fn key_for(control: &Control) -> &'static str {
    match control {
        Control::First => "f",
        Control::Prev => "p",
        Control::Next => "n",
        Control::Last => "l",
        Control::Jump(_) => "#",
        Control::Close => "q",
    }
}

/// Maps a typed line to a control. Page numbers are one-based.
pub fn parse_control(line: &str) -> Option<Control> {
    match line.trim() {
        "f" | "first" => Some(Control::First),
        "p" | "prev" => Some(Control::Prev),
        "n" | "next" | "" => Some(Control::Next),
        "l" | "last" => Some(Control::Last),
        "q" | "quit" | "close" => Some(Control::Close),
        other => other
            .parse::<usize>()
            .ok()
            .map(|page| Control::Jump(page.saturating_sub(1))),
    }
}

fn render_document(document: &EmbedDocument) -> String {
    let mut out = String::new();
    if let Some(author) = document.author() {
        out.push_str(&format!("  {}\n", author.name));
    }
    if let Some(title) = document.title() {
        out.push_str(&format!("# {title}\n"));
    }
    if let Some(description) = document.description() {
        out.push_str(description);
        out.push('\n');
    }
    for field in document.fields() {
        let marker = if field.inline { " (inline)" } else { "" };
        out.push_str(&format!("\n**{}**{marker}\n{}\n", field.name, field.value));
    }
    if let Some(image) = document.image() {
        out.push_str(&format!("[image] {image}\n"));
    }
    if let Some(thumbnail) = document.thumbnail() {
        out.push_str(&format!("[thumbnail] {thumbnail}\n"));
    }
    let footer = document.footer().map(|footer| footer.text.clone());
    let timestamp = document.timestamp().map(|timestamp| timestamp.to_rfc3339());
    match (footer, timestamp) {
        (Some(text), Some(timestamp)) => out.push_str(&format!("-- {text} • {timestamp}\n")),
        (Some(text), None) => out.push_str(&format!("-- {text}\n")),
        (None, Some(timestamp)) => out.push_str(&format!("-- {timestamp}\n")),
        (None, None) => {}
    }
    if let Some(color) = document.color() {
        out.push_str(&format!("color #{color:06X}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedkit_core::embed::EmbedDraft;

    #[test]
    fn test_parse_control() {
        assert_eq!(parse_control("n"), Some(Control::Next));
        assert_eq!(parse_control(""), Some(Control::Next));
        assert_eq!(parse_control(" q "), Some(Control::Close));
        assert_eq!(parse_control("3"), Some(Control::Jump(2)));
        assert_eq!(parse_control("0"), Some(Control::Jump(0)));
        assert_eq!(parse_control("what"), None);
    }

    #[test]
    fn test_render_document() {
        let document = EmbedDraft::new()
            .with_title("Rules")
            .with_description("Be nice")
            .with_field("1", "No spam", true)
            .with_color(0x00ff00)
            .build()
            .unwrap();

        let text = render_document(&document);
        assert!(text.contains("# Rules"));
        assert!(text.contains("**1** (inline)"));
        assert!(text.contains("color #00FF00"));
    }

    #[test]
    fn test_timestamp_without_footer_is_rendered() {
        let at = chrono::DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&chrono::Utc);
        let document = EmbedDraft::new()
            .with_title("Dated")
            .with_timestamp(at)
            .build()
            .unwrap();
        assert!(render_document(&document).contains("-- 2024-05-01T12:00:00+00:00"));

        let document = EmbedDraft::new()
            .with_title("Dated")
            .with_footer("Weekly")
            .with_timestamp(at)
            .build()
            .unwrap();
        assert!(render_document(&document).contains("-- Weekly • 2024-05-01T12:00:00+00:00"));
    }
}
