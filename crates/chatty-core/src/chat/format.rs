//! Plain-text rendering of a chat history.
//!
//! One line per message, joined with `\n`, no trailing newline:
//!
//! ```text
//! [2026-10-18T09:15:02.113Z] u1: hello
//! [2026-10-18T09:15:04.870Z] u1: world
//! ```
//!
//! Backslashes, LF and CR inside the content are escaped so a message never
//! spans more than one line. An empty history renders as the empty string.

use chatty_types::chat::ChatMessage;
use chrono::SecondsFormat;

/// Render a whole history in storage order.
pub fn render_history(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single message as one history line.
pub fn render_line(message: &ChatMessage) -> String {
    format!(
        "[{}] {}: {}",
        message
            .created_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        message.user_id,
        escape_content(&message.content)
    )
}

fn escape_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatty_types::chat::UserId;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn message(content: &str, seq: i64, secs: i64) -> ChatMessage {
        ChatMessage {
            id: Uuid::now_v7(),
            user_id: UserId::parse("u1").unwrap(),
            content: content.to_string(),
            seq,
            created_at: Utc.timestamp_opt(1_700_000_000 + secs, 5_000_000).unwrap(),
        }
    }

    #[test]
    fn test_render_empty_history() {
        assert_eq!(render_history(&[]), "");
    }

    #[test]
    fn test_render_line_format() {
        let line = render_line(&message("hello", 1, 0));
        assert_eq!(line, "[2023-11-14T22:13:20.005Z] u1: hello");
    }

    #[test]
    fn test_render_history_joins_without_trailing_newline() {
        let rendered = render_history(&[message("hello", 1, 0), message("world", 2, 1)]);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("u1: hello"));
        assert!(lines[1].ends_with("u1: world"));
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn test_multiline_content_stays_on_one_line() {
        let rendered = render_history(&[message("first\nsecond\r\nC:\\tmp", 1, 0)]);
        assert_eq!(rendered.lines().count(), 1);
        assert!(rendered.ends_with(r"u1: first\nsecond\r\nC:\\tmp"));
    }
}
