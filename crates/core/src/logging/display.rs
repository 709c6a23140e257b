//! Turns [`LogMessage`]s into items for the log display card.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::error::{Result, UiError};

use super::message::{LogLevel, LogMessage};

const USER_PATH_PLACEHOLDER: &str = r"C:\Users\$env:USERNAME\";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextDisplayCardItem {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub html_class: String,
}

fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(https?://[^\s'"]+)"#).expect("static regex"))
}

fn newline_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r?\n").expect("static regex"))
}

fn user_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)C:\\Users\\[^\\]+\\").expect("static regex"))
}

/// Hide the Windows account name in `C:\Users\<name>\` paths.
pub fn sanitize_message(message: &str) -> String {
    user_path_regex()
        .replace_all(message, NoExpand(USER_PATH_PLACEHOLDER))
        .into_owned()
}

/// Link bare URLs and turn line breaks into `<br>`.
pub fn format_message(message: &str) -> String {
    let linked = url_regex().replace_all(
        message,
        r#"<a class="anchor" href="$1" target="_blank">$1</a>"#,
    );
    newline_regex().replace_all(&linked, "<br>").into_owned()
}

/// CSS class for an already formatted line, picked from its `[LEVEL]` tag.
pub fn get_log_class(message: &str) -> &'static str {
    if message.contains("[DEBUG]") {
        "text-primary-500"
    } else if message.contains("[INFO]") {
        "text-success-500"
    } else if message.contains("[WARNING]") {
        "text-warning-500"
    } else if message.contains("[ERROR]") {
        "text-error-500"
    } else if message.contains("[FATAL]") {
        "text-error-950"
    } else {
        "text-primary-50"
    }
}

fn debug_location(log_message: &LogMessage) -> Option<String> {
    let line = log_message.line_number.map(|n| n.to_string());
    let parts: Vec<&str> = [
        log_message.source_file.as_deref(),
        log_message.function_name.as_deref(),
        line.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("::"))
    }
}

pub fn log_message_to_text_display_card_item(
    log_message: &LogMessage,
    always_display_debug_info: bool,
) -> Result<TextDisplayCardItem> {
    let body = format_message(&sanitize_message(&log_message.message));

    let location = if log_message.level == LogLevel::DEBUG && always_display_debug_info {
        debug_location(log_message)
    } else {
        None
    };
    let message = match location {
        Some(location) => format!("[{}] ({}) {}", log_message.level, location, body),
        None => format!("[{}] {}", log_message.level, body),
    };

    let timestamp = DateTime::parse_from_rfc3339(&log_message.timestamp)
        .map_err(|source| UiError::Timestamp {
            value: log_message.timestamp.clone(),
            source,
        })?
        .with_timezone(&Utc);

    let html_class = match &log_message.html_class {
        Some(class) => class.clone(),
        None => get_log_class(&message).to_string(),
    };

    Ok(TextDisplayCardItem {
        message,
        timestamp,
        html_class,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(level: LogLevel, text: &str) -> LogMessage {
        let mut m = LogMessage::new(level, text);
        m.timestamp = "2024-05-01T10:20:30.000Z".to_string();
        m
    }

    #[test]
    fn links_urls_and_uses_error_class() {
        let item =
            log_message_to_text_display_card_item(&msg(LogLevel::ERROR, "see http://x.test/y"), false)
                .unwrap();
        assert_eq!(
            item.message,
            r#"[ERROR] see <a class="anchor" href="http://x.test/y" target="_blank">http://x.test/y</a>"#
        );
        assert_eq!(item.html_class, "text-error-500");
    }

    #[test]
    fn url_stops_at_quotes_and_whitespace() {
        let out = format_message(r#"open 'https://a.test/p?q=1' now"#);
        assert!(out.contains(r#"href="https://a.test/p?q=1""#));
        assert!(out.ends_with("' now"));
    }

    #[test]
    fn newlines_become_breaks() {
        assert_eq!(format_message("a\r\nb\nc"), "a<br>b<br>c");
    }

    #[test]
    fn debug_location_with_only_function_name() {
        let m = msg(LogLevel::DEBUG, "tick").with_location(None, Some("poll"), None);
        let item = log_message_to_text_display_card_item(&m, true).unwrap();
        assert_eq!(item.message, "[DEBUG] (poll) tick");
        assert_eq!(item.html_class, "text-primary-500");
    }

    #[test]
    fn debug_location_full() {
        let m = msg(LogLevel::DEBUG, "tick").with_location(Some("game.py"), Some("poll"), Some(42));
        let item = log_message_to_text_display_card_item(&m, true).unwrap();
        assert_eq!(item.message, "[DEBUG] (game.py::poll::42) tick");
    }

    #[test]
    fn debug_location_omitted_when_absent_or_disabled() {
        let bare = msg(LogLevel::DEBUG, "tick");
        let item = log_message_to_text_display_card_item(&bare, true).unwrap();
        assert_eq!(item.message, "[DEBUG] tick");

        let located = bare.with_location(Some("game.py"), None, Some(7));
        let item = log_message_to_text_display_card_item(&located, false).unwrap();
        assert_eq!(item.message, "[DEBUG] tick");
    }

    #[test]
    fn other_levels_never_show_location() {
        let m = msg(LogLevel::INFO, "ready").with_location(Some("a.py"), Some("f"), Some(1));
        let item = log_message_to_text_display_card_item(&m, true).unwrap();
        assert_eq!(item.message, "[INFO] ready");
        assert_eq!(item.html_class, "text-success-500");
    }

    #[test]
    fn explicit_class_wins() {
        let m = msg(LogLevel::WARNING, "custom").with_html_class("text-tertiary-500");
        let item = log_message_to_text_display_card_item(&m, false).unwrap();
        assert_eq!(item.html_class, "text-tertiary-500");
    }

    #[test]
    fn class_table() {
        assert_eq!(get_log_class("[WARNING] x"), "text-warning-500");
        assert_eq!(get_log_class("[FATAL] x"), "text-error-950");
        assert_eq!(get_log_class("plain"), "text-primary-50");
    }

    #[test]
    fn redacts_user_paths_case_insensitively() {
        let out = sanitize_message(r"failed at C:\Users\alice\AppData\x and c:\users\Bob\Desktop");
        assert_eq!(
            out,
            r"failed at C:\Users\$env:USERNAME\AppData\x and C:\Users\$env:USERNAME\Desktop"
        );
    }

    #[test]
    fn sanitizes_before_display() {
        let m = msg(LogLevel::INFO, r"Saved to C:\USERS\carol\adb\App.toml");
        let item = log_message_to_text_display_card_item(&m, false).unwrap();
        assert_eq!(item.message, r"[INFO] Saved to C:\Users\$env:USERNAME\adb\App.toml");
    }

    #[test]
    fn invalid_timestamp_is_an_error() {
        let mut m = msg(LogLevel::INFO, "x");
        m.timestamp = "yesterday".to_string();
        let err = log_message_to_text_display_card_item(&m, false).unwrap_err();
        assert!(matches!(err, UiError::Timestamp { .. }));
    }
}
