use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[allow(clippy::upper_case_acronyms)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    DEBUG,
    #[default]
    INFO,
    WARNING,
    ERROR,
    FATAL,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::DEBUG => "DEBUG",
            LogLevel::INFO => "INFO",
            LogLevel::WARNING => "WARNING",
            LogLevel::ERROR => "ERROR",
            LogLevel::FATAL => "FATAL",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured log record as it travels over the `log-message` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_index: Option<u8>,
}

impl LogMessage {
    /// Creates a new log message with the current UTC timestamp.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self::at(level, message, Utc::now())
    }

    pub fn at(level: LogLevel, message: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: time.to_rfc3339_opts(SecondsFormat::Millis, true),
            source_file: None,
            function_name: None,
            line_number: None,
            html_class: None,
            profile_index: None,
        }
    }

    pub fn with_profile_index(mut self, index: u8) -> Self {
        self.profile_index = Some(index);
        self
    }

    pub fn with_location(
        mut self,
        source_file: Option<&str>,
        function_name: Option<&str>,
        line_number: Option<u32>,
    ) -> Self {
        self.source_file = source_file.map(str::to_string);
        self.function_name = function_name.map(str::to_string);
        self.line_number = line_number;
        self
    }

    pub fn with_html_class(mut self, class: impl Into<String>) -> Self {
        self.html_class = Some(class.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn timestamp_is_iso_millis() {
        let time = DateTime::parse_from_rfc3339("2024-05-01T10:20:30.123456Z")
            .unwrap()
            .with_timezone(&Utc);
        let msg = LogMessage::at(LogLevel::INFO, "hi", time);
        assert_eq!(msg.timestamp, "2024-05-01T10:20:30.123Z");
    }

    #[test]
    fn decodes_backend_payload() {
        let msg: LogMessage = serde_json::from_value(json!({
            "level": "WARNING",
            "message": "low battery",
            "timestamp": "2024-05-01T10:20:30Z",
            "function_name": "check",
            "profile_index": 1
        }))
        .unwrap();
        assert_eq!(msg.level, LogLevel::WARNING);
        assert_eq!(msg.function_name.as_deref(), Some("check"));
        assert_eq!(msg.source_file, None);
        assert_eq!(msg.profile_index, Some(1));
    }

    #[test]
    fn omits_absent_fields() {
        let msg = LogMessage::new(LogLevel::ERROR, "boom").with_profile_index(2);
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["profile_index"], 2);
        assert!(value.get("html_class").is_none());
    }
}
