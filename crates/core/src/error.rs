use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("{0}")]
    Rpc(String),
    #[error("failed to emit '{event}': {reason}")]
    Emit { event: String, reason: String },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse TOML: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("failed to serialize TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("cannot set document attribute '{name}': {reason}")]
    Document { name: String, reason: String },
    #[error("profile index {index} out of range ({len} profiles)")]
    ProfileIndex { index: usize, len: usize },
    #[error("failed to open '{url}': {reason}")]
    Open { url: String, reason: String },
    #[error("telemetry: {0}")]
    Telemetry(String),
}

impl UiError {
    pub fn rpc(message: impl Into<String>) -> Self {
        Self::Rpc(message.into())
    }

    pub fn emit(event: &str, reason: impl std::fmt::Display) -> Self {
        Self::Emit {
            event: event.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, UiError>;
