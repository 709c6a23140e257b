use std::sync::Arc;

use crate::error::Result;
use crate::events::{EventEmitter, EventNames};

use super::message::{LogLevel, LogMessage};

/// Producer side of the `log-message` channel.
///
/// Sending is best effort: a failed dispatch is written to the debug log and
/// handed back as `Err`, which callers are free to drop. It is never shown to
/// the user, so a broken channel cannot cause an error-toast loop.
#[derive(Clone)]
pub struct Logger {
    emitter: Arc<dyn EventEmitter>,
}

impl Logger {
    pub fn new(emitter: Arc<dyn EventEmitter>) -> Self {
        Self { emitter }
    }

    pub async fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.send(LogMessage::new(LogLevel::DEBUG, message)).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Result<()> {
        self.send(LogMessage::new(LogLevel::INFO, message)).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> Result<()> {
        self.send(LogMessage::new(LogLevel::WARNING, message)).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Result<()> {
        self.send(LogMessage::new(LogLevel::ERROR, message)).await
    }

    pub async fn error_for_profile(&self, message: impl Into<String>, profile: u8) -> Result<()> {
        self.send(LogMessage::new(LogLevel::ERROR, message).with_profile_index(profile))
            .await
    }

    pub async fn fatal(&self, message: impl Into<String>) -> Result<()> {
        self.send(LogMessage::new(LogLevel::FATAL, message)).await
    }

    pub async fn send(&self, message: LogMessage) -> Result<()> {
        let payload = serde_json::to_value(&message)?;
        let result = self.emitter.emit(EventNames::LOG_MESSAGE, payload).await;
        if let Err(e) = &result {
            log::debug!("Background emit failed: {}", e);
        }
        result
    }
}
