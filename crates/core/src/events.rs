//! Named asynchronous event channel between the native side and the UI.
//!
//! Payloads are JSON values. Delivery order is only meaningful within one
//! event name; consumers must not rely on ordering across names.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::error::{Result, UiError};

pub struct EventNames;

impl EventNames {
    pub const SUMMARY_MESSAGE: &'static str = "summary-message";
    pub const WRITE_SUMMARY_TO_LOG: &'static str = "write-summary-to-log";
    pub const LOG_MESSAGE: &'static str = "log-message";
    pub const DOWNLOAD_PROGRESS: &'static str = "download-progress";
    pub const GENERAL_SETTINGS_UPDATED: &'static str = "general-settings-updated";
    pub const WINDOW_IS_VISIBLE: &'static str = "window-is-visible";
    pub const WINDOW_HIDDEN: &'static str = "window-hidden";
    pub const TASK_COMPLETED: &'static str = "task-completed";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppEvent {
    pub name: String,
    pub payload: Value,
}

/// Sending half of the event channel.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn emit(&self, name: &str, payload: Value) -> Result<()>;
}

/// In-process broadcast implementation of the event channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }

    pub fn send(&self, name: &str, payload: Value) -> Result<()> {
        self.tx
            .send(AppEvent {
                name: name.to_string(),
                payload,
            })
            .map(|_| ())
            .map_err(|_| UiError::emit(name, "no listeners"))
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventEmitter for EventBus {
    async fn emit(&self, name: &str, payload: Value) -> Result<()> {
        self.send(name, payload)
    }
}

/// Receive the next event called `name`, skipping everything else.
/// Returns `None` once every sender is gone.
pub async fn listen(rx: &mut broadcast::Receiver<AppEvent>, name: &str) -> Option<AppEvent> {
    loop {
        match rx.recv().await {
            Ok(event) if event.name == name => return Some(event),
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::warn!("Event listener for '{}' lagged, skipped {} events", name, skipped);
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn emit_without_listeners_fails() {
        let bus = EventBus::new();
        let err = bus.emit(EventNames::LOG_MESSAGE, json!({})).await.unwrap_err();
        assert!(matches!(err, UiError::Emit { .. }));
    }

    #[tokio::test]
    async fn listen_filters_by_name() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.emit(EventNames::WINDOW_HIDDEN, json!(null)).await.unwrap();
        bus.emit(EventNames::LOG_MESSAGE, json!({"n": 1})).await.unwrap();

        let event = listen(&mut rx, EventNames::LOG_MESSAGE).await.unwrap();
        assert_eq!(event.payload, json!({"n": 1}));
    }

    #[tokio::test]
    async fn listen_ends_when_bus_dropped() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        drop(bus);
        assert!(listen(&mut rx, EventNames::LOG_MESSAGE).await.is_none());
    }
}
