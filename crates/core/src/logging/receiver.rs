use tokio::sync::{broadcast, watch};

use crate::events::{listen, AppEvent, EventNames};

use super::display::{log_message_to_text_display_card_item, TextDisplayCardItem};
use super::message::LogMessage;

/// Consumer side of the `log-message` channel, producing display items.
pub struct LogReceiver {
    events: broadcast::Receiver<AppEvent>,
    always_display_debug_info: watch::Receiver<bool>,
    profile: Option<u8>,
}

impl LogReceiver {
    pub fn new(
        events: broadcast::Receiver<AppEvent>,
        always_display_debug_info: watch::Receiver<bool>,
    ) -> Self {
        Self {
            events,
            always_display_debug_info,
            profile: None,
        }
    }

    /// Only accept messages for `profile` (and messages without a profile).
    pub fn for_profile(mut self, profile: u8) -> Self {
        self.profile = Some(profile);
        self
    }

    fn accepts(&self, message: &LogMessage) -> bool {
        match (self.profile, message.profile_index) {
            (Some(wanted), Some(index)) => wanted == index,
            _ => true,
        }
    }

    /// Next displayable item, or `None` once the channel is closed.
    /// Payloads that cannot be decoded or displayed are skipped.
    pub async fn next_item(&mut self) -> Option<TextDisplayCardItem> {
        loop {
            let event = listen(&mut self.events, EventNames::LOG_MESSAGE).await?;
            let message: LogMessage = match serde_json::from_value(event.payload) {
                Ok(m) => m,
                Err(e) => {
                    log::warn!("Dropping malformed log message: {}", e);
                    continue;
                }
            };
            if !self.accepts(&message) {
                continue;
            }
            let debug_info = *self.always_display_debug_info.borrow();
            match log_message_to_text_display_card_item(&message, debug_info) {
                Ok(item) => return Some(item),
                Err(e) => log::warn!("Dropping log message: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::logging::LogLevel;
    use crate::store::Store;
    use serde_json::json;

    #[tokio::test]
    async fn yields_formatted_items_and_skips_garbage() {
        let bus = EventBus::new();
        let debug = Store::new(true);
        let mut receiver = LogReceiver::new(bus.subscribe(), debug.subscribe());

        bus.send(EventNames::LOG_MESSAGE, json!({"level": "LOUD"})).unwrap();
        bus.send(
            EventNames::LOG_MESSAGE,
            json!({"level": "INFO", "message": "bad time", "timestamp": "??"}),
        )
        .unwrap();
        let ok = LogMessage::new(LogLevel::DEBUG, "ok").with_location(None, Some("run"), None);
        bus.send(EventNames::LOG_MESSAGE, serde_json::to_value(&ok).unwrap()).unwrap();

        let item = receiver.next_item().await.unwrap();
        assert_eq!(item.message, "[DEBUG] (run) ok");
    }

    #[tokio::test]
    async fn filters_other_profiles() {
        let bus = EventBus::new();
        let debug = Store::new(false);
        let mut receiver = LogReceiver::new(bus.subscribe(), debug.subscribe()).for_profile(1);

        for (index, text) in [(0u8, "zero"), (1, "one")] {
            let m = LogMessage::new(LogLevel::INFO, text).with_profile_index(index);
            bus.send(EventNames::LOG_MESSAGE, serde_json::to_value(&m).unwrap()).unwrap();
        }

        let item = receiver.next_item().await.unwrap();
        assert_eq!(item.message, "[INFO] one");
    }

    #[tokio::test]
    async fn ends_with_the_bus() {
        let bus = EventBus::new();
        let debug = Store::new(false);
        let mut receiver = LogReceiver::new(bus.subscribe(), debug.subscribe());
        drop(bus);
        assert!(receiver.next_item().await.is_none());
    }
}
