//! Log records shown in the UI: producing them, and formatting them for display.

mod display;
mod emitter;
mod message;
mod receiver;

pub use display::{
    format_message, get_log_class, log_message_to_text_display_card_item, sanitize_message,
    TextDisplayCardItem,
};
pub use emitter::Logger;
pub use message::{LogLevel, LogMessage};
pub use receiver::LogReceiver;
