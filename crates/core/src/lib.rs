//! Settings and event synchronization pipeline of the ADB Auto Player UI:
//! locale resolution, log events and their display formatting, settings
//! synchronization with the native backend, and error toasts.

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod events;
pub mod i18n;
pub mod links;
pub mod logging;
pub mod profile;
pub mod report;
pub mod settings;
pub mod store;

pub use error::{Result, UiError};
