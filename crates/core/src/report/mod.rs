//! User-facing error reporting: toast, log display and telemetry.

mod telemetry;
mod toast;

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::UiError;
use crate::logging::Logger;

pub use telemetry::{PostHogSink, TelemetrySink};
pub use toast::{Toast, ToastKind, Toaster};

/// Version string of development builds.
pub const DEV_VERSION: &str = "0.0.0";
pub const DEFAULT_ERROR_TITLE: &str = "Something went wrong";

/// An error value normalised for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedError {
    kind: String,
    message: String,
    detail: String,
}

impl ReportedError {
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            kind: "Error".to_string(),
            message: error.to_string(),
            detail: format!("{:?}", error),
        }
    }

    /// JSON errors (e.g. a rejected RPC call) contribute their `message`
    /// field when they have one.
    pub fn from_value(value: &Value) -> Self {
        let message = match value {
            Value::String(s) => s.clone(),
            Value::Object(obj) => match obj.get("message") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => value.to_string(),
            },
            other => other.to_string(),
        };
        let kind = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Error")
            .to_string();
        Self {
            kind,
            message,
            detail: value.to_string(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for ReportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&UiError> for ReportedError {
    fn from(error: &UiError) -> Self {
        Self::from_error(error)
    }
}

impl From<UiError> for ReportedError {
    fn from(error: UiError) -> Self {
        Self::from_error(&error)
    }
}

impl From<std::io::Error> for ReportedError {
    fn from(error: std::io::Error) -> Self {
        Self::from_error(&error)
    }
}

impl From<&str> for ReportedError {
    fn from(message: &str) -> Self {
        Self::from(message.to_string())
    }
}

impl From<String> for ReportedError {
    fn from(message: String) -> Self {
        Self {
            kind: "Error".to_string(),
            detail: message.clone(),
            message,
        }
    }
}

impl From<Value> for ReportedError {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// Message of `error` with its first letter upper-cased.
pub fn capitalize_error(error: &ReportedError) -> String {
    capitalize_first(error.message())
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct ErrorToastOptions {
    pub title: String,
    /// Also write the error to the log display, in case the toast
    /// disappears before it is read.
    pub log_to_log_display: bool,
}

impl Default for ErrorToastOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_ERROR_TITLE.to_string(),
            log_to_log_display: true,
        }
    }
}

impl ErrorToastOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct ErrorReporter {
    logger: Logger,
    toaster: Arc<dyn Toaster>,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    app_version: String,
}

impl ErrorReporter {
    pub fn new(
        logger: Logger,
        toaster: Arc<dyn Toaster>,
        telemetry: Option<Arc<dyn TelemetrySink>>,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            logger,
            toaster,
            telemetry,
            app_version: app_version.into(),
        }
    }

    pub fn is_dev(&self) -> bool {
        self.app_version == DEV_VERSION
    }

    /// Debug log, then the log display (unless disabled), then a toast.
    pub async fn show_error_toast(&self, error: impl Into<ReportedError>, options: ErrorToastOptions) {
        let error = error.into();
        let message = capitalize_error(&error);

        log::error!("{}", error.detail());
        if options.log_to_log_display {
            let _ = self.logger.error(message.clone()).await;
        }

        self.toaster.show(Toast::error(options.title, message));
    }

    /// Forward to telemetry in release builds; development builds only log.
    /// Telemetry failures are dropped here.
    pub async fn report_error(&self, error: impl Into<ReportedError>, properties: Map<String, Value>) {
        let error = error.into();
        if self.is_dev() {
            log::error!("{} {:?}", error.detail(), properties);
            return;
        }
        let Some(sink) = &self.telemetry else {
            return;
        };
        if let Err(e) = sink.capture_exception(&error, &properties).await {
            log::debug!("Error report dropped: {}", e);
        }
    }

    pub fn log_dev_only(&self, error: impl Into<ReportedError>) {
        if self.is_dev() {
            log::error!("{}", error.into().detail());
        }
    }
}
