use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, UiError};

use super::ReportedError;

/// Remote error tracking. Never needed for correctness.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn capture_exception(
        &self,
        error: &ReportedError,
        properties: &Map<String, Value>,
    ) -> Result<()>;
}

/// PostHog capture API client.
pub struct PostHogSink {
    client: reqwest::Client,
    host: String,
    api_key: String,
    distinct_id: String,
    app_version: String,
}

impl PostHogSink {
    pub const DEFAULT_HOST: &'static str = "https://eu.i.posthog.com";

    pub fn new(
        client: reqwest::Client,
        host: impl Into<String>,
        api_key: impl Into<String>,
        distinct_id: impl Into<String>,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            client,
            host: host.into(),
            api_key: api_key.into(),
            distinct_id: distinct_id.into(),
            app_version: app_version.into(),
        }
    }

    fn payload(&self, error: &ReportedError, properties: &Map<String, Value>) -> CapturePayload {
        let mut props = properties.clone();
        props.insert(
            "$exception_list".to_string(),
            serde_json::json!([{ "type": error.kind(), "value": error.message() }]),
        );
        props.insert("app_version".to_string(), Value::String(self.app_version.clone()));
        CapturePayload {
            api_key: self.api_key.clone(),
            event: "$exception",
            distinct_id: self.distinct_id.clone(),
            properties: props,
        }
    }
}

#[derive(Debug, Serialize)]
struct CapturePayload {
    api_key: String,
    event: &'static str,
    distinct_id: String,
    properties: Map<String, Value>,
}

#[async_trait]
impl TelemetrySink for PostHogSink {
    async fn capture_exception(
        &self,
        error: &ReportedError,
        properties: &Map<String, Value>,
    ) -> Result<()> {
        let url = format!("{}/capture/", self.host.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .json(&self.payload(error, properties))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| UiError::Telemetry(format!("capture failed: {}", e)))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(UiError::Telemetry(format!("capture HTTP {}", resp.status())))
        }
    }
}
