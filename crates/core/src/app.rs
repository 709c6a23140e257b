use std::sync::Arc;

use crate::config::UiConfig;
use crate::document::Document;
use crate::error::Result;
use crate::events::EventBus;
use crate::i18n::Translator;
use crate::logging::{LogReceiver, Logger};
use crate::report::{ErrorReporter, PostHogSink, TelemetrySink, Toaster};
use crate::settings::{SettingsRpc, SettingsSynchronizer};
use crate::store::AppStores;

/// Everything one running UI needs, wired together at start-up and dropped
/// at exit.
pub struct UiApp {
    pub config: UiConfig,
    pub stores: Arc<AppStores>,
    pub bus: EventBus,
    pub logger: Logger,
    pub reporter: ErrorReporter,
    pub translator: Translator,
    pub settings: SettingsSynchronizer,
}

impl UiApp {
    pub fn new(
        config: UiConfig,
        bus: EventBus,
        rpc: Arc<dyn SettingsRpc>,
        document: Arc<dyn Document>,
        toaster: Arc<dyn Toaster>,
        telemetry: Option<Arc<dyn TelemetrySink>>,
    ) -> Self {
        let stores = Arc::new(AppStores::new());
        stores
            .debug_log_level_overwrite
            .set(config.always_display_debug_info);

        let logger = Logger::new(Arc::new(bus.clone()));
        let reporter = ErrorReporter::new(logger.clone(), toaster, telemetry, config.app_version.clone());
        let translator = Translator::new(&stores.app_locale);
        let settings = SettingsSynchronizer::new(rpc, document, stores.clone(), reporter.clone());

        Self {
            config,
            stores,
            bus,
            logger,
            reporter,
            translator,
            settings,
        }
    }

    /// PostHog sink for `config`, if telemetry is configured.
    pub fn telemetry_from_config(config: &UiConfig) -> Option<Arc<dyn TelemetrySink>> {
        if !config.telemetry_enabled() {
            return None;
        }
        Some(Arc::new(PostHogSink::new(
            reqwest::Client::new(),
            config.posthog_host.clone(),
            config.posthog_key.clone(),
            config.distinct_id.clone(),
            config.app_version.clone(),
        )))
    }

    pub async fn startup(&self) -> Result<()> {
        log::info!("Starting UI (version {})", self.config.app_version);
        self.settings.apply_settings_from_file().await
    }

    pub fn log_receiver(&self) -> LogReceiver {
        LogReceiver::new(self.bus.subscribe(), self.stores.debug_log_level_overwrite.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HeadlessDocument;
    use crate::i18n::Locale;
    use crate::report::tests::RecordingToaster;
    use crate::settings::{AppSettings, SettingsFileBackend, UiSettings};

    #[tokio::test]
    async fn startup_applies_saved_settings() {
        let dir = std::env::temp_dir().join(format!("adb-auto-player-app-{}", std::process::id()));
        let bus = EventBus::new();
        let backend = Arc::new(SettingsFileBackend::new(&dir, Arc::new(bus.clone())));

        let mut saved = AppSettings::default();
        saved.ui = Some(UiSettings {
            theme: Some("vintage".into()),
            locale: Some("jp".into()),
            ..UiSettings::default()
        });
        backend.save_app_settings(saved).await.unwrap();

        let document = Arc::new(HeadlessDocument::new());
        let app = UiApp::new(
            UiConfig::default(),
            bus,
            backend,
            document.clone(),
            Arc::new(RecordingToaster::default()),
            None,
        );
        let mut receiver = app.log_receiver();
        app.startup().await.unwrap();

        assert_eq!(document.attribute("data-theme").as_deref(), Some("vintage"));
        assert_eq!(app.translator.locale(), Locale::Jp);
        assert_eq!(app.translator.t("Save"), "保存");

        app.logger.info("ready").await.unwrap();
        assert_eq!(receiver.next_item().await.unwrap().message, "[INFO] ready");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn telemetry_only_with_key() {
        let mut config = UiConfig::default();
        assert!(UiApp::telemetry_from_config(&config).is_none());
        config.posthog_key = "phc_test".into();
        assert!(UiApp::telemetry_from_config(&config).is_some());
    }
}
