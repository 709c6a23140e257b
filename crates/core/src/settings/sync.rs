use std::sync::Arc;

use tokio::sync::broadcast;

use crate::document::{Document, THEME_ATTRIBUTE};
use crate::error::Result;
use crate::events::{listen, AppEvent, EventNames};
use crate::i18n::get_locale_or_default;
use crate::report::{ErrorReporter, ErrorToastOptions};
use crate::store::AppStores;

use super::backend::SettingsRpc;
use super::model::AppSettings;

/// Pulls settings from the backend and applies them to the UI.
///
/// The settings store and the UI presentation are decoupled: the store is
/// always replaced, even when theme or locale cannot be applied. A failed
/// fetch leaves the previous settings in place.
pub struct SettingsSynchronizer {
    rpc: Arc<dyn SettingsRpc>,
    document: Arc<dyn Document>,
    stores: Arc<AppStores>,
    reporter: ErrorReporter,
}

impl SettingsSynchronizer {
    pub fn new(
        rpc: Arc<dyn SettingsRpc>,
        document: Arc<dyn Document>,
        stores: Arc<AppStores>,
        reporter: ErrorReporter,
    ) -> Self {
        Self {
            rpc,
            document,
            stores,
            reporter,
        }
    }

    /// One round trip to the backend. Failures are already reported to the
    /// user when this returns `Err`.
    pub async fn apply_settings_from_file(&self) -> Result<()> {
        match self.rpc.get_app_settings_form().await {
            Ok(form) => {
                self.apply_settings(form.settings).await;
                Ok(())
            }
            Err(e) => {
                self.reporter
                    .show_error_toast(&e, ErrorToastOptions::default())
                    .await;
                Err(e)
            }
        }
    }

    pub async fn apply_settings(&self, new_settings: AppSettings) {
        self.stores.app_settings.set(Some(new_settings.clone()));
        if let Err(e) = self.apply_ui_settings(&new_settings) {
            self.reporter
                .show_error_toast(e, ErrorToastOptions::default())
                .await;
        }
    }

    fn apply_ui_settings(&self, settings: &AppSettings) -> Result<()> {
        if let Some(names) = settings.profile_names() {
            let mut profiles = self.stores.profiles.get();
            profiles.resize(names.len());
            self.stores.profiles.set(profiles);
        }

        let Some(ui) = &settings.ui else {
            return Ok(());
        };
        if let Some(theme) = ui.theme.as_deref().filter(|t| !t.is_empty()) {
            self.document.set_attribute(THEME_ATTRIBUTE, theme)?;
        }
        if let Some(tag) = ui.locale.as_deref().filter(|l| !l.is_empty()) {
            self.stores.app_locale.set(get_locale_or_default(tag));
        }
        Ok(())
    }

    /// Re-apply settings announced on `general-settings-updated` until the
    /// event channel closes.
    pub async fn run(&self, mut events: broadcast::Receiver<AppEvent>) {
        while let Some(event) = listen(&mut events, EventNames::GENERAL_SETTINGS_UPDATED).await {
            match serde_json::from_value::<AppSettings>(event.payload) {
                Ok(settings) => self.apply_settings(settings).await,
                Err(e) => {
                    self.reporter
                        .show_error_toast(e.to_string(), ErrorToastOptions::titled("Failed to apply settings"))
                        .await
                }
            }
        }
        log::debug!("Settings listener stopped");
    }
}
