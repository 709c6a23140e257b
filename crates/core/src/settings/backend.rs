use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::events::{EventEmitter, EventNames};
use crate::logging::{LogLevel, LogMessage};

use super::model::{AppSettings, AppSettingsForm, APP_SETTINGS_FILE_NAME, APP_SETTINGS_SCHEMA};

/// Backend calls the settings synchronizer depends on.
#[async_trait]
pub trait SettingsRpc: Send + Sync {
    async fn get_app_settings_form(&self) -> Result<AppSettingsForm>;
}

/// Settings persisted as TOML files in the app config directory.
pub struct SettingsFileBackend {
    config_dir: PathBuf,
    emitter: Arc<dyn EventEmitter>,
    state: Mutex<AppSettings>,
}

impl SettingsFileBackend {
    pub fn new(config_dir: impl Into<PathBuf>, emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            config_dir: config_dir.into(),
            emitter,
            state: Mutex::new(AppSettings::default()),
        }
    }

    pub fn app_settings_path(&self) -> PathBuf {
        self.config_dir.join(APP_SETTINGS_FILE_NAME)
    }

    pub async fn current(&self) -> AppSettings {
        self.state.lock().await.clone()
    }

    pub async fn notifications_enabled(&self) -> bool {
        self.state.lock().await.notifications_enabled()
    }

    /// Persist app settings, then announce them to the UI.
    pub async fn save_app_settings(&self, settings: AppSettings) -> Result<AppSettings> {
        let path = self.app_settings_path();
        save_to_file(&settings, &path)?;
        *self.state.lock().await = settings.clone();

        self.announce(format!("App Settings saved: {}", path.display()))
            .await;
        let payload = serde_json::to_value(&settings)?;
        if let Err(e) = self
            .emitter
            .emit(EventNames::GENERAL_SETTINGS_UPDATED, payload)
            .await
        {
            log::debug!("Settings update not delivered: {}", e);
        }
        Ok(settings)
    }

    /// Write one profile's game settings (given as JSON) to
    /// `<config_dir>/<profile_index>/<file_name>` as TOML.
    pub async fn save_profile_settings(
        &self,
        profile_index: u8,
        file_name: &str,
        json_data: &str,
    ) -> Result<PathBuf> {
        let parsed: serde_json::Value = serde_json::from_str(json_data)?;
        let toml_string = toml::to_string_pretty(&parsed)?;

        let profile_dir = self.config_dir.join(profile_index.to_string());
        std::fs::create_dir_all(&profile_dir)?;
        let path = profile_dir.join(file_name);
        std::fs::write(&path, toml_string)?;

        self.announce(format!("Settings saved: {}", path.display()))
            .await;
        Ok(path)
    }

    async fn announce(&self, message: String) {
        let msg = LogMessage::new(LogLevel::INFO, message);
        let sent = match serde_json::to_value(&msg) {
            Ok(payload) => self.emitter.emit(EventNames::LOG_MESSAGE, payload).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = sent {
            log::debug!("Background emit failed: {}", e);
        }
    }
}

#[async_trait]
impl SettingsRpc for SettingsFileBackend {
    async fn get_app_settings_form(&self) -> Result<AppSettingsForm> {
        let settings = load_from_file(&self.app_settings_path());
        *self.state.lock().await = settings.clone();

        Ok(AppSettingsForm {
            settings,
            schema: APP_SETTINGS_SCHEMA.to_string(),
            file_name: APP_SETTINGS_FILE_NAME.to_string(),
        })
    }
}

/// Missing or unreadable files yield the defaults.
pub fn load_from_file(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Failed to read {:?}, using defaults: {}", path, e);
            return AppSettings::default();
        }
    };

    match toml::from_str::<AppSettings>(&content) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Failed to parse {:?}, using defaults: {}", path, e);
            AppSettings::default()
        }
    }
}

pub fn save_to_file(settings: &AppSettings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let toml_string = toml::to_string_pretty(settings)?;
    std::fs::write(path, toml_string)?;
    log::info!("App settings saved to {:?}", path);
    Ok(())
}
