use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::report::PostHogSink;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    #[serde(default = "default_app_version")]
    pub app_version: String,
    #[serde(default)]
    pub always_display_debug_info: bool,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Empty disables telemetry.
    #[serde(default)]
    pub posthog_key: String,
    #[serde(default = "default_posthog_host")]
    pub posthog_host: String,
    #[serde(default = "default_distinct_id")]
    pub distinct_id: String,
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}
fn default_posthog_host() -> String {
    PostHogSink::DEFAULT_HOST.to_string()
}
fn default_distinct_id() -> String {
    "anonymous".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            app_version: default_app_version(),
            always_display_debug_info: false,
            log_filter: default_log_filter(),
            posthog_key: String::new(),
            posthog_host: default_posthog_host(),
            distinct_id: default_distinct_id(),
        }
    }
}

impl UiConfig {
    pub fn telemetry_enabled(&self) -> bool {
        !self.posthog_key.trim().is_empty()
    }
}

pub const CONFIG_FILE_NAME: &str = "ui-config.json";
const APP_DIR_NAME: &str = "adb-auto-player";

pub fn save_config(config: &UiConfig, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(CONFIG_FILE_NAME);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;

    log::info!("Config saved to {:?}", path);
    Ok(())
}

pub fn load_config(dir: &Path) -> Result<UiConfig> {
    let path = dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        return Ok(UiConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let mut config: UiConfig = serde_json::from_str(&contents)?;

    if config.log_filter.trim().is_empty() {
        log::info!("Empty log filter in {:?}, using default", path);
        config.log_filter = default_log_filter();
    }

    log::info!("Config loaded from {:?}", path);
    Ok(config)
}

/// Per-user config directory shared with the native backend.
pub fn default_config_dir() -> PathBuf {
    dirs_next::config_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = std::env::temp_dir().join(format!("adb-auto-player-config-missing-{}", std::process::id()));
        let config = load_config(&dir).unwrap();
        assert_eq!(config, UiConfig::default());
        assert!(!config.telemetry_enabled());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = std::env::temp_dir().join(format!("adb-auto-player-config-partial-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(CONFIG_FILE_NAME),
            r#"{"alwaysDisplayDebugInfo": true, "logFilter": " ", "posthogKey": "phc_x"}"#,
        )
        .unwrap();

        let config = load_config(&dir).unwrap();
        assert!(config.always_display_debug_info);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.posthog_host, PostHogSink::DEFAULT_HOST);
        assert!(config.telemetry_enabled());

        save_config(&config, &dir).unwrap();
        assert_eq!(load_config(&dir).unwrap(), config);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
