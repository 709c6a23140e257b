use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::logging::LogLevel;

pub const APP_SETTINGS_FILE_NAME: &str = "App.toml";
pub const DEFAULT_THEME: &str = "catppuccin";
pub const DEFAULT_LOCALE: &str = "en";

pub const APP_SETTINGS_SCHEMA: &str = r##"{"$defs": {"AdvancedSettings": {"description": "Advanced Settings model.", "properties": {"shutdown_after_tasks": {"default": false, "title": "Shutdown after Tasks", "type": "boolean"}}, "title": "AdvancedSettings", "type": "object"}, "Locale": {"description": "Locale Enum.", "enum": ["en", "jp", "vn"], "title": "Locale", "type": "string"}, "LoggingSettings": {"description": "Logging settings model.", "properties": {"level": {"default": "INFO", "enum": ["DEBUG", "INFO", "WARNING", "ERROR", "FATAL"], "title": "Logging Level", "type": "string"}}, "title": "LoggingSettings", "type": "object"}, "ProfileSettings": {"description": "Profile Settings model.", "properties": {"profiles": {"default": ["Default"], "items": {"type": "string"}, "minItems": 1, "title": "Profiles", "type": "array"}}, "title": "ProfileSettings", "type": "object"}, "Theme": {"description": "Theme Enum.", "enum": ["catppuccin", "cerberus", "crimson", "fennec", "modern", "mona", "nosh", "nouveau", "pine", "rose", "seafoam", "terminus", "vintage", "vox", "wintry"], "title": "Theme", "type": "string"}, "UISettings": {"description": "UI Settings model.", "properties": {"theme": {"$ref": "#/$defs/Theme", "default": "catppuccin"}, "locale": {"$ref": "#/$defs/Locale", "default": "en"}, "close_should_minimize": {"default": false, "title": "Close button should minimize the window", "type": "boolean"}, "notifications_enabled": {"default": false, "title": "Enable Notifications", "type": "boolean"}}, "title": "UISettings", "type": "object"}}, "description": "App Settings model.", "properties": {"profiles": {"$ref": "#/$defs/ProfileSettings", "title": "Profiles"}, "ui": {"$ref": "#/$defs/UISettings", "title": "User Interface"}, "logging": {"$ref": "#/$defs/LoggingSettings", "title": "Logging"}, "advanced": {"$ref": "#/$defs/AdvancedSettings", "title": "Advanced"}}, "title": "AppSettings", "type": "object"}"##;

/// Backend-owned application settings.
///
/// Sections are optional: the UI only acts on what is present. Fields this
/// crate does not model are kept in `extra` so a round trip loses nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<ProfileSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedSettings>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            profiles: Some(ProfileSettings::default()),
            ui: Some(UiSettings::default()),
            logging: Some(LoggingSettings::default()),
            advanced: Some(AdvancedSettings::default()),
            extra: Map::new(),
        }
    }
}

impl AppSettings {
    pub fn theme(&self) -> Option<&str> {
        self.ui.as_ref()?.theme.as_deref()
    }

    pub fn locale(&self) -> Option<&str> {
        self.ui.as_ref()?.locale.as_deref()
    }

    pub fn profile_names(&self) -> Option<&[String]> {
        self.profiles.as_ref().map(|p| p.profiles.as_slice())
    }

    pub fn notifications_enabled(&self) -> bool {
        self.ui
            .as_ref()
            .and_then(|ui| ui.notifications_enabled)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_should_minimize: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: Some(DEFAULT_THEME.to_string()),
            locale: Some(DEFAULT_LOCALE.to_string()),
            close_should_minimize: Some(false),
            notifications_enabled: Some(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(default = "default_profiles")]
    pub profiles: Vec<String>,
}

fn default_profiles() -> Vec<String> {
    vec!["Default".to_string()]
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSettings {
    #[serde(default)]
    pub shutdown_after_tasks: bool,
}

/// Reply of the `get_app_settings_form` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettingsForm {
    pub settings: AppSettings,
    pub schema: String,
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn partial_ui_section() {
        let settings: AppSettings = serde_json::from_value(json!({"ui": {"theme": "dark"}})).unwrap();
        assert_eq!(settings.theme(), Some("dark"));
        assert_eq!(settings.locale(), None);
        assert!(settings.profiles.is_none());
    }

    #[test]
    fn keeps_unknown_fields() {
        let value = json!({"ui": {"locale": "jp"}, "discord": {"rich_presence": true}});
        let settings: AppSettings = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(settings.extra["discord"]["rich_presence"], true);
        assert_eq!(serde_json::to_value(&settings).unwrap(), value);
    }

    #[test]
    fn defaults_match_schema() {
        let settings = AppSettings::default();
        assert_eq!(settings.theme(), Some(DEFAULT_THEME));
        assert_eq!(settings.locale(), Some(DEFAULT_LOCALE));
        assert_eq!(settings.profile_names().unwrap(), ["Default".to_string()]);
        assert!(!settings.notifications_enabled());

        let schema: Value = serde_json::from_str(APP_SETTINGS_SCHEMA).unwrap();
        assert_eq!(schema["$defs"]["UISettings"]["properties"]["theme"]["default"], DEFAULT_THEME);
    }
}
