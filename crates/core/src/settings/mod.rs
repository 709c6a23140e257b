mod backend;
mod model;
mod sync;

pub use backend::{load_from_file, save_to_file, SettingsFileBackend, SettingsRpc};
pub use model::{
    AdvancedSettings, AppSettings, AppSettingsForm, LoggingSettings, ProfileSettings, UiSettings,
    APP_SETTINGS_FILE_NAME, APP_SETTINGS_SCHEMA, DEFAULT_LOCALE, DEFAULT_THEME,
};
pub use sync::SettingsSynchronizer;
