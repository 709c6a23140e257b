use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use adb_auto_player_core as core;
use adb_auto_player_core::report::{Toast, Toaster};
use adb_auto_player_core::settings::SettingsRpc;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adb-auto-player", about = "ADB Auto Player UI pipeline (headless)")]
struct Cli {
    /// Config directory (default: per-user config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a UI string
    Translate {
        text: String,

        /// Locale tag (unknown tags fall back to English)
        #[arg(short, long, default_value = "en")]
        locale: String,

        /// Interpolation value as key=value (repeatable)
        #[arg(long = "value", value_parser = parse_key_value)]
        values: Vec<(String, String)>,
    },

    /// Format JSON log messages (one per line) for display
    FormatLog {
        /// Input file (default: stdin)
        file: Option<PathBuf>,

        /// Show source location on DEBUG messages
        #[arg(long)]
        debug_info: bool,
    },

    /// App settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Check whether a link would open in the system browser
    Link { url: String },

    /// Write the default UI config
    Init,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the settings form returned by the backend
    Show,
    /// Run start-up settings synchronization and print the result
    Apply,
    /// Change UI settings and save them
    Set {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        locale: Option<String>,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    Ok((key.to_string(), value.to_string()))
}

/// Toasts go to stderr.
struct ConsoleToaster;

impl Toaster for ConsoleToaster {
    fn show(&self, toast: Toast) {
        eprintln!("[{:?}] {}: {}", toast.kind, toast.title, toast.description);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(core::config::default_config_dir);

    let config = core::config::load_config(&config_dir).unwrap_or_default();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter.as_str()))
        .format_timestamp_millis()
        .init();

    let result = match cli.command {
        Command::Translate {
            text,
            locale,
            values,
        } => cmd_translate(&text, &locale, values),
        Command::FormatLog { file, debug_info } => {
            cmd_format_log(file, debug_info || config.always_display_debug_info)
        }
        Command::Settings(SettingsCommand::Show) => cmd_settings_show(&config_dir).await,
        Command::Settings(SettingsCommand::Apply) => cmd_settings_apply(&config_dir, config).await,
        Command::Settings(SettingsCommand::Set { theme, locale }) => {
            cmd_settings_set(&config_dir, theme, locale).await
        }
        Command::Link { url } => {
            let external = core::links::should_open_externally(&url);
            println!("{}", if external { "external" } else { "internal" });
            Ok(())
        }
        Command::Init => cmd_init(&config_dir),
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn cmd_translate(text: &str, locale: &str, values: Vec<(String, String)>) -> Result<(), String> {
    let locale = core::i18n::get_locale_or_default(locale);
    let values = values.into_iter().collect();
    println!("{}", core::i18n::translate(text, locale, &values));
    Ok(())
}

fn cmd_format_log(file: Option<PathBuf>, debug_info: bool) -> Result<(), String> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => {
            let f = std::fs::File::open(&path)
                .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
            Box::new(std::io::BufReader::new(f))
        }
        None => Box::new(std::io::BufReader::new(std::io::stdin())),
    };

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Failed to read input: {}", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let message: core::logging::LogMessage = match serde_json::from_str(&line) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("Line {}: invalid log message: {}", number + 1, e);
                continue;
            }
        };
        match core::logging::log_message_to_text_display_card_item(&message, debug_info) {
            Ok(item) => println!(
                "{} {} {}",
                item.timestamp.to_rfc3339(),
                item.html_class,
                item.message
            ),
            Err(e) => log::warn!("Line {}: {}", number + 1, e),
        }
    }
    Ok(())
}

async fn cmd_settings_show(config_dir: &std::path::Path) -> Result<(), String> {
    let backend = core::settings::SettingsFileBackend::new(config_dir, Arc::new(core::events::EventBus::new()));
    let form = backend
        .get_app_settings_form()
        .await
        .map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&form.settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;
    println!("# {}", backend.app_settings_path().display());
    println!("{}", json);
    Ok(())
}

async fn cmd_settings_apply(config_dir: &std::path::Path, config: core::config::UiConfig) -> Result<(), String> {
    let bus = core::events::EventBus::new();
    let backend = Arc::new(core::settings::SettingsFileBackend::new(config_dir, Arc::new(bus.clone())));
    let document = Arc::new(core::document::HeadlessDocument::new());
    let telemetry = core::app::UiApp::telemetry_from_config(&config);

    let app = core::app::UiApp::new(config, bus, backend, document.clone(), Arc::new(ConsoleToaster), telemetry);
    let mut receiver = app.log_receiver();

    let startup = app.startup().await;
    let locale = app.translator.locale();
    drop(app);
    while let Some(item) = receiver.next_item().await {
        println!("{}", item.message);
    }
    startup.map_err(|e| e.to_string())?;

    println!(
        "theme: {}",
        document
            .attribute(core::document::THEME_ATTRIBUTE)
            .unwrap_or_else(|| "-".to_string())
    );
    println!("locale: {}", locale);
    Ok(())
}

async fn cmd_settings_set(
    config_dir: &std::path::Path,
    theme: Option<String>,
    locale: Option<String>,
) -> Result<(), String> {
    let backend = core::settings::SettingsFileBackend::new(config_dir, Arc::new(core::events::EventBus::new()));
    let mut settings = backend
        .get_app_settings_form()
        .await
        .map_err(|e| e.to_string())?
        .settings;

    let ui = settings.ui.get_or_insert_with(Default::default);
    if let Some(theme) = theme {
        ui.theme = Some(theme);
    }
    if let Some(tag) = locale {
        let resolved = core::i18n::get_locale_or_default(&tag);
        if resolved.tag() != tag {
            log::warn!("Unsupported locale '{}', saving '{}'", tag, resolved);
        }
        ui.locale = Some(resolved.tag().to_string());
    }

    backend
        .save_app_settings(settings)
        .await
        .map_err(|e| e.to_string())?;
    println!("Saved {}", backend.app_settings_path().display());
    Ok(())
}

fn cmd_init(config_dir: &std::path::Path) -> Result<(), String> {
    let config_file = config_dir.join(core::config::CONFIG_FILE_NAME);
    if config_file.exists() {
        println!("Config file: {}", config_file.display());
        return Ok(());
    }
    core::config::save_config(&core::config::UiConfig::default(), config_dir).map_err(|e| e.to_string())?;
    println!("Default config saved to {}", config_file.display());
    Ok(())
}
