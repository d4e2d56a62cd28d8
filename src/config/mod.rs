//! Configuration for the panel
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/graphite/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod serialization;
mod timing;


pub use logging::{FileLogging, LogRotation, LoggingConfig};
pub use timing::{FileTiming, TimingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Where the bot backend listens unless told otherwise
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the bot backend
    pub server_url: String,

    /// Theme name: "dark" or "light"
    pub theme: String,

    /// Directory for client-local data (log cache, preferences)
    pub data_dir: PathBuf,

    /// Directory that log and profile exports are written to
    pub export_dir: PathBuf,

    /// Whether to run the TUI (headless mode only runs one-shot commands)
    pub enable_tui: bool,

    /// Demo mode: in-memory backend with simulated sends, no server needed
    pub demo_mode: bool,

    /// Autosave, undo, polling and notification timers
    pub timing: TimingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            theme: "dark".to_string(),
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
            enable_tui: true,
            demo_mode: false,
            timing: TimingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("graphite"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn default_export_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub server_url: Option<String>,
    pub theme: Option<String>,
    pub data_dir: Option<String>,
    pub export_dir: Option<String>,

    /// Optional [timing] section
    pub timing: Option<FileTiming>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Truthy runtime flag values
fn flag_set(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl Config {
    /// Get the config file path: ~/.config/graphite/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("graphite").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };
        if path.exists() {
            return;
        }
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }
        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load file config if it exists
    ///
    /// Exits the process if the file exists but cannot be read or parsed.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse_file_config(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  To reset, run `graphite config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with environment lookups
    pub(crate) fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let server_url = env("GRAPHITE_URL")
            .or(file.server_url)
            .unwrap_or(defaults.server_url);

        let theme = env("GRAPHITE_THEME")
            .or(file.theme)
            .map(|t| t.to_lowercase())
            .unwrap_or(defaults.theme);

        let data_dir = env("GRAPHITE_DATA_DIR")
            .or(file.data_dir)
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        // Export directory: file > default
        let export_dir = file
            .export_dir
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        // Runtime flags: env only
        let enable_tui = !env("GRAPHITE_NO_TUI").is_some_and(|v| flag_set(&v));
        let demo_mode = env("GRAPHITE_DEMO").is_some_and(|v| flag_set(&v));

        Self {
            server_url,
            theme,
            data_dir,
            export_dir,
            enable_tui,
            demo_mode,
            timing: TimingConfig::from_file(file.timing),
            logging: LoggingConfig::from_file(file.logging),
        }
    }
}
