//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML file
    pub fn to_toml(&self) -> String {
        format!(
            r#"# graphite configuration

# Bot backend base URL (GRAPHITE_URL overrides)
server_url = "{server_url}"

# Theme: dark, light (press 't' in the TUI to switch; the choice is remembered)
theme = "{theme}"

# Client-local data: log cache and preferences (GRAPHITE_DATA_DIR overrides)
data_dir = "{data_dir}"

# Where log and config exports are written
export_dir = "{export_dir}"

# Timers, in milliseconds
[timing]
autosave_ms = {autosave_ms}        # quiet period before an edit is saved
undo_window_ms = {undo_window_ms}     # how long removals can be undone
poll_ms = {poll_ms}            # status and log polling
clock_ms = {clock_ms}
toast_ms = {toast_ms}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to the developer console or stdout)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            server_url = self.server_url,
            theme = self.theme,
            data_dir = toml_path(&self.data_dir),
            export_dir = toml_path(&self.export_dir),
            autosave_ms = self.timing.autosave_ms,
            undo_window_ms = self.timing.undo_window_ms,
            poll_ms = self.timing.poll_ms,
            clock_ms = self.timing.clock_ms,
            toast_ms = self.timing.toast_ms,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = toml_path(&self.logging.file_dir),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}

/// Paths go into basic strings, so Windows backslashes need escaping
fn toml_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
