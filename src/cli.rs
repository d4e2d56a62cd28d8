// CLI module - command-line argument parsing and handlers
//
// Without a subcommand graphite runs the TUI. Subcommands:
// - config --show|--path|--reset: local configuration, handled before any
//   logging or network setup
// - accounts, start, stop, logs: one-shot operations against the backend,
//   run through the same Panel the TUI drives

use crate::config::{Config, VERSION};
use crate::error::ClientError;
use crate::panel::Panel;
use crate::storage;
use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// graphite - terminal admin panel for a message-sending bot
#[derive(Parser)]
#[command(name = "graphite")]
#[command(version = VERSION)]
#[command(about = "Terminal admin panel for a message-sending bot", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Manage configuration profiles ("accounts")
    Accounts {
        #[command(subcommand)]
        action: AccountsAction,
    },

    /// Start the bot (the active profile's settings are saved first)
    Start,

    /// Stop the bot
    Stop,

    /// Print the backend's log tail
    Logs {
        /// Also write the lines to a file in the export directory
        #[arg(long)]
        export: bool,
    },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List profiles; the active one is marked with `*`
    List,

    /// Make a profile active
    Activate { id: String },

    /// Write a profile to a JSON export file
    Export {
        id: String,

        /// Directory to write into (defaults to the configured export_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Create a profile from a JSON export file
    Import { file: PathBuf },
}

// ─────────────────────────────────────────────────────────────────────────────
// Local commands
// ─────────────────────────────────────────────────────────────────────────────

/// Handle `config` commands. Returns true if one was handled (exit after).
pub fn handle_local(command: &Option<Commands>) -> bool {
    let Some(Commands::Config { show, reset, path }) = command else {
        return false;
    };

    if *path {
        handle_config_path();
    } else if *show {
        handle_config_show();
    } else if *reset {
        handle_config_reset();
    } else {
        println!("Usage: graphite config [--show|--reset|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --path    Show config file path");
    }
    true
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!("# tui = {}, demo = {}", config.enable_tui, config.demo_mode);
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend commands
// ─────────────────────────────────────────────────────────────────────────────

/// Backend errors carry their user-facing text into the anyhow chain
fn fail(err: ClientError) -> anyhow::Error {
    anyhow::anyhow!(err.user_message())
}

/// Run a one-shot backend command
pub async fn run(command: Commands, panel: &Panel, config: &Config) -> Result<()> {
    match command {
        Commands::Config { .. } => Ok(()),
        Commands::Accounts { action } => run_accounts(action, panel, config).await,
        Commands::Start => {
            // Start saves the form first, so it must hold the server's values
            panel.load().await.map_err(fail)?;
            panel.start_bot().await.map_err(fail)?;
            println!("Bot started");
            Ok(())
        }
        Commands::Stop => {
            let ack = panel.stop_bot().await.map_err(fail)?;
            let message = ack.message.unwrap_or_else(|| "Bot stopping...".to_string());
            if ack.success {
                println!("{}", message);
                Ok(())
            } else {
                anyhow::bail!(message)
            }
        }
        Commands::Logs { export } => {
            panel.poll_logs().await.map_err(fail)?;
            let logs = panel.read(|s| s.logs.clone());
            for line in &logs {
                println!("{}", line);
            }
            if export {
                let path = storage::write_log_export(&config.export_dir, &logs, Utc::now())?;
                eprintln!("Logs exported to {}", path.display());
            }
            Ok(())
        }
    }
}

async fn run_accounts(action: AccountsAction, panel: &Panel, config: &Config) -> Result<()> {
    panel.refresh_profiles().await.map_err(fail)?;

    match action {
        AccountsAction::List => {
            let view = panel.view();
            for row in &view.profiles {
                println!(
                    "{} {:<12} {:<24} {} ({} messages)",
                    if row.active { "*" } else { " " },
                    row.id,
                    row.name,
                    row.summary,
                    row.message_count
                );
            }
        }
        AccountsAction::Activate { id } => {
            panel.activate_profile(&id).await.map_err(fail)?;
            println!("Active config: {}", id);
        }
        AccountsAction::Export { id, out } => {
            let file = panel.export_profile(&id, Local::now()).map_err(fail)?;
            let dir = out.unwrap_or_else(|| config.export_dir.clone());
            let path = storage::write_export(&dir, &file.filename, &file.contents)?;
            println!("{}", path.display());
        }
        AccountsAction::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let profile = panel.import_profile(&text).await.map_err(fail)?;
            println!("Imported as {} ({})", profile.name, profile.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryBackend;
    use crate::panel::Timing;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryBackend>, Panel, Config, tempfile::TempDir) {
        let backend = Arc::new(MemoryBackend::new());
        let panel = Panel::new(backend.clone(), Timing::default(), None);
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            export_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        (backend, panel, config, dir)
    }

    #[test]
    fn parses_nested_account_commands() {
        let cli = Cli::try_parse_from(["graphite", "accounts", "export", "acct-2", "--out", "/tmp"])
            .unwrap();
        match cli.command {
            Some(Commands::Accounts {
                action: AccountsAction::Export { id, out },
            }) => {
                assert_eq!(id, "acct-2");
                assert_eq!(out, Some(PathBuf::from("/tmp")));
            }
            _ => panic!("wrong command"),
        }

        let cli = Cli::try_parse_from(["graphite"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!handle_local(&cli.command));
    }

    #[tokio::test]
    async fn export_then_import_through_files() {
        let (backend, panel, config, dir) = setup();

        run(
            Commands::Accounts {
                action: AccountsAction::Export {
                    id: "acct-1".into(),
                    out: None,
                },
            },
            &panel,
            &config,
        )
        .await
        .unwrap();

        let exported = std::fs::read_dir(dir.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        assert!(exported
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("config-1-"));

        run(
            Commands::Accounts {
                action: AccountsAction::Import { file: exported },
            },
            &panel,
            &config,
        )
        .await
        .unwrap();

        let names: Vec<String> = backend.profiles().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Config 1", "Config 1 (imported)"]);
    }

    #[tokio::test]
    async fn start_refusal_is_an_error() {
        let (backend, panel, config, _dir) = setup();

        let err = run(Commands::Start, &panel, &config).await.unwrap_err();
        assert_eq!(err.to_string(), "Token and Channel ID are required");
        assert!(!backend.is_running());
    }

    #[tokio::test]
    async fn stop_when_idle_reports_backend_message() {
        let (_backend, panel, config, _dir) = setup();

        let err = run(Commands::Stop, &panel, &config).await.unwrap_err();
        assert_eq!(err.to_string(), "Bot is not running");
    }

    #[tokio::test]
    async fn logs_export_writes_file() {
        let (backend, panel, config, dir) = setup();
        backend.push_log("hello");

        run(Commands::Logs { export: true }, &panel, &config)
            .await
            .unwrap();

        let file = std::fs::read_dir(dir.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        let text = std::fs::read_to_string(file).unwrap();
        assert!(text.ends_with("hello"));
    }
}
