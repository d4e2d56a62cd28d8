// graphite - terminal admin panel for a message-sending bot
//
// The bot itself runs behind an HTTP API. graphite edits its configuration,
// manages saved configs, starts and stops it, and shows its logs and send
// statistics.
//
// Architecture:
// - api: the Backend trait, its HTTP client and an in-memory stand-in
// - panel: client state and every operation the UI triggers
// - tui (ratatui): the interactive front-end over a Panel
// - cli (clap): one-shot commands over the same Panel
// - storage: small local key-value store and export files

mod api;
mod cli;
mod config;
mod demo;
mod error;
mod logging;
mod panel;
mod storage;
mod tui;

use anyhow::Result;
use api::{Backend, HttpBackend, MemoryBackend};
use clap::Parser;
use config::{Config, LogRotation};
use logging::{ConsoleBuffer, ConsoleLayer};
use panel::Panel;
use std::sync::Arc;
use storage::LocalStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

/// Initialize tracing
///
/// In TUI mode log output is captured into `console` (printing would garble
/// the display); otherwise it goes to stderr. File logging adds a JSON layer
/// on a rotating file. The returned guard must live until exit so buffered
/// lines are flushed.
///
/// Precedence: RUST_LOG env var > config file > default "info"
fn init_tracing(
    config: &Config,
    tui_mode: bool,
    console: &ConsoleBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = format!("graphite={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if tui_mode {
        layers.push(ConsoleLayer::new(console.clone()).boxed());
    } else {
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .boxed(),
        );
    }

    let mut guard = None;
    if config.logging.file_enabled {
        let dir = &config.logging.file_dir;
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let prefix = &config.logging.file_prefix;
                let appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(dir, prefix),
                    LogRotation::Daily => tracing_appender::rolling::daily(dir, prefix),
                    LogRotation::Never => tracing_appender::rolling::never(dir, prefix),
                };
                let (non_blocking, worker) = tracing_appender::non_blocking(appender);
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .boxed(),
                );
                guard = Some(worker);
            }
            Err(e) => eprintln!(
                "Warning: Could not create log directory {:?}: {}",
                dir, e
            ),
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Local config commands need no backend or logging
    if cli::handle_local(&cli.command) {
        return Ok(());
    }

    Config::ensure_config_exists();
    let config = Config::from_env();

    let tui_mode = config.enable_tui && cli.command.is_none();
    let console = ConsoleBuffer::new();
    let _file_guard = init_tracing(&config, tui_mode, &console);

    tracing::debug!("graphite {} starting", config::VERSION);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let (backend, demo_handle): (Arc<dyn Backend>, _) = if config.demo_mode {
        tracing::info!("Running in DEMO MODE - using an in-memory backend");
        let memory = Arc::new(MemoryBackend::new());
        if let Err(e) = demo::seed(&memory).await {
            tracing::warn!("Demo seed failed: {}", e);
        }
        let handle = tokio::spawn(demo::run_demo(memory.clone(), shutdown_rx));
        (memory as Arc<dyn Backend>, Some(handle))
    } else {
        let http = HttpBackend::new(&config.server_url)
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        tracing::info!("Using backend at {}", http.base_url());
        (Arc::new(http) as Arc<dyn Backend>, None)
    };

    let store = match LocalStore::open(&config.data_dir) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!("Local storage unavailable: {:#}", e);
            None
        }
    };

    let panel = Panel::new(backend, config.timing.panel_timing(), store);

    let result = match cli.command {
        Some(command) => cli::run(command, &panel, &config).await,
        None if tui_mode => tui::run_tui(panel, console, &config).await,
        None => run_headless(panel, &config).await,
    };

    let _ = shutdown_tx.send(());
    if let Some(handle) = demo_handle {
        let _ = handle.await;
    }

    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

/// Headless mode: follow the backend's log tail on stdout until Ctrl+C
async fn run_headless(panel: Panel, config: &Config) -> Result<()> {
    panel.bootstrap().await;
    tracing::info!("Headless mode - following bot logs, Ctrl+C to exit");

    let mut printed: Option<String> = None;
    let mut interval = tokio::time::interval(config.timing.poll_interval());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = interval.tick() => {
                panel.poll().await;
                let logs: Vec<String> = panel.view().logs.into_iter().map(|l| l.text).collect();
                for line in new_lines(&logs, printed.as_deref()) {
                    println!("{}", line);
                }
                if let Some(last) = logs.last() {
                    printed = Some(last.clone());
                }
            }
        }
    }

    if let Err(e) = panel.flush_autosave().await {
        tracing::warn!("Final save failed: {}", e);
    }
    Ok(())
}

/// Lines after the last one already printed. The tail is a sliding window,
/// so the anchor is found by content; if it scrolled out, everything is new.
fn new_lines<'a>(logs: &'a [String], last_printed: Option<&str>) -> &'a [String] {
    match last_printed.and_then(|last| logs.iter().rposition(|l| l == last)) {
        Some(pos) => &logs[pos + 1..],
        None => logs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lines_resume_after_the_anchor() {
        let logs: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(new_lines(&logs, None), &logs[..]);
        assert_eq!(new_lines(&logs, Some("b")), &logs[2..]);
        assert!(new_lines(&logs, Some("c")).is_empty());
        assert_eq!(new_lines(&logs, Some("gone")), &logs[..]);
    }
}
