// Demo mode: an in-memory backend with a simulated send loop
//
// Seeds a few profiles, then plays the part of the bot process: while the
// bot is running it "sends" the active profile's messages in turn, so the
// log tail, status badge and message statistics all move.
//
// Run with: GRAPHITE_DEMO=1 cargo run --release

use crate::api::{Backend, MemoryBackend};
use crate::error::ClientResult;
use crate::panel::settings::{Mode, Settings};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// Time between simulated sends
const SEND_EVERY: Duration = Duration::from_millis(2500);

/// Every Nth send fails, so flagged log lines show up
const FAIL_EVERY: u64 = 7;

fn sample_profiles() -> Vec<(&'static str, Settings)> {
    vec![
        (
            "Announcements",
            Settings {
                token: "demo-token-announcements-0000".into(),
                channel_id: "1100000000000000001".into(),
                messages: vec![
                    "Server maintenance tonight at 22:00".into(),
                    "New event starts Friday!\nSign up in #events".into(),
                    "Remember to read the rules".into(),
                ],
                mode: Mode::Scheduled,
                send_times: vec!["09:00".into(), "13:30".into(), "18:00".into()],
                ..Settings::default()
            },
        ),
        (
            "Chatter",
            Settings {
                token: "demo-token-chatter-1111".into(),
                channel_id: "1100000000000000002".into(),
                messages: vec!["gm".into(), "anyone around?".into(), "brb".into()],
                mode: Mode::RandomWindow,
                delay_enabled: true,
                min_delay: Some(2),
                max_delay: Some(8),
                dry_run: true,
                ..Settings::default()
            },
        ),
    ]
}

/// Fill the backend with sample data: the default profile gets messages and
/// two more profiles are created
pub async fn seed(backend: &MemoryBackend) -> ClientResult<()> {
    let first = Settings {
        token: "demo-token-default-2222".into(),
        channel_id: "1100000000000000000".into(),
        messages: vec!["Hello from graphite".into(), "Daily reminder: hydrate".into()],
        spam_interval: Some(30),
        ..Settings::default()
    };
    backend.save_config(&first).await?.check("Failed to save configuration")?;

    for (name, settings) in sample_profiles() {
        backend
            .create_profile(name, Some(&settings))
            .await?
            .check("Failed to create config")?;
    }
    backend.push_log("Demo backend ready");
    Ok(())
}

/// Simulated bot process: runs until `shutdown` fires
pub async fn run_demo(backend: Arc<MemoryBackend>, mut shutdown: oneshot::Receiver<()>) {
    let mut sent: u64 = 0;
    let mut cursor = 0usize;

    loop {
        tokio::select! {
            _ = &mut shutdown => return,
            _ = sleep(SEND_EVERY) => {}
        }

        if !backend.is_running() {
            continue;
        }
        let Some(settings) = backend.active_settings() else {
            continue;
        };
        if settings.messages.is_empty() {
            backend.push_log("No messages configured, stopping");
            backend.finish_run();
            continue;
        }

        sent += 1;
        let message = &settings.messages[cursor % settings.messages.len()];
        cursor = cursor.wrapping_add(1);

        if sent % FAIL_EVERY == 0 {
            backend.push_log("Failed to send message: 429 Too Many Requests");
        } else {
            backend.record_send(message, settings.dry_run);
        }
    }
}
