//! Loading and saving the active profile's settings

use super::sequence::Resource;
use super::toast::ToastKind;
use super::Panel;
use crate::error::ClientResult;

const SAVE_FALLBACK: &str = "Failed to save configuration";

impl Panel {
    /// Fetch the active profile's settings and the bot run state
    pub async fn load(&self) -> ClientResult<()> {
        let ticket = self.inner.seq.issue(Resource::Config);
        let snapshot = self.inner.backend.get_config().await.map_err(|e| {
            tracing::warn!("Failed to load config: {}", e);
            e
        })?;

        if !self.inner.seq.is_current(ticket) {
            tracing::debug!("Dropping stale config response");
            return Ok(());
        }
        self.write(|s| {
            s.settings = snapshot.settings;
            s.bot_running = snapshot.bot_running;
            s.config_loaded = true;
        });
        Ok(())
    }

    /// Send the current settings to the backend, then refresh the profile
    /// list so summaries reflect the change
    pub async fn save(&self) -> ClientResult<()> {
        let settings = self.read(|s| s.settings.clone());
        let result = match self.inner.backend.save_config(&settings).await {
            Ok(ack) => ack.check(SAVE_FALLBACK),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            self.report(&e, None);
            return Err(e);
        }

        if let Err(e) = self.refresh_profiles().await {
            tracing::warn!("Profile refresh after save failed: {}", e);
        }
        let name = self
            .read(|s| s.active_profile().map(|p| p.name.clone()))
            .unwrap_or_else(|| "current config".to_string());
        self.notify(ToastKind::Success, format!("Configuration saved for {}", name));
        Ok(())
    }

    /// (Re)start the autosave quiet period
    pub fn schedule_autosave(&self) {
        let panel = self.clone();
        self.inner.autosave.schedule(async move {
            // Failures were already surfaced as a toast
            let _ = panel.save().await;
        });
    }

    pub fn autosave_pending(&self) -> bool {
        self.inner.autosave.is_pending()
    }

    /// Save now if an autosave is waiting; no-op otherwise
    pub async fn flush_autosave(&self) -> ClientResult<()> {
        if !self.inner.autosave.is_pending() {
            return Ok(());
        }
        self.inner.autosave.cancel();
        self.save().await
    }
}
