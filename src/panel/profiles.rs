//! Profile management: list, create, switch, rename, delete with undo,
//! export and import

use super::sequence::Resource;
use super::settings::Settings;
use super::toast::{ToastKind, UndoAction};
use super::Panel;
use crate::api::Profile;
use crate::error::{ClientError, ClientResult};
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const EXPORT_VERSION: &str = "1.0";

const IMPORT_FORMAT_ERROR: &str = "Invalid config file format";

/// Profile export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileExport {
    pub name: String,
    pub config: Settings,
    #[serde(rename = "exportedAt")]
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

/// A rendered export, ready to be written
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

/// `<sanitized-name>-<YYYY-MM-DD>.json`; sanitizing lowercases and turns
/// every run of non-alphanumerics into a single `-`
pub fn export_filename(name: &str, date: NaiveDate) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_gap = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }
    format!("{}-{}.json", slug, date.format("%Y-%m-%d"))
}

/// Validate an import blob: a JSON object with a string `name` and an object
/// `config`
pub fn parse_import(text: &str) -> ClientResult<(String, Settings)> {
    let invalid = || ClientError::validation(IMPORT_FORMAT_ERROR);

    let value: Value = serde_json::from_str(text).map_err(|_| invalid())?;
    let name = value.get("name").and_then(Value::as_str).ok_or_else(invalid)?;
    let config = value
        .get("config")
        .filter(|c| c.is_object())
        .ok_or_else(invalid)?;
    let settings: Settings = serde_json::from_value(config.clone()).map_err(|_| invalid())?;
    Ok((name.to_string(), settings))
}

impl Panel {
    /// Fetch profiles and the active id into client state
    pub async fn refresh_profiles(&self) -> ClientResult<()> {
        let ticket = self.inner.seq.issue(Resource::Profiles);
        let list = self.inner.backend.list_profiles().await.map_err(|e| {
            tracing::warn!("Failed to load configs: {}", e);
            e
        })?;

        if !self.inner.seq.is_current(ticket) {
            tracing::debug!("Dropping stale profile list");
            return Ok(());
        }
        self.write(|s| {
            s.profiles = list.accounts;
            s.active_id = list.active_account_id;
            if let Some(renaming) = &s.renaming {
                if !s.profiles.iter().any(|p| &p.id == renaming) {
                    s.renaming = None;
                }
            }
        });
        Ok(())
    }

    /// Create a profile and refresh the list
    pub async fn create_profile(
        &self,
        name: &str,
        config: Option<&Settings>,
    ) -> ClientResult<Profile> {
        const FALLBACK: &str = "Failed to create config";
        let result = match self.inner.backend.create_profile(name, config).await {
            Ok(created) => created.check(FALLBACK),
            Err(e) => Err(e),
        };
        let profile = result.inspect_err(|e| self.report(e, Some(FALLBACK)))?;

        tracing::info!("Created config {:?} ({})", profile.name, profile.id);
        if let Err(e) = self.refresh_profiles().await {
            tracing::warn!("Profile refresh after create failed: {}", e);
        }
        Ok(profile)
    }

    /// Create `Config <n+1>`, switch to it and start renaming it
    pub async fn add_profile(&self) -> ClientResult<Profile> {
        let count = self.read(|s| s.profiles.len());
        let profile = self
            .create_profile(&format!("Config {}", count + 1), None)
            .await?;
        self.activate_profile(&profile.id).await?;
        self.begin_rename(&profile.id);
        Ok(profile)
    }

    /// Make `id` the active profile and load its settings. On failure the
    /// active profile stays as it was.
    pub async fn activate_profile(&self, id: &str) -> ClientResult<()> {
        const FALLBACK: &str = "Failed to switch config";
        if self.read(|s| s.active_id.as_deref() == Some(id)) {
            return Ok(());
        }

        // Pending edits belong to the profile being left
        if let Err(e) = self.flush_autosave().await {
            tracing::warn!("Saving before switch failed: {}", e);
        }

        let result = match self.inner.backend.activate_profile(id).await {
            Ok(ack) => ack.check(FALLBACK).map(|_| ()),
            Err(e) => Err(e),
        };
        result.inspect_err(|e| self.report(e, Some(FALLBACK)))?;

        tracing::info!("Switched to config {}", id);
        self.write(|s| s.active_id = Some(id.to_string()));
        let (config, profiles) = tokio::join!(self.load(), self.refresh_profiles());
        config?;
        profiles?;
        Ok(())
    }

    pub fn begin_rename(&self, id: &str) {
        self.write(|s| s.renaming = Some(id.to_string()));
    }

    pub fn cancel_rename(&self) {
        self.write(|s| s.renaming = None);
    }

    /// Rename a profile. Blank names are refused; an unchanged name makes no
    /// request.
    pub async fn rename_profile(&self, id: &str, name: &str) -> ClientResult<()> {
        const FALLBACK: &str = "Failed to rename config";
        let name = name.trim();
        if name.is_empty() {
            let err = ClientError::validation("Config name cannot be empty");
            self.report(&err, None);
            return Err(err);
        }
        let unchanged = self.read(|s| s.profile(id).is_some_and(|p| p.name == name));
        if unchanged {
            self.cancel_rename();
            return Ok(());
        }

        let result = match self.inner.backend.rename_profile(id, name).await {
            Ok(ack) => ack.check(FALLBACK).map(|_| ()),
            Err(e) => Err(e),
        };
        result.inspect_err(|e| self.report(e, Some(FALLBACK)))?;

        self.cancel_rename();
        self.refresh_profiles().await
    }

    /// Delete a profile, offering an undo that re-creates it
    pub async fn delete_profile(&self, id: &str) -> ClientResult<()> {
        const FALLBACK: &str = "Failed to delete config";
        let (profile, previous_active) =
            self.read(|s| (s.profile(id).cloned(), s.active_id.clone()));
        let Some(profile) = profile else {
            let err = ClientError::rejected(Some("Account not found".into()), FALLBACK);
            self.report(&err, None);
            return Err(err);
        };

        let result = match self.inner.backend.delete_profile(id).await {
            Ok(ack) => ack.check(FALLBACK).map(|_| ()),
            Err(e) => Err(e),
        };
        result.inspect_err(|e| self.report(e, Some(FALLBACK)))?;
        tracing::info!("Deleted config {:?} ({})", profile.name, profile.id);

        // A newer deletion finalizes the previous one
        let superseded = self.write(|s| s.pending_delete.take());
        if let Some(toast) = superseded {
            self.dismiss_toast(toast);
        }

        // The deletion happened; a failed refresh must not cost the undo
        if let Err(e) = self.refresh_profiles().await {
            tracing::warn!("Profile refresh after delete failed: {}", e);
            self.write(|s| s.profiles.retain(|p| p.id != id));
        }
        let active_changed = self.read(|s| s.active_id != previous_active);
        if active_changed {
            if let Err(e) = self.load().await {
                tracing::warn!("Reload after delete failed: {}", e);
            }
        }

        let was_active = previous_active.as_deref() == Some(id);
        let toast = self.offer_undo(
            format!("Config deleted: {}", profile.name),
            UndoAction::RestoreProfile {
                name: profile.name,
                config: profile.config,
                was_active,
            },
        );
        self.write(|s| s.pending_delete = Some(toast));
        Ok(())
    }

    /// Undo of a deletion: re-create the profile under a new id
    pub(crate) async fn restore_profile(
        &self,
        name: &str,
        config: &Settings,
        was_active: bool,
    ) -> ClientResult<()> {
        let profile = self.create_profile(name, Some(config)).await?;
        if was_active {
            self.activate_profile(&profile.id).await?;
        }
        self.notify(ToastKind::Success, format!("Config restored: {}", profile.name));
        Ok(())
    }

    /// Render the export document of profile `id`
    pub fn export_profile(&self, id: &str, now: DateTime<Local>) -> ClientResult<ExportFile> {
        let profile = self
            .read(|s| s.profile(id).cloned())
            .ok_or_else(|| ClientError::validation("Account not found"))?;
        build_export(&profile, now)
    }

    /// Import a profile export; the copy is named `<name> (imported)`
    pub async fn import_profile(&self, text: &str) -> ClientResult<Profile> {
        let (name, settings) = parse_import(text).inspect_err(|e| self.report(e, None))?;
        let profile = self
            .create_profile(&format!("{} (imported)", name), Some(&settings))
            .await?;
        self.notify(ToastKind::Success, format!("Config imported: {}", profile.name));
        Ok(profile)
    }
}

pub fn build_export(profile: &Profile, now: DateTime<Local>) -> ClientResult<ExportFile> {
    let document = ProfileExport {
        name: profile.name.clone(),
        config: profile.config.clone(),
        exported_at: now.with_timezone(&Utc),
        version: EXPORT_VERSION.to_string(),
    };
    Ok(ExportFile {
        filename: export_filename(&profile.name, now.date_naive()),
        contents: serde_json::to_string_pretty(&document)?,
    })
}
