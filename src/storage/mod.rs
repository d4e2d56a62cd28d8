// Storage module - client-local persistence and export files
//
// The backend owns every durable piece of bot state. What lives here is the
// panel's own scratch space:
// - LocalStore: one JSON object file of key/value pairs (log tail cache,
//   theme preference)
// - Export files: plain-text log dumps and JSON profile exports
//
// Example: jq '."graphite.logs".savedAt' ~/.local/share/graphite/local-store.json

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key of the cached log tail (`CachedLogs`)
pub const LOGS_KEY: &str = "graphite.logs";
/// Key of the theme preference (`"dark"` | `"light"`)
pub const THEME_KEY: &str = "graphite.theme";

const STORE_FILE: &str = "local-store.json";

/// Last non-empty log tail seen by the poller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLogs {
    pub logs: Vec<String>,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

/// Key/value JSON file in the data directory
pub struct LocalStore {
    path: PathBuf,
    // Serializes read-modify-write cycles from concurrent pollers
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Open (or lazily create) the store inside `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).context("Failed to create data directory")?;
        Ok(Self {
            path: dir.join(STORE_FILE),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let map = self.read_map()?;
        match map.get(key) {
            Some(value) => {
                let typed = serde_json::from_value(value.clone())
                    .with_context(|| format!("Malformed value for {}", key))?;
                Ok(Some(typed))
            }
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map().unwrap_or_else(|e| {
            tracing::warn!("Local store unreadable, starting fresh: {:#}", e);
            Map::new()
        });
        let value = serde_json::to_value(value).context("Failed to serialize value")?;
        map.insert(key.to_string(), value);
        self.write_map(&map)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let text = fs::read_to_string(&self.path).context("Failed to read local store")?;
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&text).context("Failed to parse local store")
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(map).context("Failed to serialize local store")?;
        // Write-then-rename so a crash never leaves half a file behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).context("Failed to write local store")?;
        fs::rename(&tmp, &self.path).context("Failed to replace local store")?;
        Ok(())
    }
}

/// `graphite-logs-<ISO timestamp>.txt` with `:` swapped for `-`
pub fn log_export_filename(now: DateTime<Utc>) -> String {
    let stamp = now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    format!("graphite-logs-{}.txt", stamp.replace(':', "-"))
}

/// Write `contents` as `dir/filename`, creating `dir` first
pub fn write_export(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("Failed to create export directory")?;
    let path = dir.join(filename);
    fs::write(&path, contents)
        .with_context(|| format!("Failed to write export file {}", path.display()))?;
    tracing::info!("Exported {}", path.display());
    Ok(path)
}

/// Dump log lines as newline-joined text
pub fn write_log_export(dir: &Path, logs: &[String], now: DateTime<Utc>) -> Result<PathBuf> {
    write_export(dir, &log_export_filename(now), &logs.join("\n"))
}
