// API module - the bot backend as seen from the panel
//
// `Backend` is the seam between client state and transport:
// - HttpBackend: the real REST-ish JSON API over reqwest
// - MemoryBackend: same semantics held in memory (demo mode, tests)

pub mod http;
pub mod memory;
pub mod types;

pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use types::{Ack, ConfigSnapshot, Created, Profile, ProfileList};

use crate::error::ClientResult;
use crate::panel::settings::Settings;
use async_trait::async_trait;
use std::collections::HashMap;

/// Endpoints consumed by the panel
///
/// Logical failures come back as `Ack { success: false, .. }` so callers can
/// pick their own fallback text; only transport and decoding problems are
/// `Err`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/config`
    async fn get_config(&self) -> ClientResult<ConfigSnapshot>;

    /// `POST /api/config`
    async fn save_config(&self, settings: &Settings) -> ClientResult<Ack>;

    /// `POST /api/start`
    async fn start(&self) -> ClientResult<Ack>;

    /// `POST /api/stop`
    async fn stop(&self) -> ClientResult<Ack>;

    /// `GET /api/logs`
    async fn logs(&self) -> ClientResult<Vec<String>>;

    /// `GET /api/accounts`
    async fn list_profiles(&self) -> ClientResult<ProfileList>;

    /// `POST /api/accounts`
    async fn create_profile(&self, name: &str, config: Option<&Settings>)
        -> ClientResult<Created>;

    /// `POST /api/accounts/{id}/activate`
    async fn activate_profile(&self, id: &str) -> ClientResult<Ack>;

    /// `PUT /api/accounts/{id}`
    async fn rename_profile(&self, id: &str, name: &str) -> ClientResult<Ack>;

    /// `DELETE /api/accounts/{id}`
    async fn delete_profile(&self, id: &str) -> ClientResult<Ack>;

    /// `GET /api/message-stats`
    async fn message_stats(&self) -> ClientResult<HashMap<String, u64>>;

    /// `DELETE /api/message-stats`
    async fn reset_message_stats(&self) -> ClientResult<()>;
}
