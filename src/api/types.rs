//! Wire types of the bot backend's JSON API

use crate::error::{ClientError, ClientResult};
use crate::panel::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `GET /api/config`: the active profile's settings plus run state
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(flatten)]
    pub settings: Settings,
    #[serde(default)]
    pub bot_running: bool,
}

/// A named settings profile ("account" on the wire)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub config: Settings,
}

/// `GET /api/accounts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileList {
    #[serde(default)]
    pub accounts: Vec<Profile>,
    #[serde(default)]
    pub active_account_id: Option<String>,
}

/// Generic `{success, message?}` reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    /// Bare `{success: true}`
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// Turn `success: false` into [`ClientError::Rejected`]
    pub fn check(self, fallback: &str) -> ClientResult<Option<String>> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ClientError::rejected(self.message, fallback))
        }
    }
}

/// `POST /api/accounts` reply
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Created {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Profile>,
}

impl Created {
    pub fn check(self, fallback: &str) -> ClientResult<Profile> {
        match (self.success, self.account) {
            (true, Some(account)) => Ok(account),
            (_, _) => Err(ClientError::rejected(self.message, fallback)),
        }
    }
}

/// `POST /api/accounts` body
#[derive(Debug, Serialize)]
pub struct NewProfile<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<&'a Settings>,
}

/// `PUT /api/accounts/{id}` body
#[derive(Debug, Serialize)]
pub struct RenameProfile<'a> {
    pub name: &'a str,
}

/// `GET /api/logs`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogTail {
    #[serde(default)]
    pub logs: Vec<String>,
}

/// `GET /api/message-stats`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageStats {
    #[serde(default)]
    pub stats: HashMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_splits_run_state_from_settings() {
        let snapshot: ConfigSnapshot = serde_json::from_value(json!({
            "token": "abc",
            "mode": "scheduled",
            "send_times": ["10:00"],
            "bot_running": true
        }))
        .unwrap();
        assert!(snapshot.bot_running);
        assert_eq!(snapshot.settings.token, "abc");
        assert_eq!(snapshot.settings.send_times, vec!["10:00"]);
        assert_eq!(snapshot.settings.spam_interval, Some(60));
    }

    #[test]
    fn profile_without_config_gets_defaults() {
        let profile: Profile =
            serde_json::from_value(json!({"id": "a1", "name": "Config 1"})).unwrap();
        assert_eq!(profile.config, Settings::default());
    }

    #[test]
    fn ack_check_uses_fallback() {
        let err = Ack::default().check("Failed to switch config").unwrap_err();
        assert_eq!(err.user_message(), "Failed to switch config");
        assert!(Ack::ok("fine").check("x").is_ok());
    }

    #[test]
    fn created_without_account_is_rejected() {
        let created = Created {
            success: true,
            message: None,
            account: None,
        };
        assert!(created.check("Failed to create config").is_err());
    }

    #[test]
    fn new_profile_omits_missing_config() {
        let body = serde_json::to_value(NewProfile {
            name: "Config 2",
            config: None,
        })
        .unwrap();
        assert_eq!(body, json!({"name": "Config 2"}));
    }
}
