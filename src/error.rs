//! Client error taxonomy
//!
//! Every panel operation reports failures through [`ClientError`]. Nothing in
//! this layer is fatal: callers turn errors into a toast (or a console line)
//! and keep the UI interactive.

use thiserror::Error;

/// Shown when the backend could not be reached at all
pub const NETWORK_ERROR: &str = "Network error occurred";

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a decodable response (connection refused,
    /// reset, malformed body)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The backend answered with `success: false`
    #[error("{message}")]
    Rejected { message: String },

    /// Rejected locally before any network call
    #[error("{0}")]
    Validation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl ClientError {
    pub fn rejected(message: Option<String>, fallback: &str) -> Self {
        Self::Rejected {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Text suitable for a toast. Transport details stay in the developer
    /// console.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => NETWORK_ERROR.to_string(),
            Self::Rejected { message } => message.clone(),
            Self::Validation(message) => message.clone(),
            Self::Io(e) => format!("File error: {}", e),
            Self::Json(e) => format!("Invalid JSON: {}", e),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_falls_back_when_message_missing_or_blank() {
        let err = ClientError::rejected(None, "Failed to save configuration");
        assert_eq!(err.user_message(), "Failed to save configuration");

        let err = ClientError::rejected(Some("  ".into()), "fallback");
        assert_eq!(err.user_message(), "fallback");

        let err = ClientError::rejected(Some("Account not found".into()), "fallback");
        assert_eq!(err.user_message(), "Account not found");
    }

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = ClientError::validation("Config name cannot be empty");
        assert_eq!(err.to_string(), "Config name cannot be empty");
        assert!(!err.is_transport());
    }
}
