//! Bot settings for one profile
//!
//! `Settings` is both the in-memory form state and the exact JSON shape the
//! backend accepts on `POST /api/config`. Decoding is lenient: every field
//! may be absent, `null` or an empty string and falls back to a documented
//! default, so older or partially-written profiles still load.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const DEFAULT_SPAM_INTERVAL: i64 = 60;
pub const DEFAULT_MESSAGES_COUNT: i64 = 10;
pub const DEFAULT_WINDOW_START: &str = "09:00";
pub const DEFAULT_WINDOW_END: &str = "17:00";

// ─────────────────────────────────────────────────────────────────────────────
// Send mode
// ─────────────────────────────────────────────────────────────────────────────

/// How the bot decides when to send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Fixed interval between messages
    #[default]
    Spam,
    /// Fixed list of daily send times
    Scheduled,
    /// N messages at random moments inside a daily window
    RandomWindow,
}

impl Mode {
    pub fn all() -> &'static [Mode] {
        &[Mode::Spam, Mode::Scheduled, Mode::RandomWindow]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Spam => "spam",
            Mode::Scheduled => "scheduled",
            Mode::RandomWindow => "random_window",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Spam => "Spam",
            Mode::Scheduled => "Scheduled",
            Mode::RandomWindow => "Random Window",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "spam" => Some(Mode::Spam),
            "scheduled" => Some(Mode::Scheduled),
            "random_window" => Some(Mode::RandomWindow),
            _ => None,
        }
    }

    /// Next mode in selector order (wraps)
    pub fn next(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|&m| m == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn prev(self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|&m| m == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Editable text fields
// ─────────────────────────────────────────────────────────────────────────────

/// Free-text inputs of the settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    Token,
    ChannelId,
    MinDelay,
    MaxDelay,
    SpamInterval,
    WindowStart,
    WindowEnd,
    MessagesCount,
}

impl SettingsField {
    pub fn all() -> &'static [SettingsField] {
        &[
            SettingsField::Token,
            SettingsField::ChannelId,
            SettingsField::MinDelay,
            SettingsField::MaxDelay,
            SettingsField::SpamInterval,
            SettingsField::WindowStart,
            SettingsField::WindowEnd,
            SettingsField::MessagesCount,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::Token => "Token",
            SettingsField::ChannelId => "Channel ID",
            SettingsField::MinDelay => "Min delay (s)",
            SettingsField::MaxDelay => "Max delay (s)",
            SettingsField::SpamInterval => "Interval (s)",
            SettingsField::WindowStart => "Window start",
            SettingsField::WindowEnd => "Window end",
            SettingsField::MessagesCount => "Messages",
        }
    }

    /// The mode whose panel shows this field; `None` means always shown
    pub fn mode(&self) -> Option<Mode> {
        match self {
            SettingsField::SpamInterval => Some(Mode::Spam),
            SettingsField::WindowStart
            | SettingsField::WindowEnd
            | SettingsField::MessagesCount => Some(Mode::RandomWindow),
            _ => None,
        }
    }

    /// Min/max delay are greyed out while the delay toggle is off
    pub fn is_delay(&self) -> bool {
        matches!(self, SettingsField::MinDelay | SettingsField::MaxDelay)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SettingsField::MinDelay
                | SettingsField::MaxDelay
                | SettingsField::SpamInterval
                | SettingsField::MessagesCount
        )
    }
}

/// Parse the leading integer of `text`, or nothing.
///
/// Mirrors how a form input is read: surrounding whitespace is ignored, an
/// optional sign is accepted and parsing stops at the first non-digit, so
/// `"12s"` reads as 12 while `"s12"` and `""` read as empty.
pub fn parse_int_or_empty(text: &str) -> Option<i64> {
    let text = text.trim();
    let (sign, rest) = match text.as_bytes().first() {
        Some(b'-') => (-1, &text[1..]),
        Some(b'+') => (1, &text[1..]),
        _ => (1, text),
    };
    let digits: &str = {
        let end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|v| v * sign)
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// One profile's bot settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSettings")]
pub struct Settings {
    pub token: String,
    pub channel_id: String,
    pub messages: Vec<String>,
    pub mode: Mode,
    pub delay_enabled: bool,
    #[serde(serialize_with = "int_or_empty")]
    pub min_delay: Option<i64>,
    #[serde(serialize_with = "int_or_empty")]
    pub max_delay: Option<i64>,
    pub dry_run: bool,
    pub send_times: Vec<String>,
    #[serde(serialize_with = "int_or_empty")]
    pub spam_interval: Option<i64>,
    pub window_start: String,
    pub window_end: String,
    #[serde(serialize_with = "int_or_empty")]
    pub messages_count: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        RawSettings::default().into()
    }
}

impl Settings {
    /// Current text of a form field
    pub fn field_text(&self, field: SettingsField) -> String {
        let int = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
        match field {
            SettingsField::Token => self.token.clone(),
            SettingsField::ChannelId => self.channel_id.clone(),
            SettingsField::MinDelay => int(self.min_delay),
            SettingsField::MaxDelay => int(self.max_delay),
            SettingsField::SpamInterval => int(self.spam_interval),
            SettingsField::WindowStart => self.window_start.clone(),
            SettingsField::WindowEnd => self.window_end.clone(),
            SettingsField::MessagesCount => int(self.messages_count),
        }
    }

    /// Apply raw input text to a form field. Returns true if the stored value
    /// changed.
    pub fn set_field(&mut self, field: SettingsField, text: &str) -> bool {
        fn put<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }
        match field {
            SettingsField::Token => put(&mut self.token, text.to_string()),
            SettingsField::ChannelId => put(&mut self.channel_id, text.to_string()),
            SettingsField::MinDelay => put(&mut self.min_delay, parse_int_or_empty(text)),
            SettingsField::MaxDelay => put(&mut self.max_delay, parse_int_or_empty(text)),
            // Always numbers on the server; unreadable input keeps the old value
            SettingsField::SpamInterval => match parse_int_or_empty(text) {
                Some(v) => put(&mut self.spam_interval, Some(v)),
                None => false,
            },
            SettingsField::WindowStart => put(&mut self.window_start, text.to_string()),
            SettingsField::WindowEnd => put(&mut self.window_end, text.to_string()),
            SettingsField::MessagesCount => match parse_int_or_empty(text) {
                Some(v) => put(&mut self.messages_count, Some(v)),
                None => false,
            },
        }
    }

    /// Short token preview for profile lists
    pub fn token_summary(&self) -> String {
        if self.token.is_empty() {
            return "No token configured".to_string();
        }
        let preview: String = self.token.chars().take(20).collect();
        format!("Token: {}...", preview)
    }
}

/// Empty numeric inputs travel as `""`, matching what the form submits
fn int_or_empty<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_i64(*v),
        None => serializer.serialize_str(""),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lenient decoding layer
// ─────────────────────────────────────────────────────────────────────────────

/// Wire shape with every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    token: Option<String>,
    channel_id: Option<String>,
    messages: Option<Vec<String>>,
    mode: Option<String>,
    delay_enabled: Option<bool>,
    #[serde(deserialize_with = "lenient_int")]
    min_delay: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    max_delay: Option<i64>,
    dry_run: Option<bool>,
    send_times: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_int")]
    spam_interval: Option<i64>,
    window_start: Option<String>,
    window_end: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    messages_count: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value: Option<IntOrText> = Option::deserialize(deserializer)?;
    Ok(match value {
        None => None,
        Some(IntOrText::Int(v)) => Some(v),
        Some(IntOrText::Float(v)) => Some(v as i64),
        Some(IntOrText::Text(s)) => parse_int_or_empty(&s),
    })
}

fn text_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        let mode = match raw.mode.as_deref() {
            None | Some("") => Mode::default(),
            Some(s) => Mode::parse(s).unwrap_or_else(|| {
                tracing::warn!("Unknown send mode {:?}, falling back to spam", s);
                Mode::default()
            }),
        };

        let mut messages = Vec::new();
        for message in raw.messages.unwrap_or_default() {
            if !messages.contains(&message) {
                messages.push(message);
            }
        }

        let mut send_times = raw.send_times.unwrap_or_default();
        send_times.sort();
        send_times.dedup();

        Self {
            token: raw.token.unwrap_or_default(),
            channel_id: raw.channel_id.unwrap_or_default(),
            messages,
            mode,
            // Only an explicit `false` disables the delay
            delay_enabled: raw.delay_enabled != Some(false),
            min_delay: raw.min_delay,
            max_delay: raw.max_delay,
            dry_run: raw.dry_run.unwrap_or(false),
            send_times,
            spam_interval: Some(raw.spam_interval.unwrap_or(DEFAULT_SPAM_INTERVAL)),
            window_start: text_or(raw.window_start, DEFAULT_WINDOW_START),
            window_end: text_or(raw.window_end, DEFAULT_WINDOW_END),
            messages_count: Some(raw.messages_count.unwrap_or(DEFAULT_MESSAGES_COUNT)),
        }
    }
}
