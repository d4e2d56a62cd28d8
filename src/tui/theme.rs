// Theme system for the TUI
//
// Two palettes, dark and light. The choice is remembered in the local store
// under `graphite.theme` and wins over the configured default.

use crate::storage::{LocalStore, THEME_KEY};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

/// Available themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    /// Parse a theme name; anything unknown is dark
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("light") {
            ThemeKind::Light
        } else {
            ThemeKind::Dark
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark",
            ThemeKind::Light => "Light",
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemeKind::Dark => Theme::dark(),
            ThemeKind::Light => Theme::light(),
        }
    }
}

/// Stored preference if any, else `fallback`
pub fn load_preference(store: Option<&LocalStore>, fallback: ThemeKind) -> ThemeKind {
    let Some(store) = store else {
        return fallback;
    };
    match store.get::<ThemeKind>(THEME_KEY) {
        Ok(Some(kind)) => kind,
        Ok(None) => fallback,
        Err(e) => {
            tracing::debug!("Ignoring stored theme: {:#}", e);
            fallback
        }
    }
}

pub fn save_preference(store: Option<&LocalStore>, kind: ThemeKind) {
    if let Some(store) = store {
        if let Err(e) = store.set(THEME_KEY, &kind) {
            tracing::warn!("Failed to remember theme: {:#}", e);
        }
    }
}

/// Colors for every UI element
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub title: Color,

    pub selected_bg: Color,
    pub selected_fg: Color,

    pub online: Color,
    pub offline: Color,

    pub chip: Color,
    pub log_flagged: Color,

    pub toast_info: Color,
    pub toast_success: Color,
    pub toast_error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            muted: Color::DarkGray,
            border: Color::Gray,
            border_focused: Color::Cyan,
            title: Color::Cyan,
            selected_bg: Color::Rgb(40, 60, 90),
            selected_fg: Color::White,
            online: Color::Green,
            offline: Color::Red,
            chip: Color::LightBlue,
            log_flagged: Color::LightRed,
            toast_info: Color::Cyan,
            toast_success: Color::Green,
            toast_error: Color::Red,
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(250, 250, 250),
            fg: Color::Black,
            muted: Color::Gray,
            border: Color::DarkGray,
            border_focused: Color::Blue,
            title: Color::Blue,
            selected_bg: Color::Rgb(200, 220, 255),
            selected_fg: Color::Black,
            online: Color::Rgb(0, 130, 0),
            offline: Color::Rgb(190, 0, 0),
            chip: Color::Blue,
            log_flagged: Color::Red,
            toast_info: Color::Blue,
            toast_success: Color::Rgb(0, 130, 0),
            toast_error: Color::Red,
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn disabled(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_round_trips_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();

        assert_eq!(load_preference(Some(&store), ThemeKind::Light), ThemeKind::Light);
        save_preference(Some(&store), ThemeKind::Dark);
        assert_eq!(load_preference(Some(&store), ThemeKind::Light), ThemeKind::Dark);

        let raw: Option<String> = store.get(THEME_KEY).unwrap();
        assert_eq!(raw.as_deref(), Some("dark"));
    }

    #[test]
    fn unknown_names_are_dark() {
        assert_eq!(ThemeKind::parse("LIGHT"), ThemeKind::Light);
        assert_eq!(ThemeKind::parse("solarized"), ThemeKind::Dark);
        assert_eq!(ThemeKind::Dark.toggle(), ThemeKind::Light);
    }
}
