// Modal overlays: text prompts, help and the developer console
//
// A modal captures all key input while it is open.

use super::input::TextInput;
use crate::panel::settings::SettingsField;

/// What a prompt's text is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    EditField(SettingsField),
    AddMessage,
    AddTime,
    Rename { id: String },
    ImportPath,
}

impl PromptKind {
    pub fn title(&self) -> String {
        match self {
            PromptKind::EditField(field) => format!(" {} ", field.label()),
            PromptKind::AddMessage => " New message (Alt+Enter: line break) ".to_string(),
            PromptKind::AddTime => " New send time (HH:MM) ".to_string(),
            PromptKind::Rename { .. } => " Rename config ".to_string(),
            PromptKind::ImportPath => " Import config from file ".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: TextInput,
}

#[derive(Debug, Clone)]
pub enum Modal {
    Prompt(Prompt),
    Help,
    /// Developer console: captured tracing output
    Console,
}

impl Modal {
    pub fn prompt(kind: PromptKind, initial: &str) -> Self {
        let input = match kind {
            PromptKind::AddMessage => TextInput::multiline(initial),
            _ => TextInput::new(initial),
        };
        Modal::Prompt(Prompt { kind, input })
    }
}

/// Key bindings shown by the help overlay, by section
pub const HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("Tab / Shift+Tab", "Next / previous section"),
            ("s / x", "Start / stop the bot"),
            ("u", "Undo the latest removal or deletion"),
            ("Esc", "Dismiss notifications"),
            ("y", "Copy logs to clipboard"),
            ("E", "Export logs to a file"),
            ("t", "Switch dark / light theme"),
            ("`", "Developer console"),
            ("?", "This help"),
            ("q", "Quit (pending edits are saved)"),
        ],
    ),
    (
        "Configs",
        &[
            ("Enter", "Switch to the selected config"),
            ("n", "New config"),
            ("r", "Rename"),
            ("d", "Delete (undo available for a few seconds)"),
            ("e / i", "Export / import"),
        ],
    ),
    (
        "Settings",
        &[
            ("Enter", "Edit field or flip toggle"),
            ("Left / Right", "Change send mode"),
        ],
    ),
    (
        "Messages, Send times",
        &[("a", "Add"), ("d / Delete", "Remove (undo available)")],
    ),
    ("Stats", &[("R", "Reset message statistics")]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_message_prompts_take_line_breaks() {
        let Modal::Prompt(prompt) = Modal::prompt(PromptKind::AddMessage, "") else {
            panic!("not a prompt");
        };
        assert!(prompt.input.is_multiline());

        let Modal::Prompt(prompt) = Modal::prompt(PromptKind::AddTime, "09:") else {
            panic!("not a prompt");
        };
        assert!(!prompt.input.is_multiline());
        assert_eq!(prompt.input.text(), "09:");
    }
}
