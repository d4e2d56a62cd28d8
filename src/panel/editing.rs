//! Form edits: text fields, toggles, mode selection and the value lists.
//!
//! Every edit that changes something restarts the autosave quiet period.

use super::lists::{clean_message, clean_time, ListOrder, Removal, UniqueList};
use super::settings::{Mode, Settings, SettingsField};
use super::toast::{ToastId, UndoAction};
use super::{ListKind, Panel};

/// Characters of a removed message quoted in its undo toast
const REMOVED_PREVIEW_CHARS: usize = 30;

impl Panel {
    /// Apply input text to a field. Returns true if the value changed.
    pub fn edit_field(&self, field: SettingsField, text: &str) -> bool {
        let changed = self.write(|s| s.settings.set_field(field, text));
        if changed {
            self.schedule_autosave();
        }
        changed
    }

    /// Select a send mode; only an actual change is saved
    pub fn set_mode(&self, mode: Mode) -> bool {
        let changed = self.write(|s| {
            let changed = s.settings.mode != mode;
            s.settings.mode = mode;
            changed
        });
        if changed {
            self.schedule_autosave();
        }
        changed
    }

    pub fn cycle_mode(&self, forward: bool) -> Mode {
        let current = self.read(|s| s.settings.mode);
        let next = if forward { current.next() } else { current.prev() };
        self.set_mode(next);
        next
    }

    /// Flip the delay toggle, returning the new value
    pub fn toggle_delay(&self) -> bool {
        let enabled = self.write(|s| {
            s.settings.delay_enabled = !s.settings.delay_enabled;
            s.settings.delay_enabled
        });
        self.schedule_autosave();
        enabled
    }

    pub fn toggle_dry_run(&self) -> bool {
        let enabled = self.write(|s| {
            s.settings.dry_run = !s.settings.dry_run;
            s.settings.dry_run
        });
        self.schedule_autosave();
        enabled
    }

    /// Add a message template. Blank and duplicate input is ignored.
    pub fn add_message(&self, input: &str) -> bool {
        self.add_item(ListKind::Messages, clean_message(input))
    }

    /// Add a `HH:MM` send time. Malformed and duplicate input is ignored.
    pub fn add_time(&self, input: &str) -> bool {
        match clean_time(input) {
            Some(time) => self.add_item(ListKind::SendTimes, time),
            None => {
                tracing::debug!("Ignoring malformed send time {:?}", input);
                false
            }
        }
    }

    fn add_item(&self, kind: ListKind, value: String) -> bool {
        let added = self.write(|s| with_list(&mut s.settings, kind, |list| list.add(value)));
        if added {
            self.schedule_autosave();
        }
        added
    }

    /// Remove the entry at `index` and offer an undo toast
    pub fn remove_item(&self, kind: ListKind, index: usize) -> Option<ToastId> {
        let (removal, profile) = self.write(|s| {
            let removal = with_list(&mut s.settings, kind, |list| list.remove(index))?;
            Some((removal, s.active_id.clone()))
        })?;
        self.schedule_autosave();

        let message = removal_message(kind, &removal.value);
        let action = match kind {
            ListKind::Messages => UndoAction::RestoreMessage { profile, removal },
            ListKind::SendTimes => UndoAction::RestoreTime { profile, removal },
        };
        Some(self.offer_undo(message, action))
    }

    pub(crate) fn restore_item(&self, kind: ListKind, removal: &Removal) -> bool {
        let restored =
            self.write(|s| with_list(&mut s.settings, kind, |list| list.restore(removal)));
        if restored {
            self.schedule_autosave();
        }
        restored
    }
}

/// Borrow one of the settings' lists as a `UniqueList` for the duration of `f`
fn with_list<R>(
    settings: &mut Settings,
    kind: ListKind,
    f: impl FnOnce(&mut UniqueList) -> R,
) -> R {
    let (values, order) = match kind {
        ListKind::Messages => (&mut settings.messages, ListOrder::Insertion),
        ListKind::SendTimes => (&mut settings.send_times, ListOrder::Sorted),
    };
    let mut list = UniqueList::from_values(order, std::mem::take(values));
    let result = f(&mut list);
    *values = list.into_items();
    result
}

fn removal_message(kind: ListKind, value: &str) -> String {
    match kind {
        ListKind::SendTimes => format!("Time removed: {}", value),
        ListKind::Messages => {
            let preview = if value.chars().count() > REMOVED_PREVIEW_CHARS {
                let head: String = value.chars().take(REMOVED_PREVIEW_CHARS).collect();
                format!("{}...", head)
            } else {
                value.to_string()
            };
            format!("Message removed: \"{}\"", preview)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_messages_are_quoted_whole() {
        assert_eq!(
            removal_message(ListKind::Messages, "hello"),
            "Message removed: \"hello\""
        );
    }

    #[test]
    fn long_messages_are_cut_at_thirty_chars() {
        let long = "a".repeat(31);
        assert_eq!(
            removal_message(ListKind::Messages, &long),
            format!("Message removed: \"{}...\"", "a".repeat(30))
        );
    }

    #[test]
    fn time_removal_names_the_time() {
        assert_eq!(
            removal_message(ListKind::SendTimes, "09:00"),
            "Time removed: 09:00"
        );
    }
}
