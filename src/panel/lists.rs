//! Ordered, duplicate-free value lists (message templates, send times)
//!
//! Removal hands back a [`Removal`] receipt so the caller can offer an undo.
//! Undo is positional: the value goes back to the index it was removed from
//! (clamped to the current length), so an unrelated removal in between can
//! shift where it lands.

use chrono::NaiveTime;

/// Ordering discipline of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Keep insertion order
    Insertion,
    /// Keep ascending order after every mutation
    Sorted,
}

/// What `remove` took out, and from where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub index: usize,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueList {
    items: Vec<String>,
    order: ListOrder,
}

impl UniqueList {
    pub fn new(order: ListOrder) -> Self {
        Self {
            items: Vec::new(),
            order,
        }
    }

    /// Build from loaded values, dropping duplicates (first occurrence wins)
    pub fn from_values(order: ListOrder, values: impl IntoIterator<Item = String>) -> Self {
        let mut list = Self::new(order);
        for value in values {
            if !list.items.contains(&value) {
                list.items.push(value);
            }
        }
        list.normalize();
        list
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn into_items(self) -> Vec<String> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|v| v == value)
    }

    /// Insert a value that the caller already cleaned up. Empty and
    /// duplicate values are ignored. Returns true if the list changed.
    pub fn add(&mut self, value: String) -> bool {
        if value.is_empty() || self.contains(&value) {
            return false;
        }
        self.items.push(value);
        self.normalize();
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Removal> {
        if index >= self.items.len() {
            return None;
        }
        let value = self.items.remove(index);
        Some(Removal { index, value })
    }

    /// Put a removed value back at its old position. A value that was
    /// re-added in the meantime is not duplicated.
    pub fn restore(&mut self, removal: &Removal) -> bool {
        if self.contains(&removal.value) {
            return false;
        }
        let index = removal.index.min(self.items.len());
        self.items.insert(index, removal.value.clone());
        self.normalize();
        true
    }

    fn normalize(&mut self) {
        if self.order == ListOrder::Sorted {
            // "HH:MM" sorts lexicographically in chronological order
            self.items.sort();
        }
    }
}

/// Clean up a message template: surrounding whitespace goes, inner line
/// breaks stay
pub fn clean_message(input: &str) -> String {
    input.trim().to_string()
}

/// Accept `HH:MM` (24h) only; anything else is not a send time
pub fn clean_time(input: &str) -> Option<String> {
    let input = input.trim();
    if input.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(input, "%H:%M")
        .ok()
        .map(|t| t.format("%H:%M").to_string())
}
