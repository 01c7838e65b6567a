use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inclusion flags keyed by entity key. A missing key means "not selected".
///
/// Keys are not checked against any catalog: a key whose entity is gone is kept
/// but never matches anything during filtering. Equality compares the included
/// keys only, so an explicit `false` equals an absent key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    entries: BTreeMap<String, bool>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.entries.get(key).copied().unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.entries.get(key).copied()
    }

    /// Flips the flag for `key`; an absent key becomes `true`.
    pub fn toggle(mut self, key: &str) -> Self {
        self.toggle_in_place(key);
        self
    }

    pub fn toggle_in_place(&mut self, key: &str) {
        let next = !self.is_selected(key);
        self.entries.insert(key.to_string(), next);
    }

    pub fn set(&mut self, key: &str, included: bool) {
        self.entries.insert(key.to_string(), included);
    }

    /// Keys currently flagged `true`, in key order.
    pub fn included_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, included)| **included)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn included_count(&self) -> usize {
        self.entries.values().filter(|included| **included).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for SelectionSet {
    fn eq(&self, other: &Self) -> bool {
        let ours = self.entries.iter().filter(|(_, included)| **included);
        let theirs = other.entries.iter().filter(|(_, included)| **included);
        ours.map(|(key, _)| key).eq(theirs.map(|(key, _)| key))
    }
}

impl Eq for SelectionSet {}

impl FromIterator<(String, bool)> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
