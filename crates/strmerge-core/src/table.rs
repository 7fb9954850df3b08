//! Core table types for representing .strings data

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One localized string record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Translation identifier
    pub key: String,
    /// Translated text, escapes left as written
    pub value: String,
    /// Raw comment lines preceding the entry, without line terminators
    pub comments: Vec<String>,
}

impl Entry {
    /// Create a new entry
    pub fn new(key: impl Into<String>, value: impl Into<String>, comments: Vec<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            comments,
        }
    }

    /// The `"key" = "value";` line for this entry
    pub fn translation_line(&self) -> String {
        format!("\"{}\" = \"{}\";", self.key, self.value)
    }
}

/// An ordered string table with a by-key index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    entries: Vec<Entry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Table {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry.
    ///
    /// A new key is appended. An existing key is replaced in place, keeping
    /// its position, and the previous entry is returned.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        match self.index.get(&entry.key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], entry)),
            None => {
                self.index.insert(entry.key.clone(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).map(|&pos| &self.entries[pos])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Entries in table order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Keys in table order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Entry> for Table {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut table = Table::new();
        for entry in iter {
            table.insert(entry);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, value: &str) -> Entry {
        Entry::new(key, value, vec![format!("/* {} */", key)])
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = Table::new();
        assert!(table.insert(entry("A", "a")).is_none());
        assert!(table.insert(entry("B", "b")).is_none());

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("A").unwrap().value, "a");
        assert_eq!(table.get("B").unwrap().value, "b");
        assert!(table.get("C").is_none());
    }

    #[test]
    fn test_insert_existing_key_replaces_in_place() {
        let mut table: Table = vec![entry("A", "a"), entry("B", "b")].into_iter().collect();

        let previous = table.insert(entry("A", "a2")).unwrap();

        assert_eq!(previous.value, "a");
        assert_eq!(table.len(), 2);
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(table.get("A").unwrap().value, "a2");
    }

    #[test]
    fn test_translation_line() {
        let e = Entry::new("GREETING", "Hello", Vec::new());
        assert_eq!(e.translation_line(), "\"GREETING\" = \"Hello\";");
    }

    #[test]
    fn test_serialize_skips_index() {
        let table: Table = vec![entry("A", "a")].into_iter().collect();
        let json = serde_json::to_value(&table).unwrap();

        assert!(json.get("index").is_none());
        assert_eq!(json["entries"][0]["key"], "A");
        assert_eq!(json["entries"][0]["comments"][0], "/* A */");
    }
}
