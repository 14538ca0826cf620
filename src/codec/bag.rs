//! Databag containers
//!
//! A databag is a flat string -> string map. Callers own it; the codec
//! reads it on decode and, for the length of one encode call, mutates it
//! exclusively.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Owned databag produced by encoding. Sorted so output is deterministic.
pub type RawBag = BTreeMap<String, String>;

/// Access the codec needs on a caller-owned databag
pub trait Databag {
    /// Value stored under `key`
    fn lookup(&self, key: &str) -> Option<&str>;

    /// Store `value` under `key`, replacing any previous value
    fn store(&mut self, key: String, value: String);

    /// Remove every entry
    fn erase_all(&mut self);

    /// Number of entries
    fn entry_count(&self) -> usize;

    /// Sorted copy of every entry, for diagnostics
    fn snapshot(&self) -> RawBag;
}

impl Databag for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }

    fn store(&mut self, key: String, value: String) {
        self.insert(key, value);
    }

    fn erase_all(&mut self) {
        self.clear();
    }

    fn entry_count(&self) -> usize {
        self.len()
    }

    fn snapshot(&self) -> RawBag {
        self.clone()
    }
}

impl<S: BuildHasher> Databag for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }

    fn store(&mut self, key: String, value: String) {
        self.insert(key, value);
    }

    fn erase_all(&mut self) {
        self.clear();
    }

    fn entry_count(&self) -> usize {
        self.len()
    }

    fn snapshot(&self) -> RawBag {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }
}

/// Renders a bag as a single-line JSON object for messages and logs.
pub fn render(bag: &RawBag) -> String {
    serde_json::to_string(bag).unwrap_or_else(|_| format!("{:?}", bag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_snapshot_is_sorted() {
        let mut bag: HashMap<String, String> = HashMap::new();
        bag.store("zeta".into(), "1".into());
        bag.store("alpha".into(), "2".into());

        let snapshot = bag.snapshot();
        let keys: Vec<_> = snapshot.keys().cloned().collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_erase_all() {
        let mut bag = RawBag::new();
        bag.store("stale".into(), "\"x\"".into());
        assert_eq!(bag.entry_count(), 1);
        bag.erase_all();
        assert_eq!(bag.entry_count(), 0);
        assert_eq!(bag.lookup("stale"), None);
    }

    #[test]
    fn test_render() {
        let mut bag = RawBag::new();
        bag.insert("name".into(), "\"Alice\"".into());
        assert_eq!(render(&bag), r#"{"name":"\"Alice\""}"#);
    }
}
