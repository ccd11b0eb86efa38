//! Insertion-ordered key/value list and deduplicated item list
//!
//! Keys and items are plain JSON values, so any JSON-comparable key works
//! (`123` and `"123"` are different keys). Equality is strict JSON equality.

use serde_json::Value as JsonValue;

/// Insertion-ordered key/value pairs with non-string keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedMap {
    entries: Vec<(JsonValue, JsonValue)>,
}

impl OrderedMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build by applying `set` to each pair in order
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (JsonValue, JsonValue)>,
    {
        let mut map = Self::new();
        for (key, value) in entries {
            map.set(key, value);
        }
        map
    }

    /// Replace the value of an existing key in place, or append
    pub fn set(&mut self, key: impl Into<JsonValue>, value: impl Into<JsonValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value stored under `key`
    pub fn get(&self, key: &JsonValue) -> Option<&JsonValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Whether `key` is present
    pub fn has(&self, key: &JsonValue) -> bool {
        self.get(key).is_some()
    }

    /// Remove the first pair with `key`; returns whether one was removed
    pub fn delete(&mut self, key: &JsonValue) -> bool {
        match self.entries.iter().position(|(k, _)| k == key) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Number of pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no pairs
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(JsonValue, JsonValue)> {
        self.entries.iter()
    }

    /// Pairs in insertion order
    pub fn entries(&self) -> &[(JsonValue, JsonValue)] {
        &self.entries
    }
}

/// List of unique items in order of first occurrence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniqueSet {
    items: Vec<JsonValue>,
}

impl UniqueSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item unless already present; returns whether it was inserted
    pub fn add(&mut self, item: impl Into<JsonValue>) -> bool {
        let item = item.into();
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Add every item in order
    pub fn add_all<I, T>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<JsonValue>,
    {
        for item in items {
            self.add(item);
        }
    }

    /// Whether `item` is present
    pub fn has(&self, item: &JsonValue) -> bool {
        self.items.contains(item)
    }

    /// Remove `item`, compacting the list; returns whether it was present
    pub fn remove(&mut self, item: &JsonValue) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in order of first occurrence
    pub fn iter(&self) -> impl Iterator<Item = &JsonValue> {
        self.items.iter()
    }

    /// Items in order of first occurrence
    pub fn items(&self) -> &[JsonValue] {
        &self.items
    }
}

impl<T: Into<JsonValue>> FromIterator<T> for UniqueSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = UniqueSet::new();
        set.add_all(iter);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_upserts_in_place() {
        let mut map = OrderedMap::new();
        map.set("theme", "dark");
        map.set(123, "numeric key");
        map.set("theme", "light");

        assert_eq!(map.len(), 2);
        assert_eq!(map.entries()[0], (json!("theme"), json!("light")));
        assert_eq!(map.get(&json!(123)), Some(&json!("numeric key")));
        assert_eq!(map.get(&json!("123")), None);
    }

    #[test]
    fn delete_removes_first_match() {
        let mut map =
            OrderedMap::from_entries([(json!("a"), json!(1)), (json!("b"), json!(2))]);
        assert!(map.delete(&json!("a")));
        assert!(!map.delete(&json!("a")));
        assert!(!map.has(&json!("a")));
        assert_eq!(map.entries(), &[(json!("b"), json!(2))]);
    }

    #[test]
    fn add_all_deduplicates_in_first_occurrence_order() {
        let mut set = UniqueSet::new();
        set.add_all(["apple", "banana", "apple", "cherry"]);

        assert_eq!(set.len(), 3);
        assert_eq!(set.items(), &[json!("apple"), json!("banana"), json!("cherry")]);
        assert!(!set.add("banana"));
    }

    #[test]
    fn equality_is_strict() {
        let set: UniqueSet = [json!(1), json!("1"), json!(1.0), json!(1)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn remove_compacts() {
        let mut set: UniqueSet = ["a", "b", "c"].into_iter().collect();
        assert!(set.remove(&json!("b")));
        assert_eq!(set.items(), &[json!("a"), json!("c")]);
        assert!(!set.remove(&json!("zzz")));
    }
}
