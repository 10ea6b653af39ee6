//! An insertion-ordered attribute map.
//!
//! Tags carry at most a handful of attributes, so lookups are a linear scan
//! over a flat vector; this keeps insertion order for free, which matters to
//! consumers that rewrite markup in place.

use alloc::string::String;
use alloc::vec::Vec;

/// Attribute name to optional value, preserving insertion order.
///
/// A `None` value is a flag-style attribute (`<tag attr>`), distinct from an
/// empty value (`<tag attr="">`).
#[derive(Debug, Clone, Default)]
pub struct AttrMap {
    items: Vec<(String, Option<String>)>,
}

impl AttrMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|(k, _)| k == key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// The stored entry for `key`: `None` if absent, `Some(None)` for a
    /// flag attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.find(key)
            .map(|i| self.items[i].1.as_deref())
    }

    /// The value of `key`, if the key is present and carries one.
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    /// The value of `key`, or `default` when absent or valueless.
    #[must_use]
    pub fn value_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.value_of(key).unwrap_or(default)
    }

    /// Inserts a new key, failing when it is already present.
    ///
    /// # Errors
    ///
    /// Returns the rejected key so the caller can name it in a diagnostic.
    pub fn insert_unique(&mut self, key: String, value: Option<String>) -> Result<(), String> {
        if self.contains(&key) {
            return Err(key);
        }
        self.items.push((key, value));
        Ok(())
    }

    /// Inserts or overwrites, keeping the original position on overwrite.
    pub fn insert_or_assign(&mut self, key: String, value: Option<String>) {
        match self.find(&key) {
            Some(i) => self.items[i].1 = value,
            None => self.items.push((key, value)),
        }
    }

    /// Inserts only when the key is absent.
    pub fn insert_if_missing(&mut self, key: String, value: Option<String>) {
        if !self.contains(&key) {
            self.items.push((key, value));
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.find(key).map(|i| self.items.remove(i).1)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

// Equality ignores insertion order: two tags with the same attributes in a
// different order compare equal.
impl PartialEq for AttrMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && other
                .iter()
                .all(|(k, v)| self.get(k).is_some_and(|mine| mine == v))
    }
}

impl Eq for AttrMap {}

impl FromIterator<(String, Option<String>)> for AttrMap {
    fn from_iter<T: IntoIterator<Item = (String, Option<String>)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert_or_assign(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use alloc::borrow::ToOwned;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::*;

    fn render(map: &AttrMap) -> String {
        let parts: Vec<String> = map
            .iter()
            .map(|(k, v)| match v {
                Some(v) => alloc::format!("{k}={v}"),
                None => k.to_owned(),
            })
            .collect();
        parts.join(",")
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut map = AttrMap::new();
        map.insert_or_assign("key1".into(), Some("val1".into()));
        map.insert_if_missing("key2".into(), Some("old2".into()));
        map.insert_unique("key3".into(), None).unwrap();
        assert_eq!(render(&map), "key1=val1,key2=old2,key3");

        // Not modifying an already existing key.
        map.insert_if_missing("key2".into(), Some("val2".into()));
        assert_eq!(render(&map), "key1=val1,key2=old2,key3");

        // Overwriting keeps the position.
        map.insert_or_assign("key2".into(), Some("val2".into()));
        assert_eq!(render(&map), "key1=val1,key2=val2,key3");
    }

    #[test]
    fn insert_unique_rejects_duplicates() {
        let mut map = AttrMap::new();
        map.insert_unique("a".into(), None).unwrap();
        assert_eq!(map.insert_unique("a".into(), None), Err("a".to_owned()));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn lookups() {
        let mut map = AttrMap::new();
        map.insert_unique("id".into(), Some("x1".into())).unwrap();
        map.insert_unique("hidden".into(), None).unwrap();

        assert!(map.contains("id"));
        assert!(!map.contains("missing"));
        assert_eq!(map.get("id"), Some(Some("x1")));
        assert_eq!(map.get("hidden"), Some(None));
        assert_eq!(map.get("missing"), None);
        assert_eq!(map.value_of("id"), Some("x1"));
        assert_eq!(map.value_of("hidden"), None);
        assert_eq!(map.value_or("missing", "def"), "def");
        assert_eq!(map.value_or("id", "def"), "x1");
    }

    #[test]
    fn removal() {
        let mut map = AttrMap::new();
        map.insert_unique("a".into(), Some("1".into())).unwrap();
        map.insert_unique("b".into(), Some("2".into())).unwrap();
        assert_eq!(map.remove("a"), Some(Some("1".to_owned())));
        assert_eq!(map.remove("a"), None);
        assert_eq!(render(&map), "b=2");
        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn equality_ignores_order() {
        let ab: AttrMap = [
            ("a".to_owned(), Some("1".to_owned())),
            ("b".to_owned(), None),
        ]
        .into_iter()
        .collect();
        let ba: AttrMap = [
            ("b".to_owned(), None),
            ("a".to_owned(), Some("1".to_owned())),
        ]
        .into_iter()
        .collect();
        assert_eq!(ab, ba);

        let other: AttrMap = [("a".to_owned(), Some("2".to_owned()))].into_iter().collect();
        assert_ne!(ab, other);
    }
}
