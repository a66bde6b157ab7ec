//! Ordered key/value collections used for headers, query parameters, form
//! fields and cookies.
//!
//! Every entry carries an `enabled` switch so an editor can soft-delete an
//! entry without losing it. Disabled entries stay in the model and are
//! skipped by the code generators.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// How a repeated key is resolved when inserted into a [`ParamList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DuplicateKeys {
    /// The later value replaces the earlier one, keeping the earlier position.
    #[default]
    LastWins,
    /// The first value is kept and later ones are dropped.
    FirstWins,
    /// Every occurrence is kept as its own entry.
    KeepAll,
}

/// A single key/value entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    /// Absent means disabled.
    #[serde(default)]
    pub enabled: bool,
}

impl Param {
    /// Creates an enabled entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a disabled entry.
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }
}

/// Insertion-ordered list of [`Param`] entries.
///
/// Serializes as a JSON array of `{key, value, enabled}` objects. Deserializes
/// from that array or from a plain `{name: value}` object, whose entries are
/// all enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamList(Vec<Param>);

impl ParamList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Inserts an enabled entry with last-write-wins semantics.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert_with(key, value, DuplicateKeys::LastWins);
    }

    /// Inserts an enabled entry, resolving a repeated key with `policy`.
    ///
    /// Keys are compared exactly; `X-Token` and `x-token` are distinct.
    pub fn insert_with(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        policy: DuplicateKeys,
    ) {
        let key = key.into();
        let value = value.into();

        if policy != DuplicateKeys::KeepAll {
            if let Some(existing) = self.0.iter_mut().find(|p| p.key == key) {
                if policy == DuplicateKeys::LastWins {
                    existing.value = value;
                    existing.enabled = true;
                }
                return;
            }
        }

        self.0.push(Param::new(key, value));
    }

    /// Appends an entry as-is, without duplicate handling.
    pub fn push(&mut self, param: Param) {
        self.0.push(param);
    }

    /// Returns the value of the last entry with exactly this key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    /// Returns the value of the last enabled entry whose key matches ignoring
    /// ASCII case.
    pub fn get_ignore_case(&self, key: &str) -> Option<&str> {
        self.enabled()
            .filter(|p| p.key.eq_ignore_ascii_case(key))
            .last()
            .map(|p| p.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|p| p.key == key)
    }

    /// Removes every entry with exactly this key, returning how many were removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|p| p.key != key);
        before - self.0.len()
    }

    /// Enables or disables every entry with exactly this key.
    pub fn set_enabled(&mut self, key: &str, enabled: bool) {
        for param in self.0.iter_mut().filter(|p| p.key == key) {
            param.enabled = enabled;
        }
    }

    /// Iterates over enabled entries only.
    pub fn enabled(&self) -> impl Iterator<Item = &Param> {
        self.0.iter().filter(|p| p.enabled)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Param> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = ParamList::new();
        for (key, value) in iter {
            list.insert(key, value);
        }
        list
    }
}

impl<'a> IntoIterator for &'a ParamList {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParamListRepr {
    List(Vec<Param>),
    Map(IndexMap<String, Value>),
}

impl<'de> Deserialize<'de> for ParamList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match ParamListRepr::deserialize(deserializer)? {
            ParamListRepr::List(params) => ParamList(params),
            ParamListRepr::Map(map) => map
                .into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s,
                        Value::Null => String::new(),
                        other => other.to_string(),
                    };
                    (key, value)
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_last_write_wins_keeps_position() {
        let mut list = ParamList::new();
        list.insert("A", "1");
        list.insert("B", "2");
        list.insert("A", "3");

        assert_eq!(list.len(), 2);
        assert_eq!(list.iter().next().unwrap().key, "A");
        assert_eq!(list.get("A"), Some("3"));
    }

    #[test]
    fn test_insert_first_wins() {
        let mut list = ParamList::new();
        list.insert_with("A", "1", DuplicateKeys::FirstWins);
        list.insert_with("A", "2", DuplicateKeys::FirstWins);

        assert_eq!(list.len(), 1);
        assert_eq!(list.get("A"), Some("1"));
    }

    #[test]
    fn test_insert_keep_all() {
        let mut list = ParamList::new();
        list.insert_with("A", "1", DuplicateKeys::KeepAll);
        list.insert_with("A", "2", DuplicateKeys::KeepAll);

        assert_eq!(list.len(), 2);
        assert_eq!(list.get("A"), Some("2"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut list = ParamList::new();
        list.insert("X-Token", "1");
        list.insert("x-token", "2");

        assert_eq!(list.len(), 2);
        assert_eq!(list.get_ignore_case("X-TOKEN"), Some("2"));
    }

    #[test]
    fn test_enabled_filters_disabled_entries() {
        let mut list = ParamList::new();
        list.insert("A", "1");
        list.push(Param::disabled("B", "2"));

        let keys: Vec<&str> = list.enabled().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["A"]);
    }

    #[test]
    fn test_deserialize_from_map() {
        let list: ParamList =
            serde_json::from_str(r#"{"Accept": "application/json", "X-Count": 3}"#).unwrap();

        assert_eq!(list.get("Accept"), Some("application/json"));
        assert_eq!(list.get("X-Count"), Some("3"));
        assert!(list.iter().all(|p| p.enabled));
    }

    #[test]
    fn test_deserialize_from_list_defaults_to_disabled() {
        let list: ParamList =
            serde_json::from_str(r#"[{"key": "A", "value": "1", "enabled": true}, {"key": "B"}]"#)
                .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list.enabled().count(), 1);
        assert_eq!(list.get("B"), Some(""));
    }
}
