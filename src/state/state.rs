use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_set;
use std::collections::BTreeSet;

/// The single shared mapping of named values driving all bound views.
///
/// Views never mutate it directly; every change arrives as a [`Partial`]
/// merged by the store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalState(Map<String, Value>);

impl GlobalState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Look up a single entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate the keys currently present.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Copy out the entries named by `keys`. Keys absent from the state are
    /// left out of the slice.
    pub fn slice(&self, keys: &KeySet) -> Slice {
        let entries = keys
            .iter()
            .filter_map(|key| self.0.get(key).map(|v| (key.to_string(), v.clone())))
            .collect();
        Slice(entries)
    }

    /// Shallow-merge `partial` into the state and report which keys now hold
    /// a different value than before.
    ///
    /// Every key in `partial` overwrites, but only keys whose value actually
    /// changed (or which did not exist) show up in the returned set.
    pub fn merge(&mut self, partial: Partial) -> KeySet {
        let mut changed = KeySet::new();
        for (key, value) in partial.0 {
            if self.0.get(&key) != Some(&value) {
                changed.insert(key.clone());
            }
            self.0.insert(key, value);
        }
        changed
    }
}

impl From<Map<String, Value>> for GlobalState {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for GlobalState {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::NotAnObject(other.to_string())),
        }
    }
}

/// A partial state update produced by an action.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Partial(Map<String, Value>);

impl Partial {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Add an entry, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Keys touched by this update, whether or not their value changes.
    pub fn keys(&self) -> KeySet {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Partial {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Partial {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(Error::NotAnObject(other.to_string())),
        }
    }
}

/// An ordered set of state keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeySet(BTreeSet<String>);

impl KeySet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// True when at least one key is in both sets.
    pub fn intersects(&self, other: &KeySet) -> bool {
        // Walk the smaller set.
        let (small, large) = if self.0.len() <= other.0.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.0.iter().any(|key| large.0.contains(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for KeySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

impl FromIterator<String> for KeySet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for KeySet {
    type Item = String;
    type IntoIter = btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The subset of [`GlobalState`] a bound component watches.
///
/// Equality is shallow over the selected entries, which is what decides
/// whether a bound component renders again.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slice(Map<String, Value>);

impl Slice {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: Value) -> GlobalState {
        GlobalState::try_from(value).unwrap()
    }

    #[test]
    fn merge_overwrites_and_reports_changes() {
        let mut s = state(json!({ "count": 0, "name": "a" }));

        let changed = s.merge(Partial::new().with("count", 1).with("name", "a"));

        assert_eq!(s.get("count"), Some(&json!(1)));
        assert!(changed.contains("count"));
        assert!(!changed.contains("name"));
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn merge_reports_new_keys() {
        let mut s = GlobalState::new();
        let changed = s.merge(Partial::new().with("flag", true));

        assert!(changed.contains("flag"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn later_keys_win() {
        let mut s = state(json!({ "count": 0 }));
        s.merge(Partial::new().with("count", 5));
        s.merge(Partial::new().with("count", 3));

        assert_eq!(s, state(json!({ "count": 3 })));
    }

    #[test]
    fn slice_skips_missing_keys() {
        let s = state(json!({ "count": 2, "other": "x" }));
        let keys: KeySet = ["count", "absent"].into_iter().collect();

        let slice = s.slice(&keys);

        assert_eq!(slice.len(), 1);
        assert_eq!(slice.get("count"), Some(&json!(2)));
    }

    #[test]
    fn keyset_intersection() {
        let a: KeySet = ["count", "name"].into_iter().collect();
        let b: KeySet = ["name"].into_iter().collect();
        let c: KeySet = ["other"].into_iter().collect();

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(!KeySet::new().intersects(&a));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = Partial::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::NotAnObject(_)));
    }
}
