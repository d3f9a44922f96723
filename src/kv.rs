// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Key-value fields attached to log records.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

/// The value type of a field.
pub use serde_json::Value;

/// Keys owned by the record metadata. Structured output always renders the metadata under
/// these keys, so fields with the same key are dropped.
pub const RESERVED_KEYS: [&str; 4] = ["message", "time", "level", "name"];

/// Whether `key` is one of the [`RESERVED_KEYS`].
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// A key-ordered set of contextual fields.
///
/// ```
/// use gogo::kv::Fields;
///
/// let fields = Fields::from_iter([("connid", "1234")]);
/// assert_eq!(fields.get("connid").unwrap(), "1234");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builder style [`Fields::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Overlay `other` on top of `self`; keys present in both take the value from `other`.
    pub fn extend(&mut self, other: &Fields) {
        for (k, v) in other.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Remove every field whose key is reserved for record metadata.
    pub fn without_reserved(mut self) -> Self {
        self.0.retain(|k, _| !is_reserved(k));
        self
    }

    /// Merge bound fields with the fields of a single call.
    ///
    /// Per-call fields override bound fields; reserved keys are dropped from both.
    pub fn merge(bound: &Fields, per_call: &Fields) -> Fields {
        let mut merged = bound.clone();
        merged.extend(per_call);
        merged.without_reserved()
    }

    /// Render a field value the way a text layout prints it: strings without quotes,
    /// everything else as JSON.
    pub fn display_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_per_call_wins_and_reserved_dropped() {
        let bound = Fields::from_iter([("connid", "1234"), ("user", "fred")]);
        let per_call = Fields::new()
            .with("user", "barney")
            .with("message", "spoofed")
            .with("attempt", 3);

        let merged = Fields::merge(&bound, &per_call);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("connid").unwrap(), "1234");
        assert_eq!(merged.get("user").unwrap(), "barney");
        assert_eq!(merged.get("attempt").unwrap(), 3);
        assert!(!merged.contains_key("message"));
    }

    #[test]
    fn test_keys_are_ordered() {
        let fields = Fields::from_iter([("b", 1), ("a", 2), ("c", 3)]);
        let keys = fields.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(
            serde_json::to_string(&fields).unwrap(),
            r#"{"a":2,"b":1,"c":3}"#
        );
    }

    #[test]
    fn test_display_value() {
        assert_eq!(Fields::display_value(&Value::from("1.1.1.1")), "1.1.1.1");
        assert_eq!(Fields::display_value(&Value::from(true)), "true");
        assert_eq!(Fields::display_value(&Value::Null), "null");
    }
}
