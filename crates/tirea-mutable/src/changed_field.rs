//! Change records produced by analysis and by `set_value`.
//!
//! A [`ChangedField`] is either a *leaf* change (old and new value) or a
//! *composite* change whose `nested_fields` describe changes inside a
//! deep-tracked member. [`ChangedFields`] maps structural field names to
//! their change record and serializes to JSON:
//!
//! ```text
//! {"field_a": {"old_value": "one", "new_value": "two"},
//!  "field_e": {"old_value": null, "new_value": null,
//!              "nested_fields": {"field_a": {"old_value": "white", "new_value": "green"}}}}
//! ```

use crate::MutableResult;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// One detected change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangedField {
    /// Structural (declared) field name. Never serialized; restored from the
    /// map key on deserialization.
    #[serde(skip)]
    pub name: String,
    /// Value at the last checkpoint.
    pub old_value: Value,
    /// Current value.
    pub new_value: Value,
    /// Changes inside a deep-tracked member.
    #[serde(default, skip_serializing_if = "ChangedFields::is_empty")]
    pub nested_fields: ChangedFields,
}

impl ChangedField {
    /// Create a leaf change.
    pub fn leaf(name: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            name: name.into(),
            old_value,
            new_value,
            nested_fields: ChangedFields::new(),
        }
    }

    /// Create a composite change. Old and new values stay null.
    pub fn composite(name: impl Into<String>, nested_fields: ChangedFields) -> Self {
        Self {
            name: name.into(),
            old_value: Value::Null,
            new_value: Value::Null,
            nested_fields,
        }
    }

    /// True if this change describes nested member changes.
    #[inline]
    pub fn is_composite(&self) -> bool {
        !self.nested_fields.is_empty()
    }
}

/// Mapping from structural field name to its change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangedFields(BTreeMap<String, ChangedField>);

/// Output style for [`ChangedFields::to_json`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// No extraneous whitespace.
    #[default]
    Compact,
    /// Tab-indented, one entry per line.
    Pretty,
}

impl ChangedFields {
    /// Create an empty set.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Reports whether a change for `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Names of all changed fields.
    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    /// Look up the change for `name`.
    pub fn get(&self, name: &str) -> Option<&ChangedField> {
        self.0.get(name)
    }

    /// Insert a change keyed by its own name, replacing any previous entry.
    pub fn insert(&mut self, field: ChangedField) -> Option<ChangedField> {
        self.0.insert(field.name.clone(), field)
    }

    /// Remove the change for `name`.
    pub fn remove(&mut self, name: &str) -> Option<ChangedField> {
        self.0.remove(name)
    }

    /// Merge every entry of `other`, overwriting entries with the same name.
    pub fn merge(&mut self, other: &ChangedFields) {
        for (name, field) in &other.0 {
            self.0.insert(name.clone(), field.clone());
        }
    }

    /// Record an assignment of `name` from `old_value` to `new_value`.
    ///
    /// A repeated assignment keeps the first recorded old value. Assigning the
    /// old value back removes the entry.
    pub fn record(&mut self, name: &str, old_value: Value, new_value: Value) {
        let old_value = match self.0.remove(name) {
            Some(prev) if !prev.is_composite() => prev.old_value,
            _ => old_value,
        };
        if old_value != new_value {
            self.insert(ChangedField::leaf(name, old_value, new_value));
        }
    }

    /// Record a leaf or composite change with the rules of [`record`].
    ///
    /// A composite change is folded into the existing composite entry of the
    /// same name, one nested level at a time.
    ///
    /// [`record`]: ChangedFields::record
    pub fn record_change(&mut self, change: ChangedField) {
        if !change.is_composite() {
            self.record(&change.name, change.old_value, change.new_value);
            return;
        }
        let mut nested = match self.0.remove(&change.name) {
            Some(prev) if prev.is_composite() => prev.nested_fields,
            _ => ChangedFields::new(),
        };
        for (_, inner) in change.nested_fields.0 {
            nested.record_change(inner);
        }
        if !nested.is_empty() {
            self.insert(ChangedField::composite(change.name, nested));
        }
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate over `(name, change)` pairs in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ChangedField> {
        self.0.iter()
    }

    /// Serialize to JSON.
    pub fn to_json(&self, style: JsonStyle) -> MutableResult<String> {
        match style {
            JsonStyle::Compact => Ok(serde_json::to_string(self)?),
            JsonStyle::Pretty => {
                let mut buf = Vec::new();
                let mut ser = serde_json::Serializer::with_formatter(
                    &mut buf,
                    PrettyFormatter::with_indent(b"\t"),
                );
                self.serialize(&mut ser)?;
                // serde_json only emits valid UTF-8
                Ok(String::from_utf8_lossy(&buf).into_owned())
            }
        }
    }
}

impl Serialize for ChangedFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChangedFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = BTreeMap::<String, ChangedField>::deserialize(deserializer)?;
        for (name, field) in map.iter_mut() {
            field.name = name.clone();
        }
        Ok(Self(map))
    }
}

impl fmt::Display for ChangedFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = self.to_json(JsonStyle::Pretty).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl<'a> IntoIterator for &'a ChangedFields {
    type Item = (&'a String, &'a ChangedField);
    type IntoIter = btree_map::Iter<'a, String, ChangedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<ChangedField> for ChangedFields {
    fn from_iter<I: IntoIterator<Item = ChangedField>>(iter: I) -> Self {
        let mut fields = ChangedFields::new();
        for field in iter {
            fields.insert(field);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ChangedFields {
        let nested: ChangedFields = [
            ChangedField::leaf("field_a", json!("tree"), json!("stone")),
            ChangedField::leaf("field_b", Value::Null, json!([1, 2])),
        ]
        .into_iter()
        .collect();

        [
            ChangedField::leaf("field_a", json!("one"), json!("two")),
            ChangedField::leaf("field_b", Value::Null, Value::Null),
            ChangedField::composite("field_c", nested),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_contains_and_keys() {
        let cf = sample();
        assert!(cf.contains("field_a"));
        assert!(!cf.contains("field_d"));
        assert_eq!(cf.keys(), vec!["field_a", "field_b", "field_c"]);
    }

    #[test]
    fn test_get() {
        let cf = sample();
        assert_eq!(
            cf.get("field_a"),
            Some(&ChangedField::leaf("field_a", json!("one"), json!("two")))
        );
        assert!(cf.get("field_c").unwrap().is_composite());
        assert!(cf.get("missing").is_none());
    }

    #[test]
    fn test_compact_json_omits_name_and_empty_nested() {
        let cf = sample();
        let text = cf.to_json(JsonStyle::Compact).unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains("\"name\""));

        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value["field_a"],
            json!({"old_value": "one", "new_value": "two"})
        );
        assert!(value["field_b"].get("nested_fields").is_none());
        assert_eq!(
            value["field_c"]["nested_fields"]["field_a"]["new_value"],
            "stone"
        );
    }

    #[test]
    fn test_pretty_json_is_valid() {
        let cf = sample();
        let text = cf.to_json(JsonStyle::Pretty).unwrap();
        assert!(text.contains("\n\t\""));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 3);
        assert_eq!(cf.to_string(), text);
    }

    #[test]
    fn test_deserialize_restores_names() {
        let cf = sample();
        let text = cf.to_json(JsonStyle::Compact).unwrap();
        let parsed: ChangedFields = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, cf);
        assert_eq!(
            parsed.get("field_c").unwrap().nested_fields.get("field_a").unwrap().name,
            "field_a"
        );
    }

    #[test]
    fn test_merge_overwrites() {
        let mut cf = sample();
        let update: ChangedFields = [ChangedField::leaf("field_a", json!("one"), json!("three"))]
            .into_iter()
            .collect();
        cf.merge(&update);
        assert_eq!(cf.len(), 3);
        assert_eq!(cf.get("field_a").unwrap().new_value, json!("three"));
    }

    #[test]
    fn test_record_keeps_first_old_value() {
        let mut cf = ChangedFields::new();
        cf.record("count", json!(1), json!(2));
        cf.record("count", json!(2), json!(5));
        assert_eq!(
            cf.get("count"),
            Some(&ChangedField::leaf("count", json!(1), json!(5)))
        );

        cf.record("count", json!(5), json!(1));
        assert!(cf.is_empty());
    }

    #[test]
    fn test_record_change_folds_nested_levels() {
        let nested = |old: Value, new: Value| {
            ChangedField::composite(
                "origin",
                [ChangedField::leaf("x", old, new)].into_iter().collect(),
            )
        };

        let mut cf = ChangedFields::new();
        cf.record_change(nested(json!(0), json!(5)));
        cf.record_change(nested(json!(5), json!(9)));

        let x = cf.get("origin").unwrap().nested_fields.get("x").unwrap();
        assert_eq!(x.old_value, json!(0));
        assert_eq!(x.new_value, json!(9));

        cf.record_change(nested(json!(9), json!(0)));
        assert!(cf.is_empty());
    }
}
