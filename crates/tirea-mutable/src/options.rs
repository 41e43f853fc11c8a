//! Path resolution options for `set_value`.

use serde::{Deserialize, Serialize};

/// Default separator between nested external names (`car/engine/price`).
pub const DEFAULT_SEPARATOR: char = '/';

/// Options controlling how `set_value` resolves external paths.
///
/// Deserializable so applications can embed it in their own configuration;
/// missing keys fall back to the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetOptions {
    /// Separator joining a parent's external name with its child's.
    pub separator: char,
}

impl SetOptions {
    /// Options with the default `/` separator.
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }

    /// Use a different separator.
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Join a path prefix and a member's external name.
    pub fn join(&self, prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            return name.to_owned();
        }
        let mut joined = String::with_capacity(prefix.len() + name.len() + 1);
        joined.push_str(prefix);
        joined.push(self.separator);
        joined.push_str(name);
        joined
    }

    /// True if `path` addresses something strictly below `prefix`.
    pub fn is_below(&self, path: &str, prefix: &str) -> bool {
        path.strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix(self.separator))
            .is_some_and(|rest| !rest.is_empty())
    }
}

impl Default for SetOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        let opts = SetOptions::new();
        assert_eq!(opts.join("", "field_a"), "field_a");
        assert_eq!(opts.join("car/engine", "price"), "car/engine/price");
        assert_eq!(
            opts.with_separator('.').join("car", "engine"),
            "car.engine"
        );
    }

    #[test]
    fn test_is_below() {
        let opts = SetOptions::new();
        assert!(opts.is_below("car/engine", "car"));
        assert!(!opts.is_below("car", "car"));
        assert!(!opts.is_below("carpet/x", "car"));
        assert!(!opts.is_below("car/", "car"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let opts: SetOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, SetOptions::default());

        let opts: SetOptions = serde_json::from_str(r#"{"separator": "."}"#).unwrap();
        assert_eq!(opts.separator, '.');
    }
}
