//! Untyped values accepted by `set_value`.

use crate::SetFailure;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{type_name, Any};

/// A value of any type on its way into a typed field.
///
/// Coercion order: exact type match, then string or byte payloads parsed as a
/// JSON document, then a `serde_json::Value` decoded into the field type.
pub struct SetInput {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl SetInput {
    /// Wrap a value. String literals become `String`.
    pub fn new<V: Any>(value: V) -> Self {
        let value: Box<dyn Any> = Box::new(value);
        match value.downcast::<&'static str>() {
            Ok(text) => Self {
                value: Box::new(text.to_string()),
                type_name: type_name::<String>(),
            },
            Err(value) => Self {
                value,
                type_name: type_name::<V>(),
            },
        }
    }

    /// Runtime type name of the wrapped value.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Convert into the field type `T`.
    pub fn coerce<T: DeserializeOwned + 'static>(self) -> Result<T, SetFailure> {
        let found = self.type_name;
        let value = match self.value.downcast::<T>() {
            Ok(exact) => return Ok(*exact),
            Err(value) => value,
        };
        let value = match value.downcast::<String>() {
            Ok(text) => return parse_document(text.as_bytes()),
            Err(value) => value,
        };
        let value = match value.downcast::<Vec<u8>>() {
            Ok(bytes) => return parse_document(&bytes),
            Err(value) => value,
        };
        let value = match value.downcast::<&'static [u8]>() {
            Ok(bytes) => return parse_document(&bytes),
            Err(value) => value,
        };
        match value.downcast::<Value>() {
            Ok(doc) => serde_json::from_value(*doc).map_err(SetFailure::CannotParse),
            Err(_) => Err(SetFailure::UnsupportedType {
                expected: type_name::<T>(),
                found,
            }),
        }
    }
}

impl std::fmt::Debug for SetInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetInput")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Validate `bytes` as a JSON document, then decode it into `T`.
fn parse_document<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SetFailure> {
    let doc: Value = serde_json::from_slice(bytes).map_err(SetFailure::NotJson)?;
    serde_json::from_value(doc).map_err(SetFailure::CannotParse)
}
