//! Member shapes the tracking engine walks into.
//!
//! [`Composite`] covers struct-like members: a derived struct, `Box` of one,
//! `Option` of one (the nullable pointer) and [`Shared`](crate::Shared).
//! [`Collection`] covers `Vec`, `BTreeMap` and `HashMap` of composites; those
//! only take part in reset, never in deep analysis or path descent.

use crate::setter::Applied;
use crate::{ChangedField, MutableError, MutableResult, SetInput, SetOptions};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// A struct-like member.
///
/// Implemented by `#[derive(Mutable)]` for the struct itself and here for the
/// supported wrappers.
pub trait Composite {
    /// Reset every tracker reachable through this member.
    fn reset_nested(&mut self) -> MutableResult<()>;

    /// Deep-compare against the checkpoint's copy of this member.
    ///
    /// Returns a composite change named `name` when anything inside changed,
    /// or a leaf change when one side is null.
    fn analyze_deep(&mut self, name: &str, original: &Self) -> MutableResult<Option<ChangedField>>;

    /// Deep-analyze without an independent baseline.
    ///
    /// Used when the checkpoint and the live value are the same object (a
    /// shared pointee); only the member's own tracker can report changes.
    fn analyze_own(&mut self, name: &str) -> MutableResult<Option<ChangedField>>;

    /// Continue resolving `path` inside this member, whose joined external
    /// name is `prefix`.
    fn set_nested(
        &mut self,
        prefix: &str,
        path: &str,
        input: SetInput,
        options: &SetOptions,
    ) -> MutableResult<Applied>;
}

impl<C: Composite> Composite for Box<C> {
    fn reset_nested(&mut self) -> MutableResult<()> {
        (**self).reset_nested()
    }

    fn analyze_deep(&mut self, name: &str, original: &Self) -> MutableResult<Option<ChangedField>> {
        (**self).analyze_deep(name, original)
    }

    fn analyze_own(&mut self, name: &str) -> MutableResult<Option<ChangedField>> {
        (**self).analyze_own(name)
    }

    fn set_nested(
        &mut self,
        prefix: &str,
        path: &str,
        input: SetInput,
        options: &SetOptions,
    ) -> MutableResult<Applied> {
        (**self).set_nested(prefix, path, input, options)
    }
}

impl<C: Composite + Serialize> Composite for Option<C> {
    fn reset_nested(&mut self) -> MutableResult<()> {
        match self {
            Some(inner) => inner.reset_nested(),
            None => Ok(()),
        }
    }

    fn analyze_deep(&mut self, name: &str, original: &Self) -> MutableResult<Option<ChangedField>> {
        match (self.as_mut(), original.as_ref()) {
            (Some(current), Some(original)) => current.analyze_deep(name, original),
            (None, None) => Ok(None),
            (Some(current), None) => Ok(Some(ChangedField::leaf(
                name,
                Value::Null,
                serde_json::to_value(&*current)?,
            ))),
            (None, Some(original)) => Ok(Some(ChangedField::leaf(
                name,
                serde_json::to_value(original)?,
                Value::Null,
            ))),
        }
    }

    fn analyze_own(&mut self, name: &str) -> MutableResult<Option<ChangedField>> {
        match self {
            Some(inner) => inner.analyze_own(name),
            None => Ok(None),
        }
    }

    fn set_nested(
        &mut self,
        prefix: &str,
        path: &str,
        input: SetInput,
        options: &SetOptions,
    ) -> MutableResult<Applied> {
        match self {
            Some(inner) => inner.set_nested(prefix, path, input, options),
            None => Err(MutableError::cannot_find(path)),
        }
    }
}

/// A collection of struct-like members.
pub trait Collection {
    /// Reset every element.
    fn reset_elements(&mut self) -> MutableResult<()>;
}

impl<C: Composite> Collection for Vec<C> {
    fn reset_elements(&mut self) -> MutableResult<()> {
        self.iter_mut().try_for_each(Composite::reset_nested)
    }
}

impl<K, C: Composite> Collection for BTreeMap<K, C> {
    fn reset_elements(&mut self) -> MutableResult<()> {
        self.values_mut().try_for_each(Composite::reset_nested)
    }
}

impl<K, C: Composite, S> Collection for HashMap<K, C, S> {
    fn reset_elements(&mut self) -> MutableResult<()> {
        self.values_mut().try_for_each(Composite::reset_nested)
    }
}
