//! Per-field helpers called from `#[derive(Mutable)]` output.
//!
//! Generated code stays thin: each member becomes one call into this module,
//! chosen by the member's kind and annotations.

use crate::member::{Collection, Composite};
use crate::setter::{self, Applied, Assignment};
use crate::{
    ChangedField, ChangedFields, Equaler, Mutable, MutableError, MutableResult, SetFailure,
    SetInput, SetOptions,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Leaf comparison through `PartialEq`.
pub fn diff_leaf<T: PartialEq + Serialize>(
    name: &str,
    current: &T,
    original: &T,
    out: &mut ChangedFields,
) -> MutableResult<()> {
    if current != original {
        record_leaf(name, current, original, out)?;
    }
    Ok(())
}

/// Leaf comparison through the injected [`Equaler`].
pub fn diff_leaf_with_equaler<T: Equaler + Serialize>(
    name: &str,
    current: &T,
    original: &T,
    out: &mut ChangedFields,
) -> MutableResult<()> {
    if !current.equal(original) {
        record_leaf(name, current, original, out)?;
    }
    Ok(())
}

fn record_leaf<T: Serialize>(
    name: &str,
    current: &T,
    original: &T,
    out: &mut ChangedFields,
) -> MutableResult<()> {
    out.insert(ChangedField::leaf(
        name,
        serde_json::to_value(original)?,
        serde_json::to_value(current)?,
    ));
    Ok(())
}

/// Deep comparison of a struct-like member.
pub fn diff_deep<C: Composite>(
    name: &str,
    current: &mut C,
    original: &C,
    out: &mut ChangedFields,
) -> MutableResult<()> {
    if let Some(change) = current.analyze_deep(name, original)? {
        out.insert(change);
    }
    Ok(())
}

/// Reset trackers behind a struct-like member.
pub fn reset_member<C: Composite>(name: &'static str, member: &mut C) -> MutableResult<()> {
    member.reset_nested().map_err(|e| {
        tracing::error!(field = name, error = %e, "nested reset failed");
        MutableError::nested_reset(name, e)
    })
}

/// Reset trackers inside a collection member.
pub fn reset_collection<C: Collection>(name: &'static str, member: &mut C) -> MutableResult<()> {
    member.reset_elements().map_err(|e| {
        tracing::error!(field = name, error = %e, "nested reset failed");
        MutableError::nested_reset(name, e)
    })
}

/// Assign a coerced value, returning the JSON rendering of both sides.
pub fn assign<T: Serialize + DeserializeOwned + 'static>(
    slot: &mut T,
    input: SetInput,
) -> Result<Assignment, SetFailure> {
    let old = serde_json::to_value(&*slot).map_err(SetFailure::NotInterfaceable)?;
    let value: T = input.coerce()?;
    let new = serde_json::to_value(&value).map_err(SetFailure::NotInterfaceable)?;
    *slot = value;
    Ok(Assignment { old, new })
}

/// Continue path resolution inside a struct-like member.
pub fn descend<C: Composite>(
    member: &mut C,
    prefix: &str,
    path: &str,
    input: SetInput,
    options: &SetOptions,
) -> MutableResult<Applied> {
    member.set_nested(prefix, path, input, options)
}

/// [`Composite::reset_nested`] for a derived struct.
///
/// Trackable structs reset themselves, which recurses further. Untracked
/// structs stop the recursion.
pub fn reset_struct<M: Mutable>(target: &mut M) -> MutableResult<()> {
    if target.is_trackable() {
        target.reset()
    } else {
        Ok(())
    }
}

/// [`Composite::analyze_deep`] and [`Composite::analyze_own`] for a derived
/// struct.
///
/// A struct holding a checkpoint is analyzed by its own tracker, so its
/// change set and checkpoint stay its own. Anything else (untracked, or
/// replaced after the parent's reset) is compared field by field against
/// `original`; without one there is nothing to compare.
pub fn analyze_struct<M: Mutable>(
    target: &mut M,
    name: &str,
    original: Option<&M>,
) -> MutableResult<Option<ChangedField>> {
    let nested = if target.has_checkpoint() {
        target.analyze_changes()
    } else if let Some(original) = original {
        let mut nested = ChangedFields::new();
        target.diff_fields(original, &mut nested)?;
        nested
    } else {
        ChangedFields::new()
    };
    Ok((!nested.is_empty()).then(|| ChangedField::composite(name, nested)))
}

/// [`Composite::set_nested`] for a derived struct.
pub fn set_struct<M: Mutable>(
    target: &mut M,
    prefix: &str,
    path: &str,
    input: SetInput,
    options: &SetOptions,
) -> MutableResult<Applied> {
    setter::set_in(target, prefix, path, input, options)
}
