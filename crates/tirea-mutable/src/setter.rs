//! Dynamic field assignment by external path.

use crate::{
    ChangedField, ChangedFields, Mutable, MutableError, MutableResult, SetFailure, SetInput,
    SetOptions, Status,
};
use serde_json::Value;

/// Old and new value of a successful assignment, rendered as JSON.
#[doc(hidden)]
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Value before the assignment.
    pub old: Value,
    /// Value after the assignment.
    pub new: Value,
}

/// Where a successful assignment ended up being recorded.
#[doc(hidden)]
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// A trackable owner marked itself `Changed` and recorded the change.
    Recorded,
    /// No trackable struct on the way down; the enclosing struct takes over.
    Unrecorded(ChangedField),
}

/// Resolve `path` below `prefix` inside `target` and assign `input`.
///
/// Members are searched in declaration order. A member whose joined external
/// name equals `path` is assigned; a struct-like member whose joined name
/// prefixes `path` is descended into and its result is final.
///
/// The nearest trackable struct at or above the assigned member is marked
/// `Changed` and records the change, nested under the member names it passed
/// through.
#[doc(hidden)]
pub fn set_in<M: Mutable>(
    target: &mut M,
    prefix: &str,
    path: &str,
    input: SetInput,
    options: &SetOptions,
) -> MutableResult<Applied> {
    for (index, field) in M::FIELDS.iter().enumerate() {
        if field.ignored {
            continue;
        }
        let name = options.join(prefix, field.external_name);
        if name == path {
            if !field.settable {
                tracing::warn!(field = %name, "cannot set value: field is not pub");
                return Err(MutableError::cannot_set(name, SetFailure::NotSettable));
            }
            let found = input.type_name();
            return match target.assign_field(index, input) {
                Ok(assignment) => {
                    tracing::trace!(field = %name, "value assigned");
                    let change = ChangedField::leaf(field.name, assignment.old, assignment.new);
                    Ok(absorb(target, change))
                }
                Err(reason) => {
                    tracing::warn!(field = %name, value_type = found, error = %reason, "cannot set value");
                    Err(MutableError::cannot_set(name, reason))
                }
            };
        }
        if !options.is_below(path, &name) {
            continue;
        }
        if !field.kind.is_struct_like() {
            tracing::warn!(
                field = %name,
                path,
                "cannot descend into a member not declared #[mutable(nested)] or #[mutable(deep)]"
            );
            continue;
        }
        // Members reached through a private parent are not settable either.
        if !field.settable {
            tracing::warn!(field = %name, path, "cannot set value: parent field is not pub");
            return Err(MutableError::cannot_set(path, SetFailure::NotSettable));
        }
        return match target.descend_field(index, &name, path, input, options)? {
            Applied::Recorded => Ok(Applied::Recorded),
            Applied::Unrecorded(change) => {
                let nested: ChangedFields = std::iter::once(change).collect();
                Ok(absorb(target, ChangedField::composite(field.name, nested)))
            }
        };
    }
    Err(MutableError::cannot_find(path))
}

/// Mark a trackable `owner` `Changed` and record `change`, or hand the change
/// back to the enclosing struct.
fn absorb<M: Mutable>(owner: &mut M, change: ChangedField) -> Applied {
    match owner.tracker_mut() {
        Some(tracker) => {
            tracker.set_status(Status::Changed);
            tracker.changes_mut().record_change(change);
            Applied::Recorded
        }
        None => Applied::Unrecorded(change),
    }
}
