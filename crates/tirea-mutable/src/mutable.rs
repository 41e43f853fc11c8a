//! The `Mutable` capability trait.
//!
//! `Mutable` is implemented by `#[derive(Mutable)]`. The derive emits the
//! field descriptor table and the per-field walk code; everything observable
//! (`reset`, `analyze_changes`, `set_value`) is provided here on top of it.

use crate::setter::{self, Applied, Assignment};
use crate::{
    ChangedFields, FieldDescriptor, MutableError, MutableResult, SetFailure, SetInput, SetOptions,
    Status, Tracker,
};
use std::any::{type_name, Any};
use std::panic::{self, AssertUnwindSafe};

static NO_CHANGES: ChangedFields = ChangedFields::new();

/// Custom equality for leaf comparison.
///
/// Members annotated `#[mutable(equaler)]` are compared with `equal` instead
/// of `PartialEq`.
pub trait Equaler {
    /// Reports whether `self` and `other` are equal.
    fn equal(&self, other: &Self) -> bool;
}

/// Change tracking and dynamic field assignment for a struct.
///
/// Typically derived:
///
/// ```ignore
/// use serde::{Deserialize, Serialize};
/// use tirea_mutable::{Mutable, Tracker};
///
/// #[derive(Clone, Serialize, Deserialize, Mutable)]
/// pub struct Car {
///     #[serde(skip)]
///     tracker: Tracker<Car>,
///     pub color: String,
///     #[mutable(deep)]
///     pub engine: Engine,
///     #[mutable(ignore)]
///     pub cached_label: String,
/// }
///
/// let mut car = Car::default();
/// car.reset()?;
/// car.color = "green".into();
/// car.set_value("engine/power", "250")?;
/// let changes = car.analyze_changes();
/// ```
///
/// Types without a `Tracker` member still derive `Mutable`; they can be
/// deep-compared as members of a tracked parent or through
/// [`Mutable::diff_against`], but `reset` rejects them.
///
/// None of the operations are reentrant. Sharing one object across threads
/// requires external synchronization.
pub trait Mutable: Clone + 'static {
    /// Descriptor of every member, in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// The embedded tracker, if this type declares one.
    fn tracker(&self) -> Option<&Tracker<Self>>;

    /// Mutable access to the embedded tracker.
    fn tracker_mut(&mut self) -> Option<&mut Tracker<Self>>;

    /// Compare every non-ignored member against `original`.
    #[doc(hidden)]
    fn diff_fields(&mut self, original: &Self, out: &mut ChangedFields) -> MutableResult<()>;

    /// Reset trackable members, pre-order.
    #[doc(hidden)]
    fn reset_fields(&mut self) -> MutableResult<()>;

    /// Assign the member at `index` of [`Mutable::FIELDS`].
    #[doc(hidden)]
    fn assign_field(&mut self, index: usize, input: SetInput) -> Result<Assignment, SetFailure>;

    /// Continue path resolution inside the struct-like member at `index`.
    #[doc(hidden)]
    fn descend_field(
        &mut self,
        index: usize,
        prefix: &str,
        path: &str,
        input: SetInput,
        options: &SetOptions,
    ) -> MutableResult<Applied>;

    /// Look up a member by its declared name.
    fn field(name: &str) -> Option<&'static FieldDescriptor> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }

    /// Look up a member by its external name.
    fn field_by_external_name(name: &str) -> Option<&'static FieldDescriptor> {
        Self::FIELDS.iter().find(|f| f.external_name == name)
    }

    /// True if this type declares a tracker.
    fn is_trackable(&self) -> bool {
        self.tracker().is_some()
    }

    /// Current status. Untracked types always report `NotChanged`.
    fn status(&self) -> Status {
        self.tracker().map(Tracker::status).unwrap_or_default()
    }

    /// Override the status (for `Added`/`Removed`). No-op when untracked.
    fn set_status(&mut self, status: Status) {
        if let Some(tracker) = self.tracker_mut() {
            tracker.set_status(status);
        }
    }

    /// Changes accumulated since the last reset.
    fn changed_fields(&self) -> &ChangedFields {
        match self.tracker() {
            Some(tracker) => tracker.changed_fields(),
            None => &NO_CHANGES,
        }
    }

    /// True once `reset` has taken a checkpoint.
    fn has_checkpoint(&self) -> bool {
        self.tracker().is_some_and(Tracker::has_checkpoint)
    }

    /// The state captured by the last `reset`.
    fn checkpoint(&self) -> Option<&Self> {
        self.tracker().and_then(Tracker::checkpoint)
    }

    /// Take a checkpoint of the current state.
    ///
    /// Clears the change set, sets the status to `NotChanged` and resets every
    /// trackable member reachable through struct, pointer and collection
    /// members.
    ///
    /// When a member fails to reset, this object's own checkpoint, status and
    /// change set are left as they were.
    fn reset(&mut self) -> MutableResult<()> {
        if !self.is_trackable() {
            return Err(MutableError::invalid_target(type_name::<Self>()));
        }
        let snapshot = Box::new(self.clone());
        self.reset_fields()?;
        if let Some(tracker) = self.tracker_mut() {
            tracker.rebase(snapshot);
        }
        tracing::trace!(type_name = type_name::<Self>(), "checkpoint taken");
        Ok(())
    }

    /// Compare the current state with the last checkpoint.
    ///
    /// The result is also merged into the tracker's change set. The status is
    /// left untouched. Never fails: faults are logged and the changes found so
    /// far are returned.
    fn analyze_changes(&mut self) -> ChangedFields {
        let Some(original) = self.tracker_mut().and_then(Tracker::take_checkpoint) else {
            tracing::warn!(
                type_name = type_name::<Self>(),
                "change analysis without checkpoint; call reset first"
            );
            return ChangedFields::new();
        };
        let changes = self.diff_against(&original);
        if let Some(tracker) = self.tracker_mut() {
            tracker.restore_checkpoint(original);
            tracker.changes_mut().merge(&changes);
        }
        changes
    }

    /// Compare the current state with an explicit baseline.
    fn diff_against(&mut self, original: &Self) -> ChangedFields {
        let mut changes = ChangedFields::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.diff_fields(original, &mut changes)
        }));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(
                type_name = type_name::<Self>(),
                error = %e,
                partial = changes.len(),
                "change analysis aborted; returning partial result"
            ),
            Err(payload) => tracing::error!(
                type_name = type_name::<Self>(),
                panic = panic_message(payload.as_ref()),
                partial = changes.len(),
                "change analysis panicked; returning partial result"
            ),
        }
        changes
    }

    /// Assign `value` to the member addressed by the external `path`.
    ///
    /// Nested members are addressed as `parent/child`. See
    /// [`SetInput::coerce`] for how values are converted.
    fn set_value<V: Any>(&mut self, path: &str, value: V) -> MutableResult<()> {
        self.set_value_with(path, value, &SetOptions::default())
    }

    /// [`Mutable::set_value`] with explicit path options.
    fn set_value_with<V: Any>(
        &mut self,
        path: &str,
        value: V,
        options: &SetOptions,
    ) -> MutableResult<()> {
        setter::set_in(self, "", path, SetInput::new(value), options).map(|_| ())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "<non-string panic payload>"
    }
}
