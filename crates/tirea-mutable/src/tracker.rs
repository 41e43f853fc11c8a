//! Tracking state embedded in a mutable struct.

use crate::{ChangedFields, Status};
use std::fmt;

/// Tracking capability embedded as a member of a `Mutable` struct.
///
/// Holds the status, the checkpoint taken by the last `reset` and the
/// accumulated change set. A struct opts into tracking by declaring one
/// member of type `Tracker<Self>`; the derive recognizes it and never reports
/// it as a field.
///
/// ```ignore
/// #[derive(Clone, Mutable)]
/// pub struct Car {
///     #[serde(skip)]
///     tracker: Tracker<Car>,
///     pub color: String,
/// }
/// ```
///
/// Cloning copies status and changes but not the checkpoint, so a checkpoint
/// never contains earlier checkpoints. Two trackers always compare equal;
/// tracking metadata is not part of the value.
pub struct Tracker<T> {
    status: Status,
    checkpoint: Option<Box<T>>,
    changes: ChangedFields,
}

impl<T> Tracker<T> {
    /// Create a tracker with no checkpoint.
    pub fn new() -> Self {
        Self {
            status: Status::NotChanged,
            checkpoint: None,
            changes: ChangedFields::new(),
        }
    }

    /// Current status.
    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Override the status. Used by callers for `Added`/`Removed`.
    #[inline]
    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Changes accumulated since the last reset.
    #[inline]
    pub fn changed_fields(&self) -> &ChangedFields {
        &self.changes
    }

    /// Snapshot taken by the last reset.
    #[inline]
    pub fn checkpoint(&self) -> Option<&T> {
        self.checkpoint.as_deref()
    }

    /// True once `reset` has run.
    #[inline]
    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// Install a fresh checkpoint, clearing status and changes.
    pub(crate) fn rebase(&mut self, snapshot: Box<T>) {
        self.status = Status::NotChanged;
        self.checkpoint = Some(snapshot);
        self.changes.clear();
    }

    pub(crate) fn take_checkpoint(&mut self) -> Option<Box<T>> {
        self.checkpoint.take()
    }

    pub(crate) fn restore_checkpoint(&mut self, snapshot: Box<T>) {
        self.checkpoint = Some(snapshot);
    }

    pub(crate) fn changes_mut(&mut self) -> &mut ChangedFields {
        &mut self.changes
    }
}

impl<T> Default for Tracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Tracker<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            checkpoint: None,
            changes: self.changes.clone(),
        }
    }
}

impl<T> PartialEq for Tracker<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> fmt::Debug for Tracker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("status", &self.status)
            .field("has_checkpoint", &self.has_checkpoint())
            .field("changes", &self.changes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rebase_clears_state() {
        let mut tracker = Tracker::<u32>::new();
        tracker.set_status(Status::Changed);
        tracker.changes_mut().record("x", json!(1), json!(2));

        tracker.rebase(Box::new(7));
        assert_eq!(tracker.status(), Status::NotChanged);
        assert!(tracker.changed_fields().is_empty());
        assert_eq!(tracker.checkpoint(), Some(&7));
    }

    #[test]
    fn test_clone_drops_checkpoint() {
        let mut tracker = Tracker::<u32>::new();
        tracker.rebase(Box::new(1));
        tracker.set_status(Status::Changed);

        let cloned = tracker.clone();
        assert!(!cloned.has_checkpoint());
        assert_eq!(cloned.status(), Status::Changed);
        assert!(tracker.has_checkpoint());
    }

    #[test]
    fn test_trackers_compare_equal() {
        let mut a = Tracker::<u32>::new();
        a.set_status(Status::Added);
        assert_eq!(a, Tracker::new());
    }
}
