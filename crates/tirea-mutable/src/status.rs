//! Lifecycle status of a tracked object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tracking status of a mutable object.
///
/// Only `NotChanged -> Changed` is driven by this crate (by `set_value`).
/// `Added` and `Removed` are reserved for callers that model collection
/// membership and are never assigned internally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// No change recorded since the last reset.
    #[default]
    NotChanged,
    /// The object was removed from its owning collection.
    Removed,
    /// The object was added to its owning collection.
    Added,
    /// At least one field was assigned since the last reset.
    Changed,
}

impl Status {
    /// Returns true unless the status is `NotChanged`.
    #[inline]
    pub fn is_changed(&self) -> bool {
        !matches!(self, Status::NotChanged)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::NotChanged => "NotChanged",
            Status::Removed => "Removed",
            Status::Added => "Added",
            Status::Changed => "Changed",
        };
        f.write_str(name)
    }
}
