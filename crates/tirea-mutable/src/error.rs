//! Error types for tirea-mutable operations.

use thiserror::Error;

/// Result type alias for tirea-mutable operations.
pub type MutableResult<T> = Result<T, MutableError>;

/// Errors returned by `reset` and `set_value`.
///
/// Change analysis never returns these; it logs them and degrades to a
/// partial result instead.
#[derive(Debug, Error)]
pub enum MutableError {
    /// `reset` was called on a value that carries no `Tracker`.
    #[error("invalid reset target: {type_name} carries no tracker")]
    InvalidTarget {
        /// Type name of the rejected target.
        type_name: &'static str,
    },

    /// A nested member failed to reset.
    #[error("cannot reset nested field ({field})")]
    NestedReset {
        /// Structural name of the member whose reset failed.
        field: &'static str,
        /// The child's own reset error.
        #[source]
        source: Box<MutableError>,
    },

    /// No field matches the requested external path.
    #[error("cannot find suitable field ({path})")]
    CannotFind {
        /// The requested external path.
        path: String,
    },

    /// A field matched but the value could not be assigned.
    #[error("cannot set value for the field ({path}): {reason}")]
    CannotSet {
        /// The external path of the matched field.
        path: String,
        /// Why the assignment failed.
        #[source]
        reason: SetFailure,
    },

    /// A `Shared` pointee was already borrowed while being walked.
    #[error("shared value of type {type_name} is already borrowed")]
    AlreadyBorrowed {
        /// Type name of the pointee.
        type_name: &'static str,
    },

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons an assignment to a matched field can fail.
#[derive(Debug, Error)]
pub enum SetFailure {
    /// The field is not `pub` and cannot be assigned from outside.
    #[error("field is not settable")]
    NotSettable,

    /// The current field value cannot be rendered as a generic value.
    #[error("field value is not interfaceable: {0}")]
    NotInterfaceable(#[source] serde_json::Error),

    /// The value is neither the field type nor a parseable payload.
    #[error("unsupported value type {found} for field of type {expected}")]
    UnsupportedType {
        /// Static type of the field.
        expected: &'static str,
        /// Runtime type of the supplied value.
        found: &'static str,
    },

    /// The payload is valid JSON but does not decode into the field type.
    #[error("cannot parse value: {0}")]
    CannotParse(#[source] serde_json::Error),

    /// The string or byte payload is not a JSON document.
    #[error("value is not valid JSON: {0}")]
    NotJson(#[source] serde_json::Error),
}

impl MutableError {
    /// Create an invalid target error.
    #[inline]
    pub fn invalid_target(type_name: &'static str) -> Self {
        MutableError::InvalidTarget { type_name }
    }

    /// Wrap a child's reset failure.
    #[inline]
    pub fn nested_reset(field: &'static str, source: MutableError) -> Self {
        MutableError::NestedReset {
            field,
            source: Box::new(source),
        }
    }

    /// Create a cannot find error.
    #[inline]
    pub fn cannot_find(path: impl Into<String>) -> Self {
        MutableError::CannotFind { path: path.into() }
    }

    /// Create a cannot set error.
    #[inline]
    pub fn cannot_set(path: impl Into<String>, reason: SetFailure) -> Self {
        MutableError::CannotSet {
            path: path.into(),
            reason,
        }
    }

    /// Create an already borrowed error.
    #[inline]
    pub fn already_borrowed(type_name: &'static str) -> Self {
        MutableError::AlreadyBorrowed { type_name }
    }

    /// True if this error is [`MutableError::InvalidTarget`].
    pub fn is_invalid_target(&self) -> bool {
        matches!(self, MutableError::InvalidTarget { .. })
    }

    /// True if this error is [`MutableError::NestedReset`].
    pub fn is_nested_reset(&self) -> bool {
        matches!(self, MutableError::NestedReset { .. })
    }

    /// True if no field matched the requested path.
    pub fn is_cannot_find(&self) -> bool {
        matches!(self, MutableError::CannotFind { .. })
    }

    /// True if a field matched but the assignment failed.
    pub fn is_cannot_set(&self) -> bool {
        matches!(self, MutableError::CannotSet { .. })
    }

    /// The assignment failure, if this is a cannot set error.
    pub fn set_failure(&self) -> Option<&SetFailure> {
        match self {
            MutableError::CannotSet { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
