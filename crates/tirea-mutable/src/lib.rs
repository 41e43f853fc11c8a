//! Field-level change tracking and dynamic field assignment for structs.
//!
//! `tirea-mutable` lets a struct remember a checkpoint of itself, report which
//! fields changed since then, and accept untyped values into typed fields by
//! name.
//!
//! # Core Concepts
//!
//! - **Mutable**: Trait for types with a field descriptor table, usually derived
//! - **Tracker**: Embedded member holding status, checkpoint and change set
//! - **ChangedFields**: Map from field name to old/new value, nested for deep members
//! - **FieldDescriptor**: Compile-time metadata (external name, ignore, deep, kind)
//! - **SetInput**: Untyped value coerced into a field's static type by `set_value`
//!
//! # Lifecycle
//!
//! ```text
//! reset() -> mutate fields / set_value() -> analyze_changes() -> ChangedFields
//! ```
//!
//! - `reset` clones the object as its checkpoint and resets nested trackers
//! - `analyze_changes` compares live state with the checkpoint; it never fails
//! - `set_value` marks the owning object `Changed` and records the change
//!
//! # Using the derive macro
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use tirea_mutable::{Mutable, Tracker};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Mutable)]
//! pub struct Engine {
//!     #[serde(skip)]
//!     tracker: Tracker<Engine>,
//!     pub power: u32,
//! }
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize, Mutable)]
//! pub struct Car {
//!     #[serde(skip)]
//!     tracker: Tracker<Car>,
//!     #[serde(rename = "colour")]
//!     pub color: String,
//!     #[mutable(ignore)]
//!     pub mileage: u64,
//!     #[mutable(deep)]
//!     pub engine: Engine,
//! }
//!
//! let mut car = Car::default();
//! car.reset()?;
//!
//! car.set_value("colour", "green")?;
//! car.set_value("engine/power", "250")?;
//! car.mileage += 10;
//!
//! let changes = car.analyze_changes();
//! assert!(changes.contains("color"));
//! assert!(changes.get("engine").unwrap().nested_fields.contains("power"));
//! assert!(!changes.contains("mileage"));
//! ```
//!
//! # Field annotations
//!
//! - `#[mutable(ignore)]` (or `ignored`): never analyzed, never resolved by `set_value`
//! - `#[mutable(deep)]`: compare a struct-like member field by field
//! - `#[mutable(nested)]`: declare a member type as a derived struct without deep comparison
//! - `#[mutable(equaler)]`: compare through [`Equaler`] instead of `PartialEq`
//! - `#[mutable(rename = "...")]`: external name; otherwise `#[serde(rename)]`, then the field name

mod changed_field;
mod descriptor;
mod error;
mod input;
mod member;
mod mutable;
mod options;
mod setter;
mod shared;
mod status;
mod tracker;
mod walk;

// Core types
pub use changed_field::{ChangedField, ChangedFields, JsonStyle};
pub use descriptor::{FieldDescriptor, FieldKind};
pub use error::{MutableError, MutableResult, SetFailure};
pub use input::SetInput;
pub use mutable::{Equaler, Mutable};
pub use options::{SetOptions, DEFAULT_SEPARATOR};
pub use status::Status;
pub use tracker::Tracker;

// Member shapes
pub use member::{Collection, Composite};
pub use shared::Shared;

// Re-export derive macro when feature is enabled
#[cfg(feature = "derive")]
pub use tirea_mutable_derive::Mutable;

// Re-export serde_json::Value for convenience
pub use serde_json::Value;

/// Support for `#[derive(Mutable)]` output. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::setter::{set_in, Applied, Assignment};
    pub use crate::walk::*;
}
