//! Derive macro for tirea-mutable `Mutable` trait.
//!
//! This crate provides the `#[derive(Mutable)]` macro that generates:
//! - `impl Mutable for {Name}`: field descriptor table, tracker accessors and
//!   per-field diff/reset/assign code
//! - `impl Composite for {Name}`: lets the struct be a deep member of another
//!
//! # Usage
//!
//! ```ignore
//! use tirea_mutable::{Mutable, Tracker};
//!
//! #[derive(Clone, Default, PartialEq, Serialize, Deserialize, Mutable)]
//! struct Car {
//!     #[serde(skip)]
//!     tracker: Tracker<Car>,
//!     pub color: String,
//!     #[mutable(deep)]
//!     pub engine: Engine,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod field_kind;
mod parse;

/// Derive the `Mutable` trait for a struct with named fields.
///
/// A field whose type is `Tracker<_>` becomes the embedded tracker; without
/// one the struct can still be deep-compared as a member but cannot `reset`.
///
/// # Attributes
///
/// ## Field Attributes
///
/// - `#[mutable(ignore)]` / `#[mutable(ignored)]`: Never compared, never
///   resolved by `set_value`
/// - `#[mutable(deep)]`: Compare a struct member field by field. Implies `nested`.
/// - `#[mutable(nested)]`: The field's type (or the `T` in `Box<T>`,
///   `Shared<T>`, `Option<T>`, `Vec<T>`, maps) is a derived `Mutable` struct,
///   so its trackers take part in `reset`
/// - `#[mutable(equaler)]`: Compare with `Equaler::equal` instead of `PartialEq`
/// - `#[mutable(rename = "name")]`: External name for `set_value` paths.
///   Without it `#[serde(rename = "...")]` is honored, then the container's
///   `#[serde(rename_all = "...")]` rule.
///
/// Only `pub` fields can be assigned by `set_value`.
///
/// A struct member is only reset, deep-compared or descended into by
/// `set_value` when it carries `nested` or `deep`; the derive cannot tell a
/// foreign type from a derived one. The annotated type must itself derive
/// `Mutable`. Well-known std types (`Duration`, `HashSet`, `Arc`, ...) ignore
/// both annotations and stay whole-value leaves.
///
/// # Examples
///
/// ```ignore
/// #[derive(Clone, Default, PartialEq, Serialize, Deserialize, Mutable)]
/// struct Engine {
///     #[serde(skip)]
///     tracker: Tracker<Engine>,
///     pub power: u32,
/// }
///
/// let mut engine = Engine::default();
/// engine.reset()?;
/// engine.set_value("power", "250")?;
/// assert_eq!(engine.power, 250);
/// ```
#[proc_macro_derive(Mutable, attributes(mutable))]
pub fn derive_mutable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match codegen::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
