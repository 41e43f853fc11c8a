//! Code generation for Mutable derive macro.

mod mutable_impl;

use crate::parse::MutableInput;
use darling::FromDeriveInput;
use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Main entry point for code generation.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let parsed = MutableInput::from_derive_input(input)
        .map_err(|e| syn::Error::new_spanned(input, e.to_string()))?;

    validate(&parsed)?;

    mutable_impl::generate(&parsed)
}

/// Reject annotation combinations that have no meaning.
fn validate(parsed: &MutableInput) -> syn::Result<()> {
    let mut tracker_seen = false;

    for field in parsed.fields() {
        let ignore = field.ignore || field.ignored;

        if ignore && (field.deep || field.nested || field.equaler) {
            return Err(syn::Error::new_spanned(
                field.ident(),
                "#[mutable(ignore)] cannot be combined with deep, nested or equaler. \
                 Ignored fields are never compared or walked.",
            ));
        }

        if field.is_tracker() {
            if tracker_seen {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "at most one Tracker field is allowed per struct",
                ));
            }
            tracker_seen = true;

            if field.deep || field.nested || field.equaler || field.rename.is_some() {
                return Err(syn::Error::new_spanned(
                    field.ident(),
                    "the Tracker field takes no #[mutable(...)] annotations",
                ));
            }
        }
    }

    Ok(())
}
