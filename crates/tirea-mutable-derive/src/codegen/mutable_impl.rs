//! `Mutable` and `Composite` impl generation.
//!
//! Every member becomes one descriptor entry plus at most one call into
//! `::tirea_mutable::__private` per generated method. The runtime crate owns
//! all behavior; this module only picks the helper for each member.

use crate::field_kind::FieldKind;
use crate::parse::{FieldInput, MutableInput, RenameRule};
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::spanned::Spanned;

/// Generate the `Mutable` and `Composite` trait implementations.
pub fn generate(input: &MutableInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = input.fields();
    let rule = input.rename_rule()?;

    let descriptors = fields.iter().map(|f| generate_descriptor(f, rule));
    let (tracker, tracker_mut) = generate_tracker_accessors(&fields);
    let diffs = fields.iter().filter_map(|f| generate_diff(f));
    let resets = fields.iter().filter_map(|f| generate_reset(f));
    let assign_arms = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.is_ignored() && f.is_settable())
        .map(|(index, f)| {
            let ident = f.ident();
            quote! {
                #index => ::tirea_mutable::__private::assign(&mut self.#ident, input),
            }
        });
    let descend_arms = fields
        .iter()
        .enumerate()
        .filter(|(_, f)| !f.is_ignored() && f.is_settable() && f.kind().is_struct_like())
        .map(|(index, f)| {
            let ident = f.ident();
            quote! {
                #index => ::tirea_mutable::__private::descend(
                    &mut self.#ident, prefix, path, input, options,
                ),
            }
        });

    Ok(quote! {
        impl #impl_generics ::tirea_mutable::Mutable for #struct_name #ty_generics #where_clause {
            const FIELDS: &'static [::tirea_mutable::FieldDescriptor] = &[
                #(#descriptors),*
            ];

            fn tracker(&self) -> ::core::option::Option<&::tirea_mutable::Tracker<Self>> {
                #tracker
            }

            fn tracker_mut(
                &mut self,
            ) -> ::core::option::Option<&mut ::tirea_mutable::Tracker<Self>> {
                #tracker_mut
            }

            #[allow(unused_variables)]
            fn diff_fields(
                &mut self,
                original: &Self,
                out: &mut ::tirea_mutable::ChangedFields,
            ) -> ::tirea_mutable::MutableResult<()> {
                #(#diffs)*
                ::core::result::Result::Ok(())
            }

            fn reset_fields(&mut self) -> ::tirea_mutable::MutableResult<()> {
                #(#resets)*
                ::core::result::Result::Ok(())
            }

            #[allow(unused_variables)]
            fn assign_field(
                &mut self,
                index: usize,
                input: ::tirea_mutable::SetInput,
            ) -> ::core::result::Result<
                ::tirea_mutable::__private::Assignment,
                ::tirea_mutable::SetFailure,
            > {
                match index {
                    #(#assign_arms)*
                    _ => ::core::result::Result::Err(::tirea_mutable::SetFailure::NotSettable),
                }
            }

            #[allow(unused_variables)]
            fn descend_field(
                &mut self,
                index: usize,
                prefix: &str,
                path: &str,
                input: ::tirea_mutable::SetInput,
                options: &::tirea_mutable::SetOptions,
            ) -> ::tirea_mutable::MutableResult<::tirea_mutable::__private::Applied> {
                match index {
                    #(#descend_arms)*
                    _ => ::core::result::Result::Err(
                        ::tirea_mutable::MutableError::cannot_find(path),
                    ),
                }
            }
        }

        impl #impl_generics ::tirea_mutable::Composite for #struct_name #ty_generics #where_clause {
            fn reset_nested(&mut self) -> ::tirea_mutable::MutableResult<()> {
                ::tirea_mutable::__private::reset_struct(self)
            }

            fn analyze_deep(
                &mut self,
                name: &str,
                original: &Self,
            ) -> ::tirea_mutable::MutableResult<
                ::core::option::Option<::tirea_mutable::ChangedField>,
            > {
                ::tirea_mutable::__private::analyze_struct(
                    self,
                    name,
                    ::core::option::Option::Some(original),
                )
            }

            fn analyze_own(
                &mut self,
                name: &str,
            ) -> ::tirea_mutable::MutableResult<
                ::core::option::Option<::tirea_mutable::ChangedField>,
            > {
                ::tirea_mutable::__private::analyze_struct(self, name, ::core::option::Option::None)
            }

            fn set_nested(
                &mut self,
                prefix: &str,
                path: &str,
                input: ::tirea_mutable::SetInput,
                options: &::tirea_mutable::SetOptions,
            ) -> ::tirea_mutable::MutableResult<::tirea_mutable::__private::Applied> {
                ::tirea_mutable::__private::set_struct(self, prefix, path, input, options)
            }
        }
    })
}

/// Generate the `FieldDescriptor` literal for a single field.
fn generate_descriptor(field: &FieldInput, rule: Option<RenameRule>) -> TokenStream {
    let name = field.structural_name();
    let external_name = field.external_name(rule);
    let ignored = field.is_ignored();
    let deep = field.is_deep();
    let settable = field.is_settable();
    let kind = field.kind().runtime_variant();

    quote! {
        ::tirea_mutable::FieldDescriptor {
            name: #name,
            external_name: #external_name,
            ignored: #ignored,
            deep: #deep,
            settable: #settable,
            kind: #kind,
        }
    }
}

/// Generate the bodies of `tracker` and `tracker_mut`.
fn generate_tracker_accessors(fields: &[&FieldInput]) -> (TokenStream, TokenStream) {
    match fields.iter().find(|f| f.is_tracker()) {
        Some(field) => {
            let ident = field.ident();
            (
                quote!(::core::option::Option::Some(&self.#ident)),
                quote!(::core::option::Option::Some(&mut self.#ident)),
            )
        }
        None => (
            quote!(::core::option::Option::None),
            quote!(::core::option::Option::None),
        ),
    }
}

/// Generate the comparison of a single field against the checkpoint.
fn generate_diff(field: &FieldInput) -> Option<TokenStream> {
    if field.is_ignored() {
        return None;
    }
    let ident = field.ident();
    let name = field.structural_name();

    // Spanned so a deep member whose type lacks the derive is reported there.
    let helper = if field.is_deep() {
        quote_spanned!(field.ty.span()=> diff_deep(#name, &mut self.#ident, &original.#ident, out))
    } else if field.equaler {
        quote!(diff_leaf_with_equaler(#name, &self.#ident, &original.#ident, out))
    } else {
        quote!(diff_leaf(#name, &self.#ident, &original.#ident, out))
    };

    Some(quote! {
        ::tirea_mutable::__private::#helper?;
    })
}

/// Generate the nested reset of a single field, if its kind has trackers below it.
fn generate_reset(field: &FieldInput) -> Option<TokenStream> {
    if field.is_ignored() {
        return None;
    }
    let ident = field.ident();
    let name = field.structural_name();
    let span = field.ty.span();

    match field.kind() {
        FieldKind::Struct | FieldKind::Pointer => Some(quote_spanned! {span=>
            ::tirea_mutable::__private::reset_member(#name, &mut self.#ident)?;
        }),
        FieldKind::Collection => Some(quote_spanned! {span=>
            ::tirea_mutable::__private::reset_collection(#name, &mut self.#ident)?;
        }),
        FieldKind::Scalar | FieldKind::Tracker => None,
    }
}
