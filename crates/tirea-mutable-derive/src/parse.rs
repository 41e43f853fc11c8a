//! Parsing logic for Mutable derive macro.

use crate::field_kind::FieldKind;
use darling::{ast, FromDeriveInput, FromField};
use syn::ext::IdentExt;
use syn::{Attribute, Generics, Ident, LitStr, Type, Visibility};

/// Parsed struct-level options.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(mutable), forward_attrs(serde), supports(struct_named))]
pub struct MutableInput {
    /// The struct identifier.
    pub ident: Ident,

    /// Forwarded container `#[serde(...)]` attributes.
    pub attrs: Vec<Attribute>,

    /// Generic parameters.
    pub generics: Generics,

    /// Struct data (fields).
    pub data: ast::Data<(), FieldInput>,
}

impl MutableInput {
    /// Get the fields as a vector.
    pub fn fields(&self) -> Vec<&FieldInput> {
        self.data
            .as_ref()
            .take_struct()
            .map(|s| s.fields.to_vec())
            .unwrap_or_default()
    }

    /// Container-level `#[serde(rename_all = "..")]`, if any.
    pub fn rename_rule(&self) -> syn::Result<Option<RenameRule>> {
        serde_rename_all(&self.attrs)
            .map(|(rule, lit)| {
                RenameRule::from_str(&rule).ok_or_else(|| {
                    syn::Error::new_spanned(lit, format!("unknown serde rename_all rule `{rule}`"))
                })
            })
            .transpose()
    }
}

/// Parsed field-level options.
#[derive(Debug, FromField)]
#[darling(attributes(mutable), forward_attrs(serde))]
pub struct FieldInput {
    /// Field identifier.
    pub ident: Option<Ident>,

    /// Field visibility.
    pub vis: Visibility,

    /// Field type.
    pub ty: Type,

    /// Forwarded `#[serde(...)]` attributes.
    pub attrs: Vec<Attribute>,

    /// External name used by `set_value` paths.
    #[darling(default)]
    pub rename: Option<String>,

    /// Exclude from analysis and path resolution.
    #[darling(default)]
    pub ignore: bool,

    /// Alias of `ignore`.
    #[darling(default)]
    pub ignored: bool,

    /// Compare field by field instead of as a whole value.
    #[darling(default)]
    pub deep: bool,

    /// The member type is a derived `Mutable` struct.
    #[darling(default)]
    pub nested: bool,

    /// Compare with `Equaler::equal` instead of `PartialEq`.
    #[darling(default)]
    pub equaler: bool,
}

impl FieldInput {
    /// Get the field identifier (panics if None).
    pub fn ident(&self) -> &Ident {
        self.ident.as_ref().expect("named field required")
    }

    /// Declared name, without any `r#` prefix.
    pub fn structural_name(&self) -> String {
        self.ident().unraw().to_string()
    }

    /// Name used by `set_value`: `mutable(rename)`, then `serde(rename)`, then
    /// the declared name with the container's `serde(rename_all)` rule applied.
    pub fn external_name(&self, rule: Option<RenameRule>) -> String {
        self.rename
            .clone()
            .or_else(|| serde_rename(&self.attrs))
            .unwrap_or_else(|| {
                let name = self.structural_name();
                match rule {
                    Some(rule) => rule.apply_to_field(&name),
                    None => name,
                }
            })
    }

    /// Member shape.
    pub fn kind(&self) -> FieldKind {
        FieldKind::from_type(&self.ty, self.nested || self.deep)
    }

    /// True for the embedded tracker member.
    pub fn is_tracker(&self) -> bool {
        self.kind() == FieldKind::Tracker
    }

    /// Excluded from analysis and path resolution.
    pub fn is_ignored(&self) -> bool {
        self.ignore || self.ignored || self.is_tracker()
    }

    /// Deep-compared. Only struct-like members keep the annotation.
    pub fn is_deep(&self) -> bool {
        self.deep && self.kind().is_struct_like()
    }

    /// Only `pub` members can be assigned by `set_value`.
    pub fn is_settable(&self) -> bool {
        matches!(self.vis, Visibility::Public(_))
    }
}

/// Serde's `rename_all` rules, as applied to snake_case field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    LowerCase,
    UpperCase,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    fn from_str(rule: &str) -> Option<Self> {
        Some(match rule {
            "lowercase" => RenameRule::LowerCase,
            "UPPERCASE" => RenameRule::UpperCase,
            "PascalCase" => RenameRule::PascalCase,
            "camelCase" => RenameRule::CamelCase,
            "snake_case" => RenameRule::SnakeCase,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnakeCase,
            "kebab-case" => RenameRule::KebabCase,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebabCase,
            _ => return None,
        })
    }

    /// Rename a snake_case field name the way serde does.
    pub fn apply_to_field(self, field: &str) -> String {
        match self {
            RenameRule::LowerCase | RenameRule::SnakeCase => field.to_owned(),
            RenameRule::UpperCase | RenameRule::ScreamingSnakeCase => field.to_ascii_uppercase(),
            RenameRule::PascalCase => {
                let mut pascal = String::with_capacity(field.len());
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::CamelCase => {
                let pascal = RenameRule::PascalCase.apply_to_field(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::KebabCase => field.replace('_', "-"),
            RenameRule::ScreamingKebabCase => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

/// Serialization rule from `#[serde(rename_all = "..")]` or
/// `#[serde(rename_all(serialize = ".."))]`, with the literal for spans.
fn serde_rename_all(attrs: &[Attribute]) -> Option<(String, LitStr)> {
    let mut rule = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                if meta.input.peek(syn::Token![=]) {
                    let lit: LitStr = meta.value()?.parse()?;
                    rule = Some((lit.value(), lit));
                } else {
                    meta.parse_nested_meta(|inner| {
                        let lit: LitStr = inner.value()?.parse()?;
                        if inner.path.is_ident("serialize") {
                            rule = Some((lit.value(), lit));
                        }
                        Ok(())
                    })?;
                }
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        });
    }
    rule
}

/// Consume the value of a serde option this crate does not read.
fn skip_meta(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| {
            if inner.input.peek(syn::Token![=]) {
                let _: syn::Expr = inner.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// Serialization alias from `#[serde(rename = "..")]` or
/// `#[serde(rename(serialize = ".."))]`.
fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        // Unknown serde options are skipped; serde itself reports malformed ones.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(syn::Token![=]) {
                    let name: LitStr = meta.value()?.parse()?;
                    rename = Some(name.value());
                } else {
                    meta.parse_nested_meta(|inner| {
                        let name: LitStr = inner.value()?.parse()?;
                        if inner.path.is_ident("serialize") {
                            rename = Some(name.value());
                        }
                        Ok(())
                    })?;
                }
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        });
    }
    rename
}
