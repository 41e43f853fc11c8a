//! Field type analysis for code generation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// The shape of a field, determining which walk helpers the generated code calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Compared and assigned as a whole value.
    Scalar,

    /// A nested `Mutable` struct, possibly behind `Box<T>` or `Shared<T>`.
    Struct,

    /// An `Option` of a struct-like type.
    Pointer,

    /// A `Vec<T>`, `BTreeMap<K, T>` or `HashMap<K, T>` of struct-like or pointer types.
    Collection,

    /// The embedded `Tracker<T>` member.
    Tracker,
}

impl FieldKind {
    /// Analyze a type and determine its kind.
    ///
    /// The `is_nested_attr` flag marks the **leaf type** as struct-like,
    /// while wrapper structure (Box/Shared/Option/Vec/Map) is preserved.
    ///
    /// Examples:
    /// - `Engine` with `nested=true` → `Struct`
    /// - `Option<Box<Engine>>` with `nested=true` → `Pointer`
    /// - `Vec<Option<Engine>>` with `nested=true` → `Collection`
    /// - `Vec<String>` → `Scalar`
    pub fn from_type(ty: &Type, is_nested_attr: bool) -> Self {
        let Some((name, args)) = last_segment(ty) else {
            return FieldKind::Scalar;
        };

        match name.as_str() {
            "Tracker" => FieldKind::Tracker,
            "Option" => match single_generic_arg(args) {
                Some(inner) if is_struct_like(inner, is_nested_attr) => FieldKind::Pointer,
                _ => FieldKind::Scalar,
            },
            "Vec" => match single_generic_arg(args) {
                Some(inner) if is_element(inner, is_nested_attr) => FieldKind::Collection,
                _ => FieldKind::Scalar,
            },
            "BTreeMap" | "HashMap" => match map_value_arg(args) {
                Some(value) if is_element(value, is_nested_attr) => FieldKind::Collection,
                _ => FieldKind::Scalar,
            },
            _ if is_struct_like(ty, is_nested_attr) => FieldKind::Struct,
            _ => FieldKind::Scalar,
        }
    }

    /// True for members deep analysis and path descent apply to.
    pub fn is_struct_like(&self) -> bool {
        matches!(self, FieldKind::Struct | FieldKind::Pointer)
    }

    /// Path to the runtime `FieldKind` variant. The tracker is described as a scalar.
    pub fn runtime_variant(&self) -> TokenStream {
        match self {
            FieldKind::Scalar | FieldKind::Tracker => quote!(::tirea_mutable::FieldKind::Scalar),
            FieldKind::Struct => quote!(::tirea_mutable::FieldKind::Struct),
            FieldKind::Pointer => quote!(::tirea_mutable::FieldKind::Pointer),
            FieldKind::Collection => quote!(::tirea_mutable::FieldKind::Collection),
        }
    }
}

/// A leaf struct, or `Box`/`Shared` around one.
fn is_struct_like(ty: &Type, is_nested_attr: bool) -> bool {
    let Some((name, args)) = last_segment(ty) else {
        return false;
    };

    match name.as_str() {
        "Box" | "Shared" => {
            single_generic_arg(args).is_some_and(|inner| is_struct_like(inner, is_nested_attr))
        }
        "Option" | "Vec" | "BTreeMap" | "HashMap" | "Tracker" => false,
        "String" | "str" | "bool" | "char" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize"
        | "u8" | "u16" | "u32" | "u64" | "u128" | "usize" | "f32" | "f64" | "Value" => false,
        // Std types that never derive `Mutable`; annotating them is a no-op.
        "HashSet" | "BTreeSet" | "VecDeque" | "BinaryHeap" | "LinkedList" | "Duration"
        | "SystemTime" | "Instant" | "PathBuf" | "Path" | "OsString" | "Rc" | "Arc" | "Cow"
        | "Cell" | "RefCell" | "Mutex" | "RwLock" | "PhantomData" | "NonZeroU32"
        | "NonZeroU64" | "NonZeroUsize" => false,
        _ => is_nested_attr,
    }
}

/// Collection elements are struct-like or optional struct-like.
fn is_element(ty: &Type, is_nested_attr: bool) -> bool {
    matches!(
        FieldKind::from_type(ty, is_nested_attr),
        FieldKind::Struct | FieldKind::Pointer
    )
}

fn last_segment(ty: &Type) -> Option<(String, &PathArguments)> {
    match ty {
        Type::Path(TypePath { qself: None, path }) => path
            .segments
            .last()
            .map(|segment| (segment.ident.to_string(), &segment.arguments)),
        _ => None,
    }
}

/// Extract a single generic type argument from path arguments.
fn single_generic_arg(args: &PathArguments) -> Option<&Type> {
    match args {
        PathArguments::AngleBracketed(ab) if ab.args.len() == 1 => match ab.args.first()? {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        },
        _ => None,
    }
}

/// Extract the value type of a map. `HashMap` may carry a hasher third.
fn map_value_arg(args: &PathArguments) -> Option<&Type> {
    match args {
        PathArguments::AngleBracketed(ab) if ab.args.len() >= 2 => match ab.args.iter().nth(1)? {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        },
        _ => None,
    }
}
