//! Per-type field metadata generated by `#[derive(Mutable)]`.

/// Shape of a member as seen by the tracking engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Compared as a whole value.
    Scalar,
    /// A nested `Mutable` struct, possibly behind `Box` or `Shared`.
    Struct,
    /// An optional nested struct; `None` is the null pointer.
    Pointer,
    /// A `Vec` or map whose elements are nested structs.
    Collection,
}

impl FieldKind {
    /// True for members the setter may descend into and deep analysis applies to.
    #[inline]
    pub fn is_struct_like(&self) -> bool {
        matches!(self, FieldKind::Struct | FieldKind::Pointer)
    }

    /// True for members whose reset recurses into nested trackers.
    #[inline]
    pub fn has_nested(&self) -> bool {
        !matches!(self, FieldKind::Scalar)
    }
}

/// Metadata of a single struct member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared field name. Used as the key in change sets.
    pub name: &'static str,
    /// Name used by `set_value` paths (rename or serde alias, else `name`).
    pub external_name: &'static str,
    /// Excluded from analysis and from path resolution.
    pub ignored: bool,
    /// Compared recursively instead of as a whole value.
    pub deep: bool,
    /// Declared `pub`, so `set_value` may assign it.
    pub settable: bool,
    /// Member shape.
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// A non-ignored scalar member named `name`.
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            external_name: name,
            ignored: false,
            deep: false,
            settable: true,
            kind: FieldKind::Scalar,
        }
    }

    /// Set the external name.
    pub const fn external(mut self, external_name: &'static str) -> Self {
        self.external_name = external_name;
        self
    }

    /// Set the member kind.
    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Mark the member deep-tracked. Only struct-like kinds keep the flag.
    pub const fn deep(mut self, deep: bool) -> Self {
        self.deep = deep && matches!(self.kind, FieldKind::Struct | FieldKind::Pointer);
        self
    }

    /// Mark the member ignored.
    pub const fn ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }

    /// Mark whether the member may be assigned by `set_value`.
    pub const fn settable(mut self, settable: bool) -> Self {
        self.settable = settable;
        self
    }
}
