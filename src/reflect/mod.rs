//! # Reflect Module
//!
//! Type metadata for the description and sample generators.
//!
//! Rust has no runtime reflection, so every documentable type implements
//! [`Reflect`], usually through `#[derive(Describe)]`. The trait produces a
//! [`TypeInfo`]: the raw name, generic arguments, structural kind, members,
//! markers (the attribute vocabulary: ignore flags, data contracts, renames,
//! validation constraints) and doc comments of the type.
//!
//! Member types are referenced through [`TypeRef`], a lazy handle that only
//! builds the referenced [`TypeInfo`] when asked. That keeps recursive type
//! graphs (`struct Node { next: Option<Box<Node>> }`) finite to declare.
//!
//! ## Example
//!
//! ```rust
//! use apihelp::reflect::{Reflect, TypeInfo, TypeInfoBuilder, TypeKind, MemberInfo, TypeRef};
//!
//! struct Contact {
//!     phone: String,
//! }
//!
//! impl Reflect for Contact {
//!     fn type_info() -> TypeInfo {
//!         TypeInfoBuilder::new::<Self>("Contact", TypeKind::Struct)
//!             .doc("Contact DTO")
//!             .member(MemberInfo::field("Phone", TypeRef::of::<String>()))
//!             .build()
//!     }
//! }
//!
//! let info = TypeRef::of::<Contact>().info();
//! assert_eq!(info.name, "Contact");
//! assert_eq!(info.members.len(), 1);
//! ```

mod builder;
mod builtin;
mod containers;

pub use builder::TypeInfoBuilder;
pub use containers::{KeyValuePair, Queryable, Sequence, UntypedList, UntypedMap};

use smallvec::SmallVec;
use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Static text carried by type metadata. Borrowed for derive output,
/// owned when metadata is assembled at runtime.
pub type Text = Cow<'static, str>;

/// Implemented by every type that can be documented or sampled.
pub trait Reflect: 'static {
    /// Builds the metadata describing this type.
    fn type_info() -> TypeInfo;

    /// Identity used for cache and override lookups.
    ///
    /// Defaults to the [`TypeId`] of `Self`. Fixed-size arrays override this so
    /// that `[T; 2]`, `[T; 3]` and `Box<[T]>` are one documented type.
    fn type_identity() -> TypeId {
        TypeId::of::<Self>()
    }
}

/// Lazy, copyable handle to a reflectable type.
#[derive(Clone, Copy)]
pub struct TypeRef {
    identity: fn() -> TypeId,
    info: fn() -> TypeInfo,
}

impl TypeRef {
    /// Handle for `T`.
    #[must_use]
    pub fn of<T: Reflect + ?Sized>() -> Self {
        Self {
            identity: T::type_identity,
            info: T::type_info,
        }
    }

    /// Identity of the referenced type.
    #[must_use]
    pub fn id(&self) -> TypeId {
        (self.identity)()
    }

    /// Builds the metadata of the referenced type.
    #[must_use]
    pub fn info(&self) -> TypeInfo {
        (self.info)()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.info().full_name).finish()
    }
}

/// Leaf scalar types with builtin documentation and sample values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    SByte,
    Char,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    /// Fixed-point decimal. No builtin impl maps here; hand-written impls for
    /// decimal types (such as `rust_decimal::Decimal`) use it.
    Decimal,
    String,
    Guid,
    Uri,
    TimeSpan,
    DateTime,
    DateTimeOffset,
    Date,
}

impl Primitive {
    /// One-line documentation used for simple type model descriptions.
    #[must_use]
    pub const fn default_documentation(self) -> &'static str {
        match self {
            Primitive::Int16 | Primitive::Int32 | Primitive::Int64 => "integer",
            Primitive::UInt16 | Primitive::UInt32 | Primitive::UInt64 => "unsigned integer",
            Primitive::Byte => "byte",
            Primitive::Char => "character",
            Primitive::SByte => "signed byte",
            Primitive::Uri => "URI",
            Primitive::Single | Primitive::Double | Primitive::Decimal => "decimal number",
            Primitive::String => "string",
            Primitive::Guid => "globally unique identifier",
            Primitive::TimeSpan => "time interval",
            Primitive::DateTime | Primitive::DateTimeOffset | Primitive::Date => "date",
            Primitive::Boolean => "boolean",
        }
    }
}

/// Which kind of sequence a [`TypeKind::Sequence`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceFamily {
    /// Concrete growable list (`Vec`, `VecDeque`).
    List,
    /// Concrete set (`HashSet`, `BTreeSet`).
    Set,
    /// Abstract enumerable interface with no concrete representation.
    Interface,
    /// Lazily evaluated queryable sequence.
    Queryable,
}

/// Structural facts about a type, as reflection would report them.
#[derive(Debug, Clone)]
pub enum TypeKind {
    Primitive(Primitive),
    /// Untyped `object` placeholder.
    Any,
    Enum(Vec<EnumeratorInfo>),
    Array(TypeRef),
    Nullable(TypeRef),
    Sequence {
        element: TypeRef,
        family: SequenceFamily,
    },
    Map {
        key: TypeRef,
        value: TypeRef,
    },
    KeyValuePair {
        key: TypeRef,
        value: TypeRef,
    },
    Tuple(Vec<TypeRef>),
    /// Legacy non-generic dictionary.
    UntypedMap,
    /// Legacy non-generic enumerable.
    UntypedSequence,
    Struct,
}

/// How an instance of the type can be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Construction {
    /// Parameterless (or zero-value) construction is available.
    #[default]
    Default,
    /// The type exists but has no parameterless constructor.
    NoDefault,
    /// Interface or abstract type: never instantiated directly.
    Abstract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

/// Doc comments attached to a type, member or enumerator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Docs {
    /// Language-neutral summary.
    pub summary: Option<Text>,
    /// Summaries keyed by two-letter language code.
    pub localized: Vec<(Text, Text)>,
}

impl Docs {
    /// Summary for `lang`, falling back to the neutral summary.
    #[must_use]
    pub fn for_language(&self, lang: Option<&str>) -> Option<&str> {
        if let Some(lang) = lang {
            if let Some((_, text)) = self
                .localized
                .iter()
                .find(|(candidate, _)| candidate.eq_ignore_ascii_case(lang))
            {
                return Some(text.trim());
            }
        }
        self.summary.as_deref().map(str::trim)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.localized.is_empty()
    }
}

/// Validation constraint declared on a member.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Required,
    Range { min: f64, max: f64 },
    MinLength(usize),
    MaxLength(usize),
    StringLength { min: usize, max: usize },
    DataType(Text),
    RegularExpression(Text),
    /// Constraint rendered by a renderer registered under `name`.
    Custom { name: Text, args: Vec<Text> },
}

/// Key of the annotation renderer table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Required,
    Range,
    MinLength,
    MaxLength,
    StringLength,
    DataType,
    RegularExpression,
    Custom(Text),
}

impl Constraint {
    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Required => ConstraintKind::Required,
            Constraint::Range { .. } => ConstraintKind::Range,
            Constraint::MinLength(_) => ConstraintKind::MinLength,
            Constraint::MaxLength(_) => ConstraintKind::MaxLength,
            Constraint::StringLength { .. } => ConstraintKind::StringLength,
            Constraint::DataType(_) => ConstraintKind::DataType,
            Constraint::RegularExpression(_) => ConstraintKind::RegularExpression,
            Constraint::Custom { name, .. } => ConstraintKind::Custom(name.clone()),
        }
    }
}

/// Attribute-like metadata attached to types, members and enumerators.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// Overrides the documented model name of a type.
    DisplayName(Text),
    JsonIgnore,
    XmlIgnore,
    IgnoreDataMember,
    NonSerialized,
    /// Hidden from API documentation, still present on the wire.
    ApiExplorerIgnore,
    /// Only members marked [`Marker::DataMember`] / [`Marker::EnumMember`] are serialized.
    DataContract,
    DataMember {
        name: Option<Text>,
    },
    EnumMember,
    /// Wire name of a member.
    JsonProperty {
        name: Text,
    },
    Constraint(Constraint),
}

/// How a member is exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Property { writable: bool },
    Field,
}

/// A public instance property or field.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub name: Text,
    pub kind: MemberKind,
    pub ty: TypeRef,
    pub markers: Vec<Marker>,
    pub docs: Docs,
}

impl MemberInfo {
    #[must_use]
    pub fn field(name: impl Into<Text>, ty: TypeRef) -> Self {
        Self::new(name, MemberKind::Field, ty)
    }

    #[must_use]
    pub fn property(name: impl Into<Text>, ty: TypeRef, writable: bool) -> Self {
        Self::new(name, MemberKind::Property { writable }, ty)
    }

    fn new(name: impl Into<Text>, kind: MemberKind, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            markers: Vec::new(),
            docs: Docs::default(),
        }
    }

    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    #[must_use]
    pub fn with_doc(mut self, text: impl Into<Text>) -> Self {
        self.docs.summary = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_localized_doc(mut self, lang: impl Into<Text>, text: impl Into<Text>) -> Self {
        self.docs.localized.push((lang.into(), text.into()));
        self
    }

    #[must_use]
    pub fn is_property(&self) -> bool {
        matches!(self.kind, MemberKind::Property { .. })
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        match self.kind {
            MemberKind::Property { writable } => writable,
            MemberKind::Field => true,
        }
    }

    #[must_use]
    pub fn has_marker(&self, marker: &Marker) -> bool {
        self.markers.contains(marker)
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.markers.iter().filter_map(|marker| match marker {
            Marker::Constraint(constraint) => Some(constraint),
            _ => None,
        })
    }

    /// Name of the member on the wire.
    ///
    /// A json-property rename wins; under a data contract a named data-member
    /// is used next; otherwise the declared name.
    #[must_use]
    pub fn wire_name(&self, data_contract: bool) -> &str {
        for marker in &self.markers {
            if let Marker::JsonProperty { name } = marker {
                if !name.is_empty() {
                    return name;
                }
            }
        }
        if data_contract {
            for marker in &self.markers {
                if let Marker::DataMember { name: Some(name) } = marker {
                    if !name.is_empty() {
                        return name;
                    }
                }
            }
        }
        &self.name
    }

    /// Whether a JSON serializer writes this member.
    #[must_use]
    pub fn is_serialized(&self, data_contract: bool) -> bool {
        let ignored = self.markers.iter().any(|marker| {
            matches!(
                marker,
                Marker::JsonIgnore | Marker::NonSerialized | Marker::IgnoreDataMember
            )
        });
        let has_data_member = self
            .markers
            .iter()
            .any(|marker| matches!(marker, Marker::DataMember { .. }));
        !ignored && (!data_contract || has_data_member)
    }
}

/// One declared enumerator.
#[derive(Debug, Clone)]
pub struct EnumeratorInfo {
    pub name: Text,
    pub value: i64,
    pub markers: Vec<Marker>,
    pub docs: Docs,
}

impl EnumeratorInfo {
    #[must_use]
    pub fn new(name: impl Into<Text>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            markers: Vec::new(),
            docs: Docs::default(),
        }
    }

    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    #[must_use]
    pub fn with_doc(mut self, text: impl Into<Text>) -> Self {
        self.docs.summary = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_localized_doc(mut self, lang: impl Into<Text>, text: impl Into<Text>) -> Self {
        self.docs.localized.push((lang.into(), text.into()));
        self
    }
}

/// Everything the generators know about a type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub id: TypeId,
    /// Raw name without generic arguments (e.g. `HashMap`, `Contact`).
    pub name: Text,
    /// Fully qualified Rust type name.
    pub full_name: Text,
    pub generic_args: SmallVec<[TypeRef; 2]>,
    pub kind: TypeKind,
    pub markers: Vec<Marker>,
    /// Members in declaration order.
    pub members: Vec<MemberInfo>,
    pub construction: Construction,
    pub visibility: Visibility,
    pub docs: Docs,
}

impl TypeInfo {
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_args.is_empty()
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    #[must_use]
    pub fn has_marker(&self, marker: &Marker) -> bool {
        self.markers.contains(marker)
    }

    /// Non-blank display-name override, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.markers.iter().find_map(|marker| match marker {
            Marker::DisplayName(name) if !name.trim().is_empty() => Some(name.as_ref()),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_data_contract(&self) -> bool {
        self.has_marker(&Marker::DataContract)
    }

    /// Public instance properties in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(|member| member.is_property())
    }

    /// Public instance fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.iter().filter(|member| !member.is_property())
    }

    /// Declared enumerators; empty for non-enum types.
    #[must_use]
    pub fn enumerators(&self) -> &[EnumeratorInfo] {
        match &self.kind {
            TypeKind::Enum(values) => values,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_docs_prefer_language() {
        let docs = Docs {
            summary: Some(" Person's email ".into()),
            localized: vec![("ru".into(), "Адрес электронной почты".into())],
        };
        assert_eq!(docs.for_language(Some("ru")), Some("Адрес электронной почты"));
        assert_eq!(docs.for_language(Some("de")), Some("Person's email"));
        assert_eq!(docs.for_language(None), Some("Person's email"));
    }

    #[test]
    fn test_wire_name_precedence() {
        let member = MemberInfo::field("phone", TypeRef::of::<String>())
            .with_marker(Marker::DataMember {
                name: Some("tel".into()),
            });
        assert_eq!(member.wire_name(true), "tel");
        assert_eq!(member.wire_name(false), "phone");

        let renamed = member.with_marker(Marker::JsonProperty {
            name: "phoneNumber".into(),
        });
        assert_eq!(renamed.wire_name(true), "phoneNumber");
    }

    #[test]
    fn test_serialized_members() {
        let plain = MemberInfo::field("a", TypeRef::of::<i32>());
        assert!(plain.is_serialized(false));
        assert!(!plain.is_serialized(true));

        let ignored = MemberInfo::field("b", TypeRef::of::<i32>()).with_marker(Marker::JsonIgnore);
        assert!(!ignored.is_serialized(false));
    }

    #[test]
    fn test_type_ref_identity() {
        assert_eq!(TypeRef::of::<i32>(), TypeRef::of::<i32>());
        assert_ne!(TypeRef::of::<i32>(), TypeRef::of::<i64>());
        assert_eq!(TypeRef::of::<[u8; 2]>(), TypeRef::of::<Box<[u8]>>());
    }

    #[test]
    fn test_hand_written_decimal() {
        struct Money;

        impl Reflect for Money {
            fn type_info() -> TypeInfo {
                TypeInfoBuilder::new::<Self>("Decimal", TypeKind::Primitive(Primitive::Decimal))
                    .build()
            }
        }

        let info = TypeRef::of::<Money>().info();
        assert_eq!(info.name, "Decimal");
        match info.kind {
            TypeKind::Primitive(primitive) => {
                assert_eq!(primitive.default_documentation(), "decimal number");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
