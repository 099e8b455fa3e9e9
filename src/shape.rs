//! Structural classification shared by the description and sample generators.
//!
//! Both generators dispatch on [`Shape`]; neither inspects [`TypeKind`]
//! directly, so the "what kind of type is this" policy lives here only.

use crate::reflect::{Construction, Primitive, SequenceFamily, TypeInfo, TypeKind, TypeRef};

/// Where a [`Shape::List`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrigin {
    /// Concrete list or set type.
    Concrete,
    /// Abstract enumerable interface, materialized as a list.
    Interface,
    /// Legacy untyped enumerable.
    Untyped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Simple(Primitive),
    /// Untyped `object` placeholder.
    Any,
    Enum,
    Nullable(TypeRef),
    Array(TypeRef),
    List {
        element: TypeRef,
        origin: ListOrigin,
    },
    Dictionary {
        key: TypeRef,
        value: TypeRef,
    },
    KeyValuePair {
        key: TypeRef,
        value: TypeRef,
    },
    Tuple(Vec<TypeRef>),
    Queryable(TypeRef),
    /// Public, instantiable struct documented member by member.
    Complex,
    Unsupported,
}

impl Shape {
    /// Classifies `info`. Total: anything unrecognized is [`Shape::Unsupported`].
    #[must_use]
    pub fn of(info: &TypeInfo) -> Shape {
        let untyped = TypeRef::of::<serde_json::Value>;
        match &info.kind {
            TypeKind::Primitive(primitive) => Shape::Simple(*primitive),
            TypeKind::Any => Shape::Any,
            TypeKind::Enum(_) => Shape::Enum,
            TypeKind::Nullable(inner) => Shape::Nullable(*inner),
            TypeKind::Array(element) => Shape::Array(*element),
            TypeKind::Sequence { element, family } => match family {
                SequenceFamily::List | SequenceFamily::Set => Shape::List {
                    element: *element,
                    origin: ListOrigin::Concrete,
                },
                SequenceFamily::Interface => Shape::List {
                    element: *element,
                    origin: ListOrigin::Interface,
                },
                SequenceFamily::Queryable => Shape::Queryable(*element),
            },
            TypeKind::Map { key, value } => Shape::Dictionary {
                key: *key,
                value: *value,
            },
            TypeKind::KeyValuePair { key, value } => Shape::KeyValuePair {
                key: *key,
                value: *value,
            },
            TypeKind::Tuple(slots) => Shape::Tuple(slots.clone()),
            TypeKind::UntypedMap => Shape::Dictionary {
                key: untyped(),
                value: untyped(),
            },
            TypeKind::UntypedSequence => Shape::List {
                element: untyped(),
                origin: ListOrigin::Untyped,
            },
            TypeKind::Struct
                if info.is_public() && info.construction != Construction::Abstract =>
            {
                Shape::Complex
            }
            TypeKind::Struct => Shape::Unsupported,
        }
    }

    /// Element type of collection-like shapes.
    #[must_use]
    pub fn element(&self) -> Option<TypeRef> {
        match self {
            Shape::Array(element) | Shape::Queryable(element) => Some(*element),
            Shape::List { element, .. } => Some(*element),
            _ => None,
        }
    }
}
