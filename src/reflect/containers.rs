//! Container types with no direct std counterpart.
//!
//! [`KeyValuePair`] is a real serializable pair. The others are shape markers:
//! they let an API describe an abstract sequence, a lazy queryable, or a legacy
//! untyped container without committing to a concrete collection type.

use super::{
    Construction, MemberInfo, Reflect, SequenceFamily, TypeInfo, TypeInfoBuilder, TypeKind,
    TypeRef,
};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// A single key/value pair, serialized as `{"Key": .., "Value": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyValuePair<K, V> {
    #[serde(rename = "Key")]
    pub key: K,
    #[serde(rename = "Value")]
    pub value: V,
}

impl<K, V> KeyValuePair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: Reflect, V: Reflect> Reflect for KeyValuePair<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>(
            "KeyValuePair",
            TypeKind::KeyValuePair {
                key: TypeRef::of::<K>(),
                value: TypeRef::of::<V>(),
            },
        )
        .generic_args([TypeRef::of::<K>(), TypeRef::of::<V>()])
        .member(MemberInfo::property("Key", TypeRef::of::<K>(), false))
        .member(MemberInfo::property("Value", TypeRef::of::<V>(), false))
        .construction(Construction::NoDefault)
        .build()
    }
}

/// Abstract enumerable of `T`.
pub struct Sequence<T>(PhantomData<fn() -> T>);

impl<T: Reflect> Reflect for Sequence<T> {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>(
            "Sequence",
            TypeKind::Sequence {
                element: TypeRef::of::<T>(),
                family: SequenceFamily::Interface,
            },
        )
        .generic_arg(TypeRef::of::<T>())
        .construction(Construction::Abstract)
        .build()
    }
}

/// Lazily evaluated query over `T`.
pub struct Queryable<T>(PhantomData<fn() -> T>);

impl<T: Reflect> Reflect for Queryable<T> {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>(
            "Queryable",
            TypeKind::Sequence {
                element: TypeRef::of::<T>(),
                family: SequenceFamily::Queryable,
            },
        )
        .generic_arg(TypeRef::of::<T>())
        .construction(Construction::Abstract)
        .build()
    }
}

/// Non-generic list of untyped values.
pub struct UntypedList;

impl Reflect for UntypedList {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>("UntypedList", TypeKind::UntypedSequence)
            .construction(Construction::Abstract)
            .build()
    }
}

/// Non-generic dictionary of untyped keys and values.
pub struct UntypedMap;

impl Reflect for UntypedMap {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>("UntypedMap", TypeKind::UntypedMap)
            .construction(Construction::Abstract)
            .build()
    }
}
