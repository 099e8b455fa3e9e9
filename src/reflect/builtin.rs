//! [`Reflect`] impls for std and third-party types.
//!
//! Primitive names follow the wire-model vocabulary used in the generated
//! documentation (`i32` is `Int32`, `uuid::Uuid` is `Guid`), so model names stay
//! stable regardless of which Rust integer or string type carries the value.

use super::{
    Construction, MemberInfo, Primitive, Reflect, SequenceFamily, TypeInfo, TypeInfoBuilder,
    TypeKind, TypeRef,
};
use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

macro_rules! primitive {
    ($($ty:ty => $name:literal, $primitive:ident;)*) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfoBuilder::new::<Self>($name, TypeKind::Primitive(Primitive::$primitive))
                        .build()
                }
            }
        )*
    };
}

primitive! {
    bool => "Boolean", Boolean;
    u8 => "Byte", Byte;
    i8 => "SByte", SByte;
    char => "Char", Char;
    i16 => "Int16", Int16;
    u16 => "UInt16", UInt16;
    i32 => "Int32", Int32;
    u32 => "UInt32", UInt32;
    i64 => "Int64", Int64;
    u64 => "UInt64", UInt64;
    f32 => "Single", Single;
    f64 => "Double", Double;
    String => "String", String;
    uuid::Uuid => "Guid", Guid;
    url::Url => "Uri", Uri;
    std::time::Duration => "TimeSpan", TimeSpan;
    chrono::DateTime<chrono::Utc> => "DateTime", DateTime;
    chrono::DateTime<chrono::FixedOffset> => "DateTimeOffset", DateTimeOffset;
    chrono::NaiveDate => "Date", Date;
}

impl Reflect for serde_json::Value {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>("Object", TypeKind::Any).build()
    }
}

impl<T: Reflect> Reflect for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>("Option", TypeKind::Nullable(TypeRef::of::<T>()))
            .generic_arg(TypeRef::of::<T>())
            .build()
    }
}

// Smart pointers are transparent: they document and sample as their target.
macro_rules! transparent {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $wrapper<T> {
                fn type_info() -> TypeInfo {
                    T::type_info()
                }

                fn type_identity() -> TypeId {
                    T::type_identity()
                }
            }
        )*
    };
}

transparent!(Box, Arc, Rc);

impl<T: Reflect> Reflect for [T] {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>("Array", TypeKind::Array(TypeRef::of::<T>())).build()
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_info() -> TypeInfo {
        <[T]>::type_info()
    }

    fn type_identity() -> TypeId {
        TypeId::of::<[T]>()
    }
}

macro_rules! sequence {
    ($($collection:ident => $name:literal, $family:ident;)*) => {
        $(
            impl<T: Reflect> Reflect for $collection<T> {
                fn type_info() -> TypeInfo {
                    TypeInfoBuilder::new::<Self>(
                        $name,
                        TypeKind::Sequence {
                            element: TypeRef::of::<T>(),
                            family: SequenceFamily::$family,
                        },
                    )
                    .generic_arg(TypeRef::of::<T>())
                    .build()
                }
            }
        )*
    };
}

sequence! {
    Vec => "Vec", List;
    VecDeque => "VecDeque", List;
    HashSet => "HashSet", Set;
    BTreeSet => "BTreeSet", Set;
}

macro_rules! map {
    ($($map:ident => $name:literal;)*) => {
        $(
            impl<K: Reflect, V: Reflect> Reflect for $map<K, V> {
                fn type_info() -> TypeInfo {
                    TypeInfoBuilder::new::<Self>(
                        $name,
                        TypeKind::Map {
                            key: TypeRef::of::<K>(),
                            value: TypeRef::of::<V>(),
                        },
                    )
                    .generic_args([TypeRef::of::<K>(), TypeRef::of::<V>()])
                    .build()
                }
            }
        )*
    };
}

map! {
    HashMap => "HashMap";
    BTreeMap => "BTreeMap";
}

impl Reflect for serde_json::Map<String, serde_json::Value> {
    fn type_info() -> TypeInfo {
        TypeInfoBuilder::new::<Self>(
            "Map",
            TypeKind::Map {
                key: TypeRef::of::<String>(),
                value: TypeRef::of::<serde_json::Value>(),
            },
        )
        .generic_args([
            TypeRef::of::<String>(),
            TypeRef::of::<serde_json::Value>(),
        ])
        .build()
    }
}

// Tuples expose their slots as read-only `Item1..ItemN` properties.
macro_rules! tuple {
    ($($slot:ident => $item:literal),+) => {
        impl<$($slot: Reflect),+> Reflect for ($($slot,)+) {
            fn type_info() -> TypeInfo {
                let slots = vec![$(TypeRef::of::<$slot>()),+];
                TypeInfoBuilder::new::<Self>("Tuple", TypeKind::Tuple(slots.clone()))
                    .generic_args(slots)
                    $(.member(MemberInfo::property($item, TypeRef::of::<$slot>(), false)))+
                    .construction(Construction::NoDefault)
                    .build()
            }
        }
    };
}

tuple!(A => "Item1");
tuple!(A => "Item1", B => "Item2");
tuple!(A => "Item1", B => "Item2", C => "Item3");
tuple!(A => "Item1", B => "Item2", C => "Item3", D => "Item4");
tuple!(A => "Item1", B => "Item2", C => "Item3", D => "Item4", E => "Item5");
tuple!(A => "Item1", B => "Item2", C => "Item3", D => "Item4", E => "Item5", F => "Item6");
tuple!(A => "Item1", B => "Item2", C => "Item3", D => "Item4", E => "Item5", F => "Item6", G => "Item7");
tuple!(A => "Item1", B => "Item2", C => "Item3", D => "Item4", E => "Item5", F => "Item6", G => "Item7", H => "Item8");
