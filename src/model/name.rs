use crate::reflect::{TypeInfo, TypeKind};

/// Computes the documented model name of a type.
///
/// In priority order: a non-blank display-name marker, `ArrayOf` + the element
/// name for arrays, `<base>Of<Arg1>And<Arg2>..` for generic types, otherwise
/// the raw type name.
///
/// ```rust
/// use apihelp::model::model_name;
/// use apihelp::reflect::Reflect;
/// use std::collections::HashMap;
///
/// assert_eq!(model_name(&<[i32; 4]>::type_info()), "ArrayOfInt32");
/// assert_eq!(
///     model_name(&HashMap::<String, Vec<u8>>::type_info()),
///     "HashMapOfStringAndVecOfByte"
/// );
/// ```
#[must_use]
pub fn model_name(info: &TypeInfo) -> String {
    if let Some(display_name) = info.display_name() {
        return display_name.to_string();
    }
    if let TypeKind::Array(element) = &info.kind {
        return format!("ArrayOf{}", model_name(&element.info()));
    }
    if info.is_generic() {
        let base = info
            .name
            .split_once('`')
            .map_or(info.name.as_ref(), |(base, _)| base);
        let args: Vec<String> = info
            .generic_args
            .iter()
            .map(|arg| model_name(&arg.info()))
            .collect();
        return format!("{}Of{}", base, args.join("And"));
    }
    info.name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{KeyValuePair, Marker, Reflect, TypeInfoBuilder, TypeRef};

    struct Pair<A, B>(std::marker::PhantomData<(A, B)>);

    impl<A: Reflect, B: Reflect> Reflect for Pair<A, B> {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Pair`2", TypeKind::Struct)
                .generic_args([TypeRef::of::<A>(), TypeRef::of::<B>()])
                .build()
        }
    }

    struct Renamed;

    impl Reflect for Renamed {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Renamed", TypeKind::Struct)
                .marker(Marker::DisplayName("  ".into()))
                .build()
        }
    }

    #[test]
    fn test_arity_suffix_is_stripped() {
        assert_eq!(model_name(&Pair::<i32, String>::type_info()), "PairOfInt32AndString");
    }

    #[test]
    fn test_blank_display_name_is_ignored() {
        assert_eq!(model_name(&Renamed::type_info()), "Renamed");
    }

    #[test]
    fn test_nested_generics() {
        assert_eq!(
            model_name(&Vec::<KeyValuePair<u16, Option<bool>>>::type_info()),
            "VecOfKeyValuePairOfUInt16AndOptionOfBoolean"
        );
        assert_eq!(
            model_name(&<[Pair<i32, String>; 2]>::type_info()),
            "ArrayOfPairOfInt32AndString"
        );
    }
}
