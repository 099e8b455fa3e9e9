use super::{
    Construction, Docs, Marker, MemberInfo, Reflect, Text, TypeInfo, TypeKind, TypeRef, Visibility,
};
use smallvec::SmallVec;

/// Builder for [`TypeInfo`]
///
/// Used by hand-written [`Reflect`] impls and by the `Describe` derive.
///
/// # Example
///
/// ```rust
/// use apihelp::reflect::{Marker, Reflect, TypeInfo, TypeInfoBuilder, TypeKind};
///
/// struct Suffer;
///
/// impl Reflect for Suffer {
///     fn type_info() -> TypeInfo {
///         TypeInfoBuilder::new::<Self>("Suffer", TypeKind::Struct)
///             .marker(Marker::DisplayName("Joy".into()))
///             .build()
///     }
/// }
///
/// assert_eq!(Suffer::type_info().display_name(), Some("Joy"));
/// ```
#[derive(Debug, Clone)]
pub struct TypeInfoBuilder {
    info: TypeInfo,
}

impl TypeInfoBuilder {
    /// Starts metadata for `T` with the given raw name and kind.
    #[must_use]
    pub fn new<T: Reflect + ?Sized>(name: impl Into<Text>, kind: TypeKind) -> Self {
        Self {
            info: TypeInfo {
                id: T::type_identity(),
                name: name.into(),
                full_name: Text::Borrowed(std::any::type_name::<T>()),
                generic_args: SmallVec::new(),
                kind,
                markers: Vec::new(),
                members: Vec::new(),
                construction: Construction::Default,
                visibility: Visibility::Public,
                docs: Docs::default(),
            },
        }
    }

    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<Text>) -> Self {
        self.info.full_name = full_name.into();
        self
    }

    #[must_use]
    pub fn generic_arg(mut self, arg: TypeRef) -> Self {
        self.info.generic_args.push(arg);
        self
    }

    #[must_use]
    pub fn generic_args(mut self, args: impl IntoIterator<Item = TypeRef>) -> Self {
        self.info.generic_args.extend(args);
        self
    }

    #[must_use]
    pub fn marker(mut self, marker: Marker) -> Self {
        self.info.markers.push(marker);
        self
    }

    #[must_use]
    pub fn member(mut self, member: MemberInfo) -> Self {
        self.info.members.push(member);
        self
    }

    #[must_use]
    pub fn doc(mut self, text: impl Into<Text>) -> Self {
        self.info.docs.summary = Some(text.into());
        self
    }

    #[must_use]
    pub fn localized_doc(mut self, lang: impl Into<Text>, text: impl Into<Text>) -> Self {
        self.info.docs.localized.push((lang.into(), text.into()));
        self
    }

    #[must_use]
    pub fn construction(mut self, construction: Construction) -> Self {
        self.info.construction = construction;
        self
    }

    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.info.visibility = visibility;
        self
    }

    #[must_use]
    pub fn build(self) -> TypeInfo {
        self.info
    }
}
