use super::annotations::AnnotationRenderers;
use super::error::DescriptionError;
use super::name::model_name;
use super::strings::{format_template, HelpStrings};
use super::{
    EnumValueDescription, ModelDescription, ModelId, ModelKind, ParameterAnnotation,
    ParameterDescription,
};
use crate::config::HelpConfig;
use crate::documentation::{
    language_of, DocCommentProvider, ModelDocumentationProvider, OverlayDocumentationProvider,
};
use crate::reflect::{ConstraintKind, Marker, MemberInfo, Reflect, TypeInfo, TypeKind, TypeRef};
use crate::shape::Shape;
use serde_json::{json, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds and caches [`ModelDescription`]s for one documentation session.
///
/// Descriptions are memoized by model name (case-insensitive). A complex type
/// is registered before its members are described, so recursive graphs
/// terminate and a self-referential member resolves to its owner's id.
///
/// One generator serves one session (typically one locale). It is `Send` but
/// takes `&mut self`; share it across threads behind a lock, as
/// [`DocumentationSessions`](crate::sessions::DocumentationSessions) does.
pub struct ModelDescriptionGenerator {
    models: Vec<ModelDescription>,
    by_name: HashMap<String, ModelId>,
    provider: Box<dyn ModelDocumentationProvider>,
    annotations: Arc<AnnotationRenderers>,
    strings: HelpStrings,
}

impl ModelDescriptionGenerator {
    /// Generator with English templates and the builtin annotation renderers.
    pub fn new(provider: impl ModelDocumentationProvider + 'static) -> Self {
        Self::with_parts(
            Box::new(provider),
            Arc::new(AnnotationRenderers::default()),
            HelpStrings::default(),
        )
    }

    pub fn with_parts(
        provider: Box<dyn ModelDocumentationProvider>,
        annotations: Arc<AnnotationRenderers>,
        strings: HelpStrings,
    ) -> Self {
        Self {
            models: Vec::new(),
            by_name: HashMap::new(),
            provider,
            annotations,
            strings,
        }
    }

    /// Generator for `locale`: localized templates, doc comments in the
    /// locale's language, configured documentation overrides on top.
    pub fn for_locale(
        config: &HelpConfig,
        locale: &str,
        annotations: Arc<AnnotationRenderers>,
    ) -> Self {
        let lang = language_of(locale);
        let provider = OverlayDocumentationProvider::new(
            config.documentation.clone(),
            lang.clone(),
            Box::new(DocCommentProvider::new(lang)),
        );
        Self::with_parts(
            Box::new(provider),
            annotations,
            config.strings_for(locale).clone(),
        )
    }

    #[must_use]
    pub fn strings(&self) -> &HelpStrings {
        &self.strings
    }

    /// Shorthand for [`get_or_create_model_description`](Self::get_or_create_model_description).
    pub fn describe<T: Reflect + ?Sized>(&mut self) -> Result<Option<ModelId>, DescriptionError> {
        self.get_or_create_model_description(TypeRef::of::<T>())
    }

    /// Returns the cached description of `ty`, building it on first request.
    ///
    /// `Ok(None)` means the type is hidden from documentation (or is a
    /// container over a hidden type). Fails when another type already owns
    /// the computed model name.
    pub fn get_or_create_model_description(
        &mut self,
        ty: TypeRef,
    ) -> Result<Option<ModelId>, DescriptionError> {
        let (ty, info) = unwrap_nullable(ty);
        if info.has_marker(&Marker::ApiExplorerIgnore) {
            debug!(type_name = %info.full_name, "type hidden from documentation");
            return Ok(None);
        }

        let name = model_name(&info);
        if let Some(id) = self.cached(&name, ty, &info)? {
            return Ok(Some(id));
        }

        match Shape::of(&info) {
            Shape::Simple(primitive) => {
                let documentation = Some(primitive.default_documentation().to_string());
                Ok(Some(self.register(name, ty, documentation, ModelKind::Simple)))
            }
            Shape::Enum => Ok(Some(self.enum_description(name, ty, &info))),
            Shape::Array(element)
            | Shape::Queryable(element)
            | Shape::List { element, .. } => self.collection_description(name, ty, &info, element),
            Shape::Dictionary { key, value } => {
                self.pair_description(name, ty, &info, key, value, PairKind::Dictionary)
            }
            Shape::KeyValuePair { key, value } => {
                self.pair_description(name, ty, &info, key, value, PairKind::KeyValuePair)
            }
            Shape::Nullable(_)
            | Shape::Any
            | Shape::Tuple(_)
            | Shape::Complex
            | Shape::Unsupported => self.complex_description(name, ty, &info).map(Some),
        }
    }

    /// Looks up `name`, failing if a different type owns it.
    fn cached(
        &self,
        name: &str,
        ty: TypeRef,
        info: &TypeInfo,
    ) -> Result<Option<ModelId>, DescriptionError> {
        let Some(&id) = self.by_name.get(&name.to_lowercase()) else {
            return Ok(None);
        };
        let existing = &self.models[id.0];
        if existing.model_type != ty {
            let existing = existing.model_type.info().full_name.to_string();
            warn!(
                model = %name,
                existing = %existing,
                requested = %info.full_name,
                "duplicate model name"
            );
            return Err(DescriptionError::DuplicateModelName {
                name: name.to_string(),
                existing,
                requested: info.full_name.to_string(),
            });
        }
        Ok(Some(id))
    }

    fn register(
        &mut self,
        name: String,
        ty: TypeRef,
        documentation: Option<String>,
        kind: ModelKind,
    ) -> ModelId {
        let id = ModelId(self.models.len());
        debug!(model = %name, id = id.0, kind = kind.tag(), "registered model description");
        self.by_name.insert(name.to_lowercase(), id);
        self.models.push(ModelDescription {
            name,
            documentation,
            model_type: ty,
            kind,
        });
        id
    }

    fn enum_description(&mut self, name: String, ty: TypeRef, info: &TypeInfo) -> ModelId {
        let data_contract = info.is_data_contract();
        let values = info
            .enumerators()
            .iter()
            .filter(|enumerator| {
                is_displayed(&enumerator.markers, data_contract, Declared::Enumerator)
            })
            .map(|enumerator| EnumValueDescription {
                name: enumerator.name.to_string(),
                value: enumerator.value,
                documentation: self.provider.enumerator_documentation(info, enumerator),
            })
            .collect();
        let documentation = self.provider.type_documentation(info);
        self.register(name, ty, documentation, ModelKind::Enum { values })
    }

    fn collection_description(
        &mut self,
        name: String,
        ty: TypeRef,
        info: &TypeInfo,
        element: TypeRef,
    ) -> Result<Option<ModelId>, DescriptionError> {
        let Some(element) = self.get_or_create_model_description(element)? else {
            return Ok(None);
        };
        // The element graph may have reached this collection already.
        if let Some(id) = self.cached(&name, ty, info)? {
            return Ok(Some(id));
        }
        let documentation = format_template(&self.strings.collection, &[&self.models[element.0].name]);
        Ok(Some(self.register(
            name,
            ty,
            Some(documentation),
            ModelKind::Collection { element },
        )))
    }

    fn pair_description(
        &mut self,
        name: String,
        ty: TypeRef,
        info: &TypeInfo,
        key: TypeRef,
        value: TypeRef,
        pair: PairKind,
    ) -> Result<Option<ModelId>, DescriptionError> {
        let Some(key) = self.get_or_create_model_description(key)? else {
            return Ok(None);
        };
        let Some(value) = self.get_or_create_model_description(value)? else {
            return Ok(None);
        };
        if let Some(id) = self.cached(&name, ty, info)? {
            return Ok(Some(id));
        }
        let key_name = &self.models[key.0].name;
        let value_name = &self.models[value.0].name;
        let (documentation, kind) = match pair {
            PairKind::Dictionary => (
                format_template(&self.strings.dictionary, &[value_name, key_name]),
                ModelKind::Dictionary { key, value },
            ),
            PairKind::KeyValuePair => (
                format_template(&self.strings.key_value_pair, &[key_name, value_name]),
                ModelKind::KeyValuePair { key, value },
            ),
        };
        Ok(Some(self.register(name, ty, Some(documentation), kind)))
    }

    fn complex_description(
        &mut self,
        name: String,
        ty: TypeRef,
        info: &TypeInfo,
    ) -> Result<ModelId, DescriptionError> {
        let documentation = self.provider.type_documentation(info);
        let mark = self.models.len();
        let id = self.register(
            name,
            ty,
            documentation,
            ModelKind::Complex {
                properties: Vec::new(),
            },
        );

        match self.member_descriptions(info) {
            Ok(properties) => {
                self.models[id.0].kind = ModelKind::Complex { properties };
                Ok(id)
            }
            Err(err) => {
                // A failed complex type leaves nothing registered under it.
                self.rollback(mark);
                Err(err)
            }
        }
    }

    fn member_descriptions(
        &mut self,
        info: &TypeInfo,
    ) -> Result<Vec<ParameterDescription>, DescriptionError> {
        let data_contract = info.is_data_contract();
        let mut properties = Vec::new();
        for member in info.properties().chain(info.fields()) {
            if !is_displayed(&member.markers, data_contract, Declared::Member) {
                continue;
            }
            let type_description = self.get_or_create_model_description(member.ty)?;
            properties.push(ParameterDescription {
                name: member.wire_name(data_contract).to_string(),
                documentation: self.provider.member_documentation(info, member),
                type_description,
                annotations: self.annotations_for(member),
            });
        }
        Ok(properties)
    }

    fn rollback(&mut self, mark: usize) {
        debug!(kept = mark, dropped = self.models.len() - mark, "rolled back model descriptions");
        self.models.truncate(mark);
        self.by_name.retain(|_, id| id.0 < mark);
    }

    fn annotations_for(&self, member: &MemberInfo) -> Vec<ParameterAnnotation> {
        let mut annotations: Vec<ParameterAnnotation> = member
            .constraints()
            .filter_map(|constraint| {
                self.annotations
                    .render(constraint, &self.strings)
                    .map(|documentation| ParameterAnnotation {
                        kind: constraint.kind(),
                        documentation,
                    })
            })
            .collect();
        annotations.sort_by(|left, right| {
            match (
                left.kind == ConstraintKind::Required,
                right.kind == ConstraintKind::Required,
            ) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => left
                    .documentation
                    .to_uppercase()
                    .cmp(&right.documentation.to_uppercase()),
            }
        });
        annotations
    }

    #[must_use]
    pub fn get(&self, id: ModelId) -> Option<&ModelDescription> {
        self.models.get(id.0)
    }

    /// Case-insensitive lookup by model name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ModelId> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    /// Every description generated so far, in registration order.
    #[must_use]
    pub fn models(&self) -> &[ModelDescription] {
        &self.models
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Renders a description as JSON. Child descriptions are referenced by
    /// name rather than inlined, so cyclic graphs render finitely.
    #[must_use]
    pub fn render(&self, id: ModelId) -> Value {
        let Some(model) = self.get(id) else {
            return Value::Null;
        };
        let name_of = |id: ModelId| self.get(id).map(|model| model.name.clone());
        let mut rendered = json!({
            "name": model.name,
            "documentation": model.documentation,
            "kind": model.kind.tag(),
        });
        let extra = match &model.kind {
            ModelKind::Simple => json!({}),
            ModelKind::Enum { values } => json!({
                "values": values
                    .iter()
                    .map(|value| json!({
                        "name": value.name,
                        "value": value.value,
                        "documentation": value.documentation,
                    }))
                    .collect::<Vec<_>>(),
            }),
            ModelKind::Complex { properties } => json!({
                "properties": properties
                    .iter()
                    .map(|property| json!({
                        "name": property.name,
                        "documentation": property.documentation,
                        "type": property.type_description.and_then(name_of),
                        "annotations": property
                            .annotations
                            .iter()
                            .map(|annotation| annotation.documentation.clone())
                            .collect::<Vec<_>>(),
                    }))
                    .collect::<Vec<_>>(),
            }),
            ModelKind::Collection { element } => json!({ "elementType": name_of(*element) }),
            ModelKind::Dictionary { key, value } | ModelKind::KeyValuePair { key, value } => {
                json!({ "keyType": name_of(*key), "valueType": name_of(*value) })
            }
        };
        if let (Value::Object(target), Value::Object(extra)) = (&mut rendered, extra) {
            target.extend(extra);
        }
        rendered
    }
}

impl Index<ModelId> for ModelDescriptionGenerator {
    type Output = ModelDescription;

    fn index(&self, id: ModelId) -> &ModelDescription {
        &self.models[id.0]
    }
}

impl fmt::Debug for ModelDescriptionGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriptionGenerator")
            .field("models", &self.models.len())
            .field("annotations", &self.annotations)
            .finish()
    }
}

#[derive(Clone, Copy)]
enum PairKind {
    Dictionary,
    KeyValuePair,
}

fn unwrap_nullable(mut ty: TypeRef) -> (TypeRef, TypeInfo) {
    let mut info = ty.info();
    while let TypeKind::Nullable(inner) = info.kind {
        ty = inner;
        info = inner.info();
    }
    (ty, info)
}

#[derive(Clone, Copy)]
enum Declared {
    Member,
    Enumerator,
}

/// Whether a member or enumerator appears in generated documentation.
///
/// Under a data contract, struct members need `DataMember` and enumerators
/// need `EnumMember`.
fn is_displayed(markers: &[Marker], data_contract: bool, declared: Declared) -> bool {
    let excluded = markers.iter().any(|marker| {
        matches!(
            marker,
            Marker::JsonIgnore
                | Marker::XmlIgnore
                | Marker::IgnoreDataMember
                | Marker::NonSerialized
                | Marker::ApiExplorerIgnore
        )
    });
    let included = markers.iter().any(|marker| match declared {
        Declared::Member => matches!(marker, Marker::DataMember { .. }),
        Declared::Enumerator => matches!(marker, Marker::EnumMember),
    });
    !excluded && (!data_contract || included)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Constraint, EnumeratorInfo, TypeInfoBuilder};

    struct Rated;

    impl Reflect for Rated {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Rated", TypeKind::Struct)
                .member(
                    MemberInfo::field("Score", TypeRef::of::<i32>())
                        .with_marker(Marker::Constraint(Constraint::StringLength {
                            min: 1,
                            max: 5,
                        }))
                        .with_marker(Marker::Constraint(Constraint::Range {
                            min: 0.0,
                            max: 10.0,
                        }))
                        .with_marker(Marker::Constraint(Constraint::Required)),
                )
                .build()
        }
    }

    struct Level;

    impl Reflect for Level {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>(
                "Level",
                TypeKind::Enum(vec![
                    EnumeratorInfo::new("Low", 1).with_marker(Marker::EnumMember),
                    EnumeratorInfo::new("Secret", 2),
                    EnumeratorInfo::new("High", 3).with_marker(Marker::EnumMember),
                ]),
            )
            .marker(Marker::DataContract)
            .build()
        }
    }

    struct Tagged;

    impl Reflect for Tagged {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Tagged", TypeKind::Struct)
                .member(
                    MemberInfo::field("Tag", TypeRef::of::<String>())
                        .with_marker(Marker::Constraint(Constraint::DataType("_tag".into())))
                        .with_marker(Marker::Constraint(Constraint::RegularExpression(
                            "Zeta".into(),
                        ))),
                )
                .build()
        }
    }

    struct Contract;

    impl Reflect for Contract {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Contract", TypeKind::Struct)
                .marker(Marker::DataContract)
                .member(
                    MemberInfo::field("Id", TypeRef::of::<i32>())
                        .with_marker(Marker::DataMember { name: None }),
                )
                .member(
                    MemberInfo::field("Flag", TypeRef::of::<bool>())
                        .with_marker(Marker::EnumMember),
                )
                .build()
        }
    }

    struct Mode;

    impl Reflect for Mode {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>(
                "Mode",
                TypeKind::Enum(vec![
                    EnumeratorInfo::new("On", 1).with_marker(Marker::EnumMember),
                    EnumeratorInfo::new("Off", 0).with_marker(Marker::DataMember { name: None }),
                ]),
            )
            .marker(Marker::DataContract)
            .build()
        }
    }

    struct Shadow;

    impl Reflect for Shadow {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Rated", TypeKind::Struct).build()
        }
    }

    struct Outer;

    impl Reflect for Outer {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Outer", TypeKind::Struct)
                .member(MemberInfo::field("Count", TypeRef::of::<u64>()))
                .member(MemberInfo::field("Inner", TypeRef::of::<Middle>()))
                .build()
        }
    }

    struct Middle;

    impl Reflect for Middle {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Middle", TypeKind::Struct)
                .member(MemberInfo::field("Shadow", TypeRef::of::<Shadow>()))
                .build()
        }
    }

    fn generator() -> ModelDescriptionGenerator {
        ModelDescriptionGenerator::new(DocCommentProvider::default())
    }

    #[test]
    fn test_annotations_required_first_then_alphabetical() {
        let mut generator = generator();
        let id = generator.describe::<Rated>().unwrap().unwrap();
        let ModelKind::Complex { properties } = &generator[id].kind else {
            panic!("expected complex");
        };
        let texts: Vec<_> = properties[0]
            .annotations
            .iter()
            .map(|annotation| annotation.documentation.as_str())
            .collect();
        assert_eq!(
            texts,
            [
                "Required",
                "Range: inclusive between 0 and 10",
                "String length: inclusive between 1 and 5"
            ]
        );
    }

    #[test]
    fn test_enum_data_contract_filters_values() {
        let mut generator = generator();
        let id = generator.describe::<Level>().unwrap().unwrap();
        let ModelKind::Enum { values } = &generator[id].kind else {
            panic!("expected enum");
        };
        let names: Vec<_> = values.iter().map(|value| value.name.as_str()).collect();
        assert_eq!(names, ["Low", "High"]);
        assert_eq!(values[1].value, 3);
    }

    #[test]
    fn test_nullable_is_unwrapped() {
        let mut generator = generator();
        let plain = generator.describe::<i64>().unwrap();
        let wrapped = generator.describe::<Option<Option<i64>>>().unwrap();
        assert_eq!(plain, wrapped);
        assert_eq!(generator.len(), 1);
    }

    #[test]
    fn test_render_references_children_by_name() {
        let mut generator = generator();
        let id = generator
            .describe::<HashMap<String, Vec<i32>>>()
            .unwrap()
            .unwrap();
        assert_eq!(
            generator.render(id),
            json!({
                "name": "HashMapOfStringAndVecOfInt32",
                "documentation": "A dictionary of VecOfInt32 keyed by String",
                "kind": "dictionary",
                "keyType": "String",
                "valueType": "VecOfInt32",
            })
        );
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let mut generator = generator();
        let id = generator.describe::<String>().unwrap();
        assert_eq!(generator.find("string"), id);
        assert_eq!(generator.find("STRING"), id);
    }

    #[test]
    fn test_annotations_compare_uppercase_forms() {
        let strings = HelpStrings {
            data_type: "{0}".into(),
            regular_expression: "{0}".into(),
            ..HelpStrings::default()
        };
        let mut generator = ModelDescriptionGenerator::with_parts(
            Box::new(DocCommentProvider::default()),
            Arc::new(AnnotationRenderers::default()),
            strings,
        );
        let id = generator.describe::<Tagged>().unwrap().unwrap();
        let ModelKind::Complex { properties } = &generator[id].kind else {
            panic!("expected complex");
        };
        let texts: Vec<_> = properties[0]
            .annotations
            .iter()
            .map(|annotation| annotation.documentation.as_str())
            .collect();
        assert_eq!(texts, ["Zeta", "_tag"]);
    }

    #[test]
    fn test_data_contract_inclusion_marker_matches_declaration() {
        let mut generator = generator();
        let id = generator.describe::<Contract>().unwrap().unwrap();
        let ModelKind::Complex { properties } = &generator[id].kind else {
            panic!("expected complex");
        };
        let names: Vec<_> = properties.iter().map(|property| property.name.as_str()).collect();
        assert_eq!(names, ["Id"]);

        let id = generator.describe::<Mode>().unwrap().unwrap();
        let ModelKind::Enum { values } = &generator[id].kind else {
            panic!("expected enum");
        };
        let names: Vec<_> = values.iter().map(|value| value.name.as_str()).collect();
        assert_eq!(names, ["On"]);
    }

    #[test]
    fn test_failed_complex_type_is_rolled_back() {
        let mut generator = generator();
        generator.describe::<Rated>().unwrap().unwrap();
        let before = generator.len();

        for _ in 0..2 {
            let err = generator.describe::<Outer>().unwrap_err();
            assert!(matches!(
                err,
                DescriptionError::DuplicateModelName { ref name, .. } if name == "Rated"
            ));
            assert_eq!(generator.len(), before);
            assert_eq!(generator.find("Outer"), None);
            assert_eq!(generator.find("Middle"), None);
            assert_eq!(generator.find("UInt64"), None);
        }
        assert!(generator.find("Rated").is_some());
    }
}
