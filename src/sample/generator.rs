use super::{ObjectId, SampleConfig, SampleRegistry, SampleValue, SimpleSampleGenerator};
use crate::model::model_name;
use crate::reflect::{Construction, Reflect, TypeInfo, TypeRef};
use crate::shape::Shape;
use std::any::TypeId;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::debug;

/// Why a subtree produced no sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    /// Abstract, internal or otherwise unrecognized type.
    Unsupported,
    /// Struct without default construction.
    NotConstructible,
    /// Enum with no enumerators.
    NoEnumerators,
    /// Every slot of a container was empty.
    AllSlotsEmpty,
    /// A dictionary key could not be generated.
    KeyUnavailable,
    /// A registered factory panicked.
    FactoryPanicked,
}

/// Objects currently being populated, by type, on the path from the root.
type Constructing = HashMap<TypeId, ObjectId>;

/// Generates sample values for types.
///
/// Overrides from the shared [`SampleRegistry`] win over everything else. The
/// simple-type counter lives on the generator, so samples keep changing across
/// calls. A struct that is reached again while its own members are being
/// generated yields [`SampleValue::Reference`] to the enclosing object.
#[derive(Debug, Clone)]
pub struct ObjectGenerator {
    overrides: Arc<SampleRegistry>,
    config: SampleConfig,
    simple: SimpleSampleGenerator,
    next_object: u32,
}

impl Default for ObjectGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SampleRegistry::default()), SampleConfig::default())
    }
}

impl ObjectGenerator {
    #[must_use]
    pub fn new(overrides: Arc<SampleRegistry>, config: SampleConfig) -> Self {
        Self {
            overrides,
            config,
            simple: SimpleSampleGenerator::default(),
            next_object: 0,
        }
    }

    /// Replaces the simple-type generator, e.g. to pin the reference time.
    #[must_use]
    pub fn with_simple(mut self, simple: SimpleSampleGenerator) -> Self {
        self.simple = simple;
        self
    }

    #[must_use]
    pub fn config(&self) -> SampleConfig {
        self.config
    }

    /// Shorthand for [`generate`](Self::generate).
    pub fn sample<T: Reflect + ?Sized>(&mut self) -> Option<SampleValue> {
        self.generate(TypeRef::of::<T>())
    }

    /// Sample for `ty`, or `None` when nothing meaningful can be produced.
    pub fn generate(&mut self, ty: TypeRef) -> Option<SampleValue> {
        self.next_object = 0;
        let mut constructing = Constructing::new();
        match self.generate_value(ty, &mut constructing) {
            Ok(SampleValue::Null) => None,
            Ok(value) => Some(value),
            Err(skip) => {
                debug!(type_name = ?ty, reason = ?skip, "no sample generated");
                None
            }
        }
    }

    fn generate_value(
        &mut self,
        ty: TypeRef,
        constructing: &mut Constructing,
    ) -> Result<SampleValue, Skip> {
        if let Some(value) = self.registered(ty)? {
            return Ok(value);
        }

        let info = ty.info();
        match Shape::of(&info) {
            Shape::Simple(primitive) => Ok(self.simple.generate(primitive)),
            Shape::Any => Ok(SampleValue::Object {
                id: None,
                type_name: info.name.to_string(),
                fields: Vec::new(),
            }),
            Shape::Enum => info
                .enumerators()
                .first()
                .map(|enumerator| SampleValue::Enum {
                    name: enumerator.name.to_string(),
                    value: enumerator.value,
                })
                .ok_or(Skip::NoEnumerators),
            Shape::Nullable(inner) => self.generate_value(inner, constructing),
            Shape::Array(element)
            | Shape::Queryable(element)
            | Shape::List { element, .. } => self
                .generate_collection(element, constructing)
                .map(SampleValue::Array),
            Shape::Dictionary { key, value } => self.generate_dictionary(key, value, constructing),
            Shape::KeyValuePair { key, value } => {
                let key = self.generate_slot(key, constructing);
                let value = self.generate_slot(value, constructing);
                if key.is_null() && value.is_null() {
                    return Err(Skip::AllSlotsEmpty);
                }
                Ok(SampleValue::Pair {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            Shape::Tuple(slots) => {
                let values: Vec<SampleValue> = slots
                    .into_iter()
                    .map(|slot| self.generate_slot(slot, constructing))
                    .collect();
                non_empty(values).map(SampleValue::Tuple)
            }
            Shape::Complex => self.generate_complex(ty, &info, constructing),
            Shape::Unsupported => Err(Skip::Unsupported),
        }
    }

    /// Registered override, if any. A panicking factory counts as a skip.
    fn registered(&self, ty: TypeRef) -> Result<Option<SampleValue>, Skip> {
        if !self.overrides.contains(ty) {
            return Ok(None);
        }
        let overrides = &self.overrides;
        catch_unwind(AssertUnwindSafe(|| overrides.get(ty))).map_err(|_| Skip::FactoryPanicked)
    }

    /// One independent slot of a container or object; failures become `Null`.
    fn generate_slot(&mut self, ty: TypeRef, constructing: &mut Constructing) -> SampleValue {
        self.generate_value(ty, constructing).unwrap_or_else(|skip| {
            debug!(type_name = ?ty, reason = ?skip, "sample slot left empty");
            SampleValue::Null
        })
    }

    fn generate_collection(
        &mut self,
        element: TypeRef,
        constructing: &mut Constructing,
    ) -> Result<Vec<SampleValue>, Skip> {
        let items = (0..self.config.collection_size)
            .map(|_| self.generate_slot(element, constructing))
            .collect();
        non_empty(items)
    }

    /// Keys are generated one at a time; a key that cannot be generated drops
    /// the whole dictionary and a duplicate key is skipped, not retried.
    fn generate_dictionary(
        &mut self,
        key: TypeRef,
        value: TypeRef,
        constructing: &mut Constructing,
    ) -> Result<SampleValue, Skip> {
        let mut entries: Vec<(SampleValue, SampleValue)> = Vec::new();
        for _ in 0..self.config.collection_size {
            let candidate = match self.generate_value(key, constructing) {
                Ok(candidate) if !candidate.is_null() => candidate,
                _ => return Err(Skip::KeyUnavailable),
            };
            if entries.iter().any(|(existing, _)| *existing == candidate) {
                continue;
            }
            let entry_value = self.generate_slot(value, constructing);
            entries.push((candidate, entry_value));
        }
        Ok(SampleValue::Map(entries))
    }

    fn generate_complex(
        &mut self,
        ty: TypeRef,
        info: &TypeInfo,
        constructing: &mut Constructing,
    ) -> Result<SampleValue, Skip> {
        if let Some(&id) = constructing.get(&ty.id()) {
            return Ok(SampleValue::Reference(id));
        }
        if info.construction != Construction::Default {
            return Err(Skip::NotConstructible);
        }

        self.next_object += 1;
        let id = ObjectId(self.next_object);
        constructing.insert(ty.id(), id);

        let data_contract = info.is_data_contract();
        let mut fields = Vec::new();
        let members = info
            .properties()
            .filter(|property| property.is_writable())
            .chain(info.fields());
        for member in members {
            if !member.is_serialized(data_contract) {
                continue;
            }
            let value = self.generate_slot(member.ty, constructing);
            fields.push((member.wire_name(data_contract).to_string(), value));
        }

        constructing.remove(&ty.id());
        Ok(SampleValue::Object {
            id: Some(id),
            type_name: model_name(info),
            fields,
        })
    }
}

/// Keeps a slot list unless every slot is empty.
fn non_empty(values: Vec<SampleValue>) -> Result<Vec<SampleValue>, Skip> {
    if values.iter().all(SampleValue::is_null) {
        Err(Skip::AllSlotsEmpty)
    } else {
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{
        EnumeratorInfo, KeyValuePair, MemberInfo, Sequence, TypeInfoBuilder, TypeKind,
        UntypedList,
    };
    use serde_json::json;

    struct Abstract;

    impl Reflect for Abstract {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Abstract", TypeKind::Struct)
                .construction(Construction::Abstract)
                .build()
        }
    }

    struct Color;

    impl Reflect for Color {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>(
                "Color",
                TypeKind::Enum(vec![
                    EnumeratorInfo::new("Red", 4),
                    EnumeratorInfo::new("Blue", 8),
                ]),
            )
            .build()
        }
    }

    struct Settings;

    impl Reflect for Settings {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Settings", TypeKind::Struct)
                .member(MemberInfo::property("Computed", TypeRef::of::<i32>(), false))
                .member(MemberInfo::property("Limit", TypeRef::of::<i32>(), true))
                .member(MemberInfo::field("Missing", TypeRef::of::<Abstract>()))
                .build()
        }
    }

    #[test]
    fn test_enum_uses_first_enumerator() {
        let mut generator = ObjectGenerator::default();
        assert_eq!(
            generator.sample::<Color>(),
            Some(SampleValue::Enum {
                name: "Red".into(),
                value: 4
            })
        );
    }

    #[test]
    fn test_read_only_properties_are_not_populated() {
        let mut generator = ObjectGenerator::default();
        let sample = generator.sample::<Settings>().unwrap();
        assert_eq!(sample.to_json(), json!({"Limit": 1, "Missing": null}));
    }

    #[test]
    fn test_abstract_element_drops_collection() {
        let mut generator = ObjectGenerator::default();
        assert_eq!(generator.sample::<Abstract>(), None);
        assert_eq!(generator.sample::<Vec<Abstract>>(), None);
        assert_eq!(generator.sample::<KeyValuePair<Abstract, Abstract>>(), None);
        assert_eq!(generator.sample::<(Abstract,)>(), None);
    }

    #[test]
    fn test_interfaces_materialize_as_lists() {
        let mut generator = ObjectGenerator::default();
        assert_eq!(
            generator.sample::<Sequence<u64>>().map(|sample| sample.to_json()),
            Some(json!([1, 2]))
        );
        assert_eq!(
            generator.sample::<UntypedList>().map(|sample| sample.to_json()),
            Some(json!([{}, {}]))
        );
    }

    #[test]
    fn test_pair_with_one_empty_half() {
        let mut generator = ObjectGenerator::default();
        let sample = generator
            .sample::<KeyValuePair<String, Abstract>>()
            .unwrap();
        assert_eq!(
            sample.to_json(),
            json!({"Key": "sample string 1", "Value": null})
        );
    }

    #[test]
    fn test_dictionary_with_unavailable_key() {
        let mut generator = ObjectGenerator::default();
        assert_eq!(
            generator.sample::<std::collections::HashMap<Abstract, i32>>(),
            None
        );
    }

    #[test]
    fn test_collection_size_is_configurable() {
        let mut generator = ObjectGenerator::new(
            Arc::new(SampleRegistry::default()),
            SampleConfig { collection_size: 3 },
        );
        assert_eq!(
            generator.sample::<[i16; 1]>().map(|sample| sample.to_json()),
            Some(json!([1, 2, 3]))
        );
    }

    #[test]
    fn test_panicking_factory_degrades() {
        let mut registry = SampleRegistry::new();
        registry.insert_factory::<String, _>(|| panic!("factory failure"));
        let mut generator = ObjectGenerator::new(Arc::new(registry), SampleConfig::default());
        assert_eq!(generator.sample::<String>(), None);
        assert_eq!(
            generator.sample::<Option<i32>>(),
            Some(SampleValue::Int(1))
        );
    }
}
