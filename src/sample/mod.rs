//! # Sample Module
//!
//! Synthetic example values for documented types.
//!
//! [`ObjectGenerator`] builds a [`SampleValue`] tree that mirrors the shape of
//! a type. Generation is best-effort: a member that cannot be sampled becomes
//! `null`, a container whose every slot failed is dropped, and the top-level
//! call returns `None` rather than an error.
//!
//! ## Example
//!
//! ```rust
//! use apihelp::sample::{ObjectGenerator, SampleValue};
//! use apihelp::reflect::TypeRef;
//!
//! let mut generator = ObjectGenerator::default();
//! let sample = generator.generate(TypeRef::of::<Vec<String>>()).unwrap();
//! assert_eq!(
//!     sample.to_json(),
//!     serde_json::json!(["sample string 1", "sample string 2"])
//! );
//! ```

mod generator;
mod registry;
mod simple;

pub use generator::ObjectGenerator;
pub use registry::{SampleFactory, SampleRegistry};
pub use simple::SimpleSampleGenerator;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;

/// Sample generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Number of elements generated for arrays, lists and dictionaries.
    pub collection_size: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self { collection_size: 2 }
    }
}

/// Identity of a sampled object within one generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) u32);

/// A generated sample value.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Enum {
        name: String,
        value: i64,
    },
    Array(Vec<SampleValue>),
    /// Dictionary entries in generation order; keys are distinct.
    Map(Vec<(SampleValue, SampleValue)>),
    Pair {
        key: Box<SampleValue>,
        value: Box<SampleValue>,
    },
    Tuple(Vec<SampleValue>),
    Object {
        id: Option<ObjectId>,
        type_name: String,
        /// Wire name and value of each serialized member.
        fields: Vec<(String, SampleValue)>,
    },
    /// Back-edge to an enclosing object that was still being populated.
    Reference(ObjectId),
}

impl SampleValue {
    /// Converts any serializable value.
    ///
    /// # Errors
    ///
    /// Fails if `value` cannot be represented as JSON.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::from)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, SampleValue::Null)
    }

    /// Renders the sample as JSON.
    ///
    /// Objects targeted by a [`SampleValue::Reference`] carry an `"$id"`
    /// property; the reference itself renders as `{"$ref": "<id>"}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut referenced = HashSet::new();
        self.collect_references(&mut referenced);
        self.render(&referenced)
    }

    fn collect_references(&self, referenced: &mut HashSet<ObjectId>) {
        match self {
            SampleValue::Reference(id) => {
                referenced.insert(*id);
            }
            SampleValue::Array(items) | SampleValue::Tuple(items) => {
                items
                    .iter()
                    .for_each(|item| item.collect_references(referenced));
            }
            SampleValue::Map(entries) => entries.iter().for_each(|(key, value)| {
                key.collect_references(referenced);
                value.collect_references(referenced);
            }),
            SampleValue::Pair { key, value } => {
                key.collect_references(referenced);
                value.collect_references(referenced);
            }
            SampleValue::Object { fields, .. } => fields
                .iter()
                .for_each(|(_, value)| value.collect_references(referenced)),
            _ => {}
        }
    }

    fn render(&self, referenced: &HashSet<ObjectId>) -> Value {
        match self {
            SampleValue::Null => Value::Null,
            SampleValue::Bool(value) => Value::Bool(*value),
            SampleValue::Int(value) => Value::from(*value),
            SampleValue::UInt(value) => Value::from(*value),
            SampleValue::Float(value) => Number::from_f64(*value).map_or(Value::Null, Value::Number),
            SampleValue::String(value) => Value::String(value.clone()),
            SampleValue::Enum { name, .. } => Value::String(name.clone()),
            SampleValue::Array(items) | SampleValue::Tuple(items) => {
                Value::Array(items.iter().map(|item| item.render(referenced)).collect())
            }
            SampleValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.key_string(), value.render(referenced)))
                    .collect(),
            ),
            SampleValue::Pair { key, value } => {
                let mut object = Map::new();
                object.insert("Key".to_string(), key.render(referenced));
                object.insert("Value".to_string(), value.render(referenced));
                Value::Object(object)
            }
            SampleValue::Object { id, fields, .. } => {
                let mut object = Map::new();
                if let Some(id) = id.filter(|id| referenced.contains(id)) {
                    object.insert("$id".to_string(), Value::String(id.0.to_string()));
                }
                for (name, value) in fields {
                    object.insert(name.clone(), value.render(referenced));
                }
                Value::Object(object)
            }
            SampleValue::Reference(id) => {
                let mut object = Map::new();
                object.insert("$ref".to_string(), Value::String(id.0.to_string()));
                Value::Object(object)
            }
        }
    }

    /// JSON object key for a dictionary entry.
    fn key_string(&self) -> String {
        match self {
            SampleValue::String(value) => value.clone(),
            SampleValue::Enum { name, .. } => name.clone(),
            SampleValue::Null => "null".to_string(),
            other => other.to_json().to_string(),
        }
    }
}

impl From<Value> for SampleValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SampleValue::Null,
            Value::Bool(value) => SampleValue::Bool(value),
            Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    SampleValue::Int(value)
                } else if let Some(value) = number.as_u64() {
                    SampleValue::UInt(value)
                } else {
                    SampleValue::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(value) => SampleValue::String(value),
            Value::Array(items) => SampleValue::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(object) => SampleValue::Object {
                id: None,
                type_name: "Object".to_string(),
                fields: object
                    .into_iter()
                    .map(|(name, value)| (name, Self::from(value)))
                    .collect(),
            },
        }
    }
}
