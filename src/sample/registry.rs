use super::SampleValue;
use crate::reflect::{Reflect, TypeRef};
use serde::Serialize;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces a fresh sample on every call.
pub type SampleFactory = Arc<dyn Fn() -> SampleValue + Send + Sync>;

#[derive(Clone)]
enum SampleSource {
    Value(SampleValue),
    Factory(SampleFactory),
}

/// Registered sample overrides, keyed by exact type identity.
///
/// An override always wins over the builtin generators, including for
/// primitive types.
///
/// ```rust
/// use apihelp::sample::{SampleRegistry, SampleValue};
/// use apihelp::reflect::TypeRef;
///
/// let mut registry = SampleRegistry::new();
/// registry.insert::<String, _>(&"fixed").unwrap();
/// assert_eq!(
///     registry.get(TypeRef::of::<String>()),
///     Some(SampleValue::String("fixed".into()))
/// );
/// ```
#[derive(Clone, Default)]
pub struct SampleRegistry {
    samples: HashMap<TypeId, SampleSource>,
}

impl SampleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a fixed sample for `T` from any serializable value.
    ///
    /// # Errors
    ///
    /// Fails if `value` cannot be represented as JSON.
    pub fn insert<T, V>(&mut self, value: &V) -> Result<&mut Self, serde_json::Error>
    where
        T: Reflect + ?Sized,
        V: Serialize + ?Sized,
    {
        let value = SampleValue::from_serialize(value)?;
        Ok(self.insert_value(TypeRef::of::<T>(), value))
    }

    pub fn insert_value(&mut self, ty: TypeRef, value: SampleValue) -> &mut Self {
        self.samples.insert(ty.id(), SampleSource::Value(value));
        self
    }

    /// Registers a factory for `T`, invoked on every lookup.
    pub fn insert_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Reflect + ?Sized,
        F: Fn() -> SampleValue + Send + Sync + 'static,
    {
        self.samples
            .insert(T::type_identity(), SampleSource::Factory(Arc::new(factory)));
        self
    }

    #[must_use]
    pub fn contains(&self, ty: TypeRef) -> bool {
        self.samples.contains_key(&ty.id())
    }

    /// The override for `ty`, running its factory if it has one.
    #[must_use]
    pub fn get(&self, ty: TypeRef) -> Option<SampleValue> {
        match self.samples.get(&ty.id())? {
            SampleSource::Value(value) => Some(value.clone()),
            SampleSource::Factory(factory) => Some(factory()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl fmt::Debug for SampleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampleRegistry")
            .field("samples", &self.samples.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[test]
    fn test_factory_runs_on_every_lookup() {
        let calls = Arc::new(AtomicI64::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = SampleRegistry::new();
        registry.insert_factory::<i32, _>(move || {
            SampleValue::Int(counter.fetch_add(1, Ordering::SeqCst) + 1)
        });

        assert_eq!(registry.get(TypeRef::of::<i32>()), Some(SampleValue::Int(1)));
        assert_eq!(registry.get(TypeRef::of::<i32>()), Some(SampleValue::Int(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut registry = SampleRegistry::new();
        registry.insert_value(TypeRef::of::<u8>(), SampleValue::UInt(7));
        assert!(registry.contains(TypeRef::of::<u8>()));
        assert_eq!(registry.get(TypeRef::of::<u16>()), None);
        assert_eq!(registry.get(TypeRef::of::<[u8; 4]>()), None);
    }
}
