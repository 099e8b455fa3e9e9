//! # Sessions Module
//!
//! One [`ModelDescriptionGenerator`] per locale.
//!
//! Description caches are per session: the same type documented for `en` and
//! `ru` yields two independent descriptions with localized prose. The
//! registry hands out `Arc<Mutex<..>>` handles so concurrent requests in
//! different locales never share a cache, and requests in the same locale
//! take turns on theirs.
//!
//! ## Example
//!
//! ```rust
//! use apihelp::config::HelpConfig;
//! use apihelp::reflect::TypeRef;
//! use apihelp::sessions::DocumentationSessions;
//!
//! let sessions = DocumentationSessions::new(HelpConfig::default(), vec![TypeRef::of::<i32>()]);
//! let session = sessions.session("ru-RU").unwrap();
//! assert!(session.lock().find("Int32").is_some());
//! ```

use crate::config::HelpConfig;
use crate::model::{AnnotationRenderers, DescriptionError, ModelDescriptionGenerator};
use crate::reflect::TypeRef;
use crate::sample::{ObjectGenerator, SampleRegistry};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Shared handle to one locale's generator.
pub type Session = Arc<Mutex<ModelDescriptionGenerator>>;

/// Registry of per-locale description sessions.
#[derive(Debug)]
pub struct DocumentationSessions {
    config: HelpConfig,
    annotations: Arc<AnnotationRenderers>,
    samples: Arc<SampleRegistry>,
    /// Described eagerly when a session is created.
    resource_types: Vec<TypeRef>,
    sessions: DashMap<String, Session>,
}

impl DocumentationSessions {
    pub fn new(config: HelpConfig, resource_types: Vec<TypeRef>) -> Self {
        Self::with_parts(
            config,
            resource_types,
            Arc::new(AnnotationRenderers::default()),
            Arc::new(SampleRegistry::default()),
        )
    }

    pub fn with_parts(
        config: HelpConfig,
        resource_types: Vec<TypeRef>,
        annotations: Arc<AnnotationRenderers>,
        samples: Arc<SampleRegistry>,
    ) -> Self {
        Self {
            config,
            annotations,
            samples,
            resource_types,
            sessions: DashMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &HelpConfig {
        &self.config
    }

    /// The generator for `locale` (empty means the configured default),
    /// created and warmed up with the resource types on first use.
    ///
    /// # Errors
    ///
    /// Fails if describing a resource type hits a model name collision; the
    /// session is not kept in that case.
    pub fn session(&self, locale: &str) -> Result<Session, DescriptionError> {
        let key = self.locale_key(locale);
        if let Some(session) = self.sessions.get(&key) {
            return Ok(Arc::clone(session.value()));
        }

        let mut generator =
            ModelDescriptionGenerator::for_locale(&self.config, &key, Arc::clone(&self.annotations));
        for ty in &self.resource_types {
            generator.get_or_create_model_description(*ty)?;
        }
        debug!(locale = %key, models = generator.len(), "created documentation session");

        let session = self
            .sessions
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(generator)));
        Ok(Arc::clone(session.value()))
    }

    /// A fresh sample generator sharing the registered overrides.
    #[must_use]
    pub fn sample_generator(&self) -> ObjectGenerator {
        ObjectGenerator::new(Arc::clone(&self.samples), self.config.sample)
    }

    /// Locales with a live session.
    #[must_use]
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.sessions.iter().map(|entry| entry.key().clone()).collect();
        locales.sort();
        locales
    }

    /// Drops the session of `locale`; the next request rebuilds it.
    pub fn invalidate(&self, locale: &str) -> bool {
        self.sessions.remove(&self.locale_key(locale)).is_some()
    }

    fn locale_key(&self, locale: &str) -> String {
        let locale = locale.trim();
        if locale.is_empty() {
            self.config.default_locale.clone()
        } else {
            locale.to_string()
        }
    }
}
