//! # apihelp
//!
//! **apihelp** produces the data-type half of HTTP API documentation: a named,
//! structured description of every type an API exchanges, and a representative
//! sample payload for each.
//!
//! ## Overview
//!
//! Types opt in by implementing [`reflect::Reflect`], normally through
//! `#[derive(Describe)]`. Two generators then work from that metadata:
//!
//! - **[`model::ModelDescriptionGenerator`]** turns a type into a cached
//!   [`model::ModelDescription`] (simple, enum, complex, collection,
//!   dictionary or key/value pair), sharing one description per type and
//!   failing fast when two types claim the same model name
//! - **[`sample::ObjectGenerator`]** turns a type into a [`sample::SampleValue`]
//!   tree, honouring registered overrides and degrading to "no sample" instead
//!   of failing
//!
//! ## Architecture
//!
//! - **[`reflect`]** - Type metadata: the `Reflect` trait, `TypeInfo`, markers and constraints
//! - **[`shape`]** - The single structural classifier both generators dispatch on
//! - **[`model`]** - Model descriptions, naming, annotations and localizable templates
//! - **[`documentation`]** - Doc comment and configured documentation providers
//! - **[`sample`]** - Sample values, overrides and the object generator
//! - **[`catalog`]** - Help items for the data types section of a help page
//! - **[`sessions`]** - One description cache per locale
//! - **[`config`]** - File and environment configuration
//! - **[`logging`]** - `tracing` subscriber setup for binaries
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Page as Help page builder
//!     participant Sessions as sessions::DocumentationSessions
//!     participant Catalog as catalog::TypesDocumentationBuilder
//!     participant Models as model::ModelDescriptionGenerator
//!     participant Samples as sample::ObjectGenerator
//!
//!     Page->>Sessions: session("ru-RU")
//!     Sessions-->>Page: Arc<Mutex<ModelDescriptionGenerator>>
//!     Page->>Catalog: build_help(models, samples)
//!     loop every documented type
//!         Catalog->>Models: get_or_create_model_description(ty)
//!         Models-->>Catalog: ModelId
//!         Catalog->>Samples: generate(ty)
//!         Samples-->>Catalog: Option<SampleValue>
//!     end
//!     Catalog-->>Page: Vec<HelpItem>
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use apihelp::Describe;
//! use apihelp::documentation::DocCommentProvider;
//! use apihelp::model::{ModelDescriptionGenerator, ModelKind};
//! use apihelp::sample::ObjectGenerator;
//!
//! /// Contact DTO
//! #[derive(Describe)]
//! struct Contact {
//!     /// Person's phone
//!     #[describe(required)]
//!     phone: String,
//!     email: String,
//! }
//!
//! let mut models = ModelDescriptionGenerator::new(DocCommentProvider::default());
//! let id = models.describe::<Contact>().unwrap().unwrap();
//! let ModelKind::Complex { properties } = &models[id].kind else { unreachable!() };
//! assert_eq!(properties[0].name, "phone");
//! assert_eq!(properties[0].annotations[0].documentation, "Required");
//!
//! let sample = ObjectGenerator::default().sample::<Contact>().unwrap();
//! assert_eq!(
//!     sample.to_json(),
//!     serde_json::json!({"phone": "sample string 1", "email": "sample string 2"})
//! );
//! ```

extern crate self as apihelp;

pub mod catalog;
pub mod config;
pub mod documentation;
pub mod logging;
pub mod model;
pub mod reflect;
pub mod sample;
pub mod sessions;
pub mod shape;

pub use apihelp_macros::Describe;
pub use catalog::{HelpItem, TypesDocumentationBuilder};
pub use config::HelpConfig;
pub use model::{DescriptionError, ModelDescription, ModelDescriptionGenerator, ModelId};
pub use reflect::{Reflect, TypeRef};
pub use sample::{ObjectGenerator, SampleRegistry, SampleValue};
pub use sessions::DocumentationSessions;
