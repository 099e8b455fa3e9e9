//! # Model Module
//!
//! Named, documentation-oriented descriptions of types.
//!
//! [`ModelDescriptionGenerator`] turns a [`TypeRef`] into a [`ModelDescription`]
//! stored in a per-session arena. Descriptions reference each other by
//! [`ModelId`], so shared and self-referential type graphs are plain indices:
//! the element of `Vec<Contact>` and the `Contact` description are the same id,
//! and a `Node` whose member is a `Node` points back at itself.
//!
//! ## Example
//!
//! ```rust
//! use apihelp::model::{ModelDescriptionGenerator, ModelKind};
//! use apihelp::documentation::DocCommentProvider;
//! use apihelp::reflect::TypeRef;
//!
//! let mut generator = ModelDescriptionGenerator::new(DocCommentProvider::default());
//! let list = generator
//!     .get_or_create_model_description(TypeRef::of::<Vec<i32>>())
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(generator[list].name, "VecOfInt32");
//! let ModelKind::Collection { element } = generator[list].kind else { panic!() };
//! assert_eq!(generator[element].name, "Int32");
//! ```

mod annotations;
mod error;
mod generator;
mod name;
mod strings;

pub use annotations::{AnnotationRenderer, AnnotationRenderers};
pub use error::DescriptionError;
pub use generator::ModelDescriptionGenerator;
pub use name::model_name;
pub use strings::{format_template, HelpStrings};

use crate::reflect::{ConstraintKind, TypeRef};

/// Index of a description in its generator's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub(crate) usize);

impl ModelId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named description of one type.
#[derive(Debug, Clone)]
pub struct ModelDescription {
    /// Unique (case-insensitively) within the session.
    pub name: String,
    pub documentation: Option<String>,
    /// The described type; identity only.
    pub model_type: TypeRef,
    pub kind: ModelKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelKind {
    Simple,
    Enum {
        values: Vec<EnumValueDescription>,
    },
    Complex {
        properties: Vec<ParameterDescription>,
    },
    Collection {
        element: ModelId,
    },
    Dictionary {
        key: ModelId,
        value: ModelId,
    },
    KeyValuePair {
        key: ModelId,
        value: ModelId,
    },
}

impl ModelKind {
    /// Short tag used in rendered output.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            ModelKind::Simple => "simple",
            ModelKind::Enum { .. } => "enum",
            ModelKind::Complex { .. } => "complex",
            ModelKind::Collection { .. } => "collection",
            ModelKind::Dictionary { .. } => "dictionary",
            ModelKind::KeyValuePair { .. } => "keyValuePair",
        }
    }
}

/// One enumerator of an enum description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescription {
    pub name: String,
    pub value: i64,
    pub documentation: Option<String>,
}

/// One documented member of a complex description.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescription {
    /// Wire name of the member.
    pub name: String,
    pub documentation: Option<String>,
    /// `None` when the member's type is hidden from documentation.
    pub type_description: Option<ModelId>,
    /// Required first, then alphabetical by text.
    pub annotations: Vec<ParameterAnnotation>,
}

/// Rendered validation note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterAnnotation {
    pub kind: ConstraintKind,
    pub documentation: String,
}
