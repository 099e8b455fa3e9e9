//! # Catalog Module
//!
//! Assembles the "data types" section of a help page: one [`HelpItem`] for
//! the section itself plus one per documented type, each carrying the
//! rendered model description and, when one can be generated, a sample.
//!
//! ## Example
//!
//! ```rust
//! use apihelp::catalog::TypesDocumentationBuilder;
//! use apihelp::documentation::DocCommentProvider;
//! use apihelp::model::ModelDescriptionGenerator;
//! use apihelp::reflect::TypeRef;
//! use apihelp::sample::ObjectGenerator;
//!
//! let builder = TypesDocumentationBuilder::new([TypeRef::of::<Vec<i32>>()], None);
//! let mut descriptions = ModelDescriptionGenerator::new(DocCommentProvider::default());
//! let mut samples = ObjectGenerator::default();
//!
//! let items = builder.build_help(&mut descriptions, &mut samples).unwrap();
//! assert_eq!(items[0].title, "Data types");
//! assert_eq!(items[1].title, "VecOfInt32");
//! assert_eq!(items[1].table_of_content_id, "APIDataTypes-Vec");
//! ```

use crate::model::{DescriptionError, ModelDescriptionGenerator};
use crate::reflect::TypeRef;
use crate::sample::ObjectGenerator;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Default table of contents path of the data types section.
pub const DEFAULT_TOC_PATH: &str = "APIDataTypes";

const TEMPLATE_NAME: &str = "dataType";
const MAX_SLUG_LEN: usize = 50;

static INVALID_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[^a-z0-9\s_-]").expect("slug regex should be valid"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should be valid"));

/// Catalog assembly error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The table of contents path has no non-blank segment
    InvalidTocPath {
        /// The rejected path
        path: String,
    },
    /// A type could not be described
    Description(DescriptionError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::InvalidTocPath { path } => {
                write!(
                    f,
                    "Invalid table of contents path '{}': expected at least one non-blank segment",
                    path
                )
            }
            CatalogError::Description(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Description(err) => Some(err),
            CatalogError::InvalidTocPath { .. } => None,
        }
    }
}

impl From<DescriptionError> for CatalogError {
    fn from(err: DescriptionError) -> Self {
        CatalogError::Description(err)
    }
}

/// An article on the help page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpItem {
    /// Slugged path segments joined by `-`.
    pub table_of_content_id: String,
    /// Position in the navigation tree.
    #[serde(skip)]
    pub table_of_content_path: Vec<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Depth in the navigation tree; top-level items are 0.
    pub level: usize,
}

impl HelpItem {
    /// Item at `toc_path` (`/`-separated), titled by its id until renamed.
    ///
    /// # Errors
    ///
    /// Fails if the path has no non-blank segment.
    pub fn new(toc_path: &str) -> Result<Self, CatalogError> {
        let segments: Vec<String> = toc_path
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        let slugs: Vec<String> = segments.iter().map(|segment| slug(segment)).collect();
        if slugs.iter().all(String::is_empty) {
            return Err(CatalogError::InvalidTocPath {
                path: toc_path.to_string(),
            });
        }
        let id = slugs.join("-");
        Ok(Self {
            title: id.clone(),
            table_of_content_id: id,
            level: segments.len() - 1,
            table_of_content_path: segments,
            template: None,
            data: None,
        })
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// URL-safe form of a table of contents segment.
///
/// ```rust
/// use apihelp::catalog::slug;
///
/// assert_eq!(slug("  Data  types (v2) "), "Data-types-v2");
/// ```
#[must_use]
pub fn slug(text: &str) -> String {
    let text = INVALID_SLUG_CHARS.replace_all(text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text: String = text.trim().chars().take(MAX_SLUG_LEN).collect();
    text.trim().replace(' ', "-")
}

/// Builds help items for a set of data types.
#[derive(Debug, Clone)]
pub struct TypesDocumentationBuilder {
    toc_path: String,
    types: Vec<TypeRef>,
}

impl TypesDocumentationBuilder {
    /// Types are de-duplicated, keeping first occurrence order.
    pub fn new(types: impl IntoIterator<Item = TypeRef>, toc_path: Option<&str>) -> Self {
        let mut unique: Vec<TypeRef> = Vec::new();
        for ty in types {
            if !unique.contains(&ty) {
                unique.push(ty);
            }
        }
        Self {
            toc_path: toc_path.unwrap_or(DEFAULT_TOC_PATH).to_string(),
            types: unique,
        }
    }

    #[must_use]
    pub fn types(&self) -> &[TypeRef] {
        &self.types
    }

    /// The section item followed by one item per documentable type.
    ///
    /// Types hidden from documentation are left out.
    ///
    /// # Errors
    ///
    /// Fails on an invalid table of contents path or a model name collision.
    pub fn build_help(
        &self,
        descriptions: &mut ModelDescriptionGenerator,
        samples: &mut ObjectGenerator,
    ) -> Result<Vec<HelpItem>, CatalogError> {
        let mut items =
            vec![HelpItem::new(&self.toc_path)?.with_title(&descriptions.strings().data_types_title)];

        for ty in &self.types {
            let Some(id) = descriptions.get_or_create_model_description(*ty)? else {
                continue;
            };
            let model = &descriptions[id];
            let raw_name = model.model_type.info().name;
            let mut item = HelpItem::new(&format!("{}/{}", self.toc_path, raw_name))?
                .with_title(model.name.clone());

            let mut data = descriptions.render(id);
            if let (Value::Object(object), Some(sample)) = (&mut data, samples.generate(*ty)) {
                object.insert("sample".to_string(), sample.to_json());
            }
            item.template = Some(TEMPLATE_NAME.to_string());
            item.data = Some(data);
            items.push(item);
        }
        Ok(items)
    }
}
