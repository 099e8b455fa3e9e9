use super::strings::{format_template, HelpStrings};
use crate::reflect::{Constraint, ConstraintKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Renders one constraint into annotation text, or `None` to omit it.
pub type AnnotationRenderer = Arc<dyn Fn(&Constraint, &HelpStrings) -> Option<String> + Send + Sync>;

/// Table of constraint renderers keyed by [`ConstraintKind`].
///
/// Built once and shared between generators; [`register`](Self::register)
/// adds renderers for [`Constraint::Custom`] kinds or replaces builtin ones.
#[derive(Clone)]
pub struct AnnotationRenderers {
    renderers: HashMap<ConstraintKind, AnnotationRenderer>,
}

impl AnnotationRenderers {
    /// Empty table: no constraint renders.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, kind: ConstraintKind, renderer: F) -> &mut Self
    where
        F: Fn(&Constraint, &HelpStrings) -> Option<String> + Send + Sync + 'static,
    {
        self.renderers.insert(kind, Arc::new(renderer));
        self
    }

    #[must_use]
    pub fn render(&self, constraint: &Constraint, strings: &HelpStrings) -> Option<String> {
        self.renderers
            .get(&constraint.kind())
            .and_then(|renderer| renderer(constraint, strings))
    }
}

impl Default for AnnotationRenderers {
    fn default() -> Self {
        let mut table = Self::empty();
        table
            .register(ConstraintKind::Required, |_, strings| {
                Some(strings.required.clone())
            })
            .register(ConstraintKind::Range, |constraint, strings| match constraint {
                Constraint::Range { min, max } => Some(format_template(
                    &strings.range,
                    &[min.to_string(), max.to_string()],
                )),
                _ => None,
            })
            .register(ConstraintKind::MaxLength, |constraint, strings| match constraint {
                Constraint::MaxLength(length) => {
                    Some(format_template(&strings.max_length, &[length.to_string()]))
                }
                _ => None,
            })
            .register(ConstraintKind::MinLength, |constraint, strings| match constraint {
                Constraint::MinLength(length) => {
                    Some(format_template(&strings.min_length, &[length.to_string()]))
                }
                _ => None,
            })
            .register(ConstraintKind::StringLength, |constraint, strings| {
                match constraint {
                    Constraint::StringLength { min, max } => Some(format_template(
                        &strings.string_length,
                        &[min.to_string(), max.to_string()],
                    )),
                    _ => None,
                }
            })
            .register(ConstraintKind::DataType, |constraint, strings| match constraint {
                Constraint::DataType(hint) => Some(format_template(&strings.data_type, &[hint])),
                _ => None,
            })
            .register(
                ConstraintKind::RegularExpression,
                |constraint, strings| match constraint {
                    Constraint::RegularExpression(pattern) => Some(format_template(
                        &strings.regular_expression,
                        &[pattern],
                    )),
                    _ => None,
                },
            );
        table
    }
}

impl fmt::Debug for AnnotationRenderers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.renderers.keys()).finish()
    }
}
