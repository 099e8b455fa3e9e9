use std::fmt;

/// Model description error
///
/// Returned by `ModelDescriptionGenerator::get_or_create_model_description`
/// when the documented type graph cannot be described unambiguously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionError {
    /// Two distinct types compute the same model name within one session
    ///
    /// Rename one of them with `#[describe(display_name = "...")]`.
    DuplicateModelName {
        /// The colliding model name
        name: String,
        /// Full name of the type already registered under `name`
        existing: String,
        /// Full name of the type that was requested
        requested: String,
    },
}

impl fmt::Display for DescriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionError::DuplicateModelName {
                name,
                existing,
                requested,
            } => {
                write!(
                    f,
                    "A model description could not be created. Duplicate model name '{}' was found \
                    for types '{}' and '{}'. Use the display_name attribute to change the model \
                    name for at least one of the types so that it has a unique name.",
                    name, existing, requested
                )
            }
        }
    }
}

impl std::error::Error for DescriptionError {}
