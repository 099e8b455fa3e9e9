use serde::{Deserialize, Serialize};

/// Localizable documentation templates.
///
/// Placeholders are positional (`{0}`, `{1}`) so translations can reorder
/// them. Missing keys in a loaded table fall back to the English defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpStrings {
    /// `{0}`: element model name.
    pub collection: String,
    /// `{0}`: value model name, `{1}`: key model name.
    pub dictionary: String,
    /// `{0}`: key model name, `{1}`: value model name.
    pub key_value_pair: String,
    pub required: String,
    /// `{0}`: minimum, `{1}`: maximum.
    pub range: String,
    pub max_length: String,
    pub min_length: String,
    /// `{0}`: minimum, `{1}`: maximum.
    pub string_length: String,
    pub data_type: String,
    pub regular_expression: String,
    /// Title of the data types table of contents entry.
    pub data_types_title: String,
}

impl Default for HelpStrings {
    fn default() -> Self {
        Self {
            collection: "A collection of elements of type {0}".into(),
            dictionary: "A dictionary of {0} keyed by {1}".into(),
            key_value_pair: "A key/value pair where the key is of type {0} and value is of type {1}"
                .into(),
            required: "Required".into(),
            range: "Range: inclusive between {0} and {1}".into(),
            max_length: "Max length: {0}".into(),
            min_length: "Min length: {0}".into(),
            string_length: "String length: inclusive between {0} and {1}".into(),
            data_type: "Data type: {0}".into(),
            regular_expression: "Matching regular expression pattern: {0}".into(),
            data_types_title: "Data types".into(),
        }
    }
}

/// Substitutes `{0}`, `{1}`, .. in `template` with `args`.
///
/// ```rust
/// use apihelp::model::format_template;
///
/// assert_eq!(format_template("{1} of {0}", &["Int32", "Vec"]), "Vec of Int32");
/// ```
#[must_use]
pub fn format_template<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_string(), |text, (index, arg)| {
            text.replace(&format!("{{{index}}}"), arg.as_ref())
        })
}
