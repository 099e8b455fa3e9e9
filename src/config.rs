//! # Configuration Module
//!
//! [`HelpConfig`] collects everything a documentation build can tune: sample
//! sizes, the table-of-contents path, localized templates and documentation
//! overrides. It loads from YAML, TOML or JSON, picked by file extension.
//!
//! ## Environment Variables
//!
//! - `APIHELP_CONFIG`: path of a configuration file to load
//! - `APIHELP_LOCALE`: overrides `default_locale`
//! - `APIHELP_SAMPLE_SIZE`: overrides `sample.collection_size`
//!
//! ## Example
//!
//! ```yaml
//! default_locale: ru-RU
//! toc_path: APIDataTypes
//! sample:
//!   collection_size: 3
//! strings:
//!   ru:
//!     required: Обязательное
//!     data_types_title: Типы данных
//! documentation:
//!   sandbox::Contact:
//!     text: Contact details
//!     ru: Контактные данные
//! ```

use crate::documentation::{language_of, LocalizedText};
use crate::model::HelpStrings;
use crate::sample::SampleConfig;
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpConfig {
    /// Locale used when a session does not name one.
    pub default_locale: String,
    /// Id of the data types table of contents entry.
    pub toc_path: String,
    pub sample: SampleConfig,
    /// Template tables keyed by locale or two-letter language.
    pub strings: HashMap<String, HelpStrings>,
    /// Documentation overrides keyed by type path or `<type path>.<member>`.
    pub documentation: HashMap<String, LocalizedText>,
}

static ENGLISH: Lazy<HelpStrings> = Lazy::new(HelpStrings::default);

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            toc_path: "APIDataTypes".to_string(),
            sample: SampleConfig::default(),
            strings: HashMap::new(),
            documentation: HashMap::new(),
        }
    }
}

impl HelpConfig {
    /// Load configuration from a `.yaml`/`.yml`, `.toml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, has an unknown extension or does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        let config = match extension.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config {}", path.display()))?,
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config {}", path.display()))?,
            _ => bail!(
                "Unsupported config format for {} (expected .yaml, .yml, .toml or .json)",
                path.display()
            ),
        };
        Ok(config)
    }

    /// Load from `APIHELP_CONFIG` if set, then apply `APIHELP_LOCALE` and
    /// `APIHELP_SAMPLE_SIZE`.
    ///
    /// # Errors
    ///
    /// Fails if `APIHELP_CONFIG` names a file that cannot be loaded.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("APIHELP_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim())?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(locale) = env::var("APIHELP_LOCALE") {
            if !locale.trim().is_empty() {
                self.default_locale = locale.trim().to_string();
            }
        }
        if let Some(size) = env::var("APIHELP_SAMPLE_SIZE")
            .ok()
            .and_then(|value| value.trim().parse().ok())
        {
            self.sample.collection_size = size;
        }
    }

    /// Templates for `locale`: exact locale, then its language, then English.
    #[must_use]
    pub fn strings_for(&self, locale: &str) -> &HelpStrings {
        self.strings
            .get(locale)
            .or_else(|| language_of(locale).and_then(|lang| self.strings.get(&lang)))
            .unwrap_or(&*ENGLISH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HelpConfig::default();
        assert_eq!(config.toc_path, "APIDataTypes");
        assert_eq!(config.sample.collection_size, 2);
        assert_eq!(config.strings_for("fr-FR").required, "Required");
    }

    #[test]
    fn test_strings_fall_back_to_language() {
        let mut config = HelpConfig::default();
        config.strings.insert(
            "ru".to_string(),
            HelpStrings {
                required: "Обязательное".to_string(),
                ..HelpStrings::default()
            },
        );
        assert_eq!(config.strings_for("ru-RU").required, "Обязательное");
        assert_eq!(config.strings_for("en-US").required, "Required");
    }
}
