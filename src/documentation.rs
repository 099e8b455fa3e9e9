//! # Documentation Module
//!
//! Sources of human-authored prose for types, members and enumerators.
//!
//! - [`DocCommentProvider`] reads the doc comments captured by
//!   `#[derive(Describe)]`, preferring the session language
//! - [`OverlayDocumentationProvider`] layers configured overrides (a resource
//!   store keyed by type path) over another provider
//!
//! Providers are locale-bound: a session for `ru-RU` builds its provider with
//! language `ru`, and every lookup resolves against it.

use crate::reflect::{Docs, EnumeratorInfo, MemberInfo, TypeInfo};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supplies documentation text for reflected items.
pub trait ModelDocumentationProvider: Send + Sync {
    fn type_documentation(&self, info: &TypeInfo) -> Option<String>;

    fn member_documentation(&self, owner: &TypeInfo, member: &MemberInfo) -> Option<String>;

    fn enumerator_documentation(
        &self,
        owner: &TypeInfo,
        enumerator: &EnumeratorInfo,
    ) -> Option<String>;
}

/// Two-letter lowercase language of a locale (`"ru-RU"` -> `"ru"`).
#[must_use]
pub fn language_of(locale: &str) -> Option<String> {
    let language = locale.split(['-', '_']).next().unwrap_or_default().trim();
    if language.is_empty() {
        None
    } else {
        Some(language.to_ascii_lowercase())
    }
}

/// Reads docs attached through `///` comments and `#[describe(lang, doc)]`.
#[derive(Debug, Clone, Default)]
pub struct DocCommentProvider {
    lang: Option<String>,
}

impl DocCommentProvider {
    #[must_use]
    pub fn new(lang: Option<String>) -> Self {
        Self { lang }
    }

    #[must_use]
    pub fn for_locale(locale: &str) -> Self {
        Self::new(language_of(locale))
    }

    fn resolve(&self, docs: &Docs) -> Option<String> {
        docs.for_language(self.lang.as_deref())
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

impl ModelDocumentationProvider for DocCommentProvider {
    fn type_documentation(&self, info: &TypeInfo) -> Option<String> {
        self.resolve(&info.docs)
    }

    fn member_documentation(&self, _owner: &TypeInfo, member: &MemberInfo) -> Option<String> {
        self.resolve(&member.docs)
    }

    fn enumerator_documentation(
        &self,
        _owner: &TypeInfo,
        enumerator: &EnumeratorInfo,
    ) -> Option<String> {
        self.resolve(&enumerator.docs)
    }
}

/// One override entry: neutral text plus per-language translations.
///
/// ```yaml
/// text: Contact details
/// ru: Контактные данные
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub translations: HashMap<String, String>,
}

impl LocalizedText {
    #[must_use]
    pub fn resolve(&self, lang: Option<&str>) -> Option<&str> {
        lang.and_then(|lang| self.translations.get(lang))
            .or(self.text.as_ref())
            .map(|text| text.trim())
    }
}

/// Configured overrides consulted before an inner provider.
///
/// Keys are the type path without generic arguments (`sandbox::Contact`),
/// or `<type path>.<member>` for members and enumerators.
pub struct OverlayDocumentationProvider {
    overrides: HashMap<String, LocalizedText>,
    lang: Option<String>,
    inner: Box<dyn ModelDocumentationProvider>,
}

impl OverlayDocumentationProvider {
    #[must_use]
    pub fn new(
        overrides: HashMap<String, LocalizedText>,
        lang: Option<String>,
        inner: Box<dyn ModelDocumentationProvider>,
    ) -> Self {
        Self {
            overrides,
            lang,
            inner,
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.overrides
            .get(key)
            .and_then(|entry| entry.resolve(self.lang.as_deref()))
            .map(str::to_string)
    }
}

fn type_key(info: &TypeInfo) -> &str {
    info.full_name
        .split_once('<')
        .map_or(info.full_name.as_ref(), |(base, _)| base)
}

impl ModelDocumentationProvider for OverlayDocumentationProvider {
    fn type_documentation(&self, info: &TypeInfo) -> Option<String> {
        self.lookup(type_key(info))
            .or_else(|| self.inner.type_documentation(info))
    }

    fn member_documentation(&self, owner: &TypeInfo, member: &MemberInfo) -> Option<String> {
        self.lookup(&format!("{}.{}", type_key(owner), member.name))
            .or_else(|| self.inner.member_documentation(owner, member))
    }

    fn enumerator_documentation(
        &self,
        owner: &TypeInfo,
        enumerator: &EnumeratorInfo,
    ) -> Option<String> {
        self.lookup(&format!("{}.{}", type_key(owner), enumerator.name))
            .or_else(|| self.inner.enumerator_documentation(owner, enumerator))
    }
}

impl std::fmt::Debug for OverlayDocumentationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayDocumentationProvider")
            .field("overrides", &self.overrides.len())
            .field("lang", &self.lang)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Reflect, TypeInfoBuilder, TypeKind, TypeRef};

    struct Contact;

    impl Reflect for Contact {
        fn type_info() -> TypeInfo {
            TypeInfoBuilder::new::<Self>("Contact", TypeKind::Struct)
                .full_name("sandbox::Contact")
                .doc("Contact DTO")
                .localized_doc("ru", "Контакт")
                .member(
                    MemberInfo::field("Email", TypeRef::of::<String>())
                        .with_doc("Person's email"),
                )
                .build()
        }
    }

    #[test]
    fn test_language_of() {
        assert_eq!(language_of("ru-RU").as_deref(), Some("ru"));
        assert_eq!(language_of("EN").as_deref(), Some("en"));
        assert_eq!(language_of(""), None);
    }

    #[test]
    fn test_doc_comments_follow_locale() {
        let info = Contact::type_info();
        assert_eq!(
            DocCommentProvider::for_locale("ru-RU").type_documentation(&info),
            Some("Контакт".to_string())
        );
        assert_eq!(
            DocCommentProvider::for_locale("en-US").type_documentation(&info),
            Some("Contact DTO".to_string())
        );
    }

    #[test]
    fn test_overlay_wins_and_falls_through() {
        let info = Contact::type_info();
        let mut overrides = HashMap::new();
        overrides.insert(
            "sandbox::Contact".to_string(),
            LocalizedText {
                text: Some("Contact details".into()),
                translations: HashMap::from([("ru".to_string(), "Контактные данные".to_string())]),
            },
        );
        let overlay = OverlayDocumentationProvider::new(
            overrides,
            Some("ru".into()),
            Box::new(DocCommentProvider::new(Some("ru".into()))),
        );
        assert_eq!(
            overlay.type_documentation(&info).as_deref(),
            Some("Контактные данные")
        );
        assert_eq!(
            overlay
                .member_documentation(&info, &info.members[0])
                .as_deref(),
            Some("Person's email")
        );
    }
}
