//! Translation resolution: picks the single translation served for a request.
//!
//! Fallback chain, first match wins:
//!
//! 1. the requested locale, when given and translated
//! 2. the registry's fallback locale
//! 3. the lowest remaining locale code
//!
//! Step 3 sorts by code so the outcome never depends on storage order.

use tracing::debug;

use crate::content::{Translatable, Translation};
use crate::i18n::LocaleRegistry;

/// Outcome of resolving an entity to one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    translation: Option<&'a Translation>,
    exact_match: bool,
    requested_locale: Option<String>,
}

impl<'a> Resolution<'a> {
    /// The translation to serve, if the entity has any.
    pub fn translation(&self) -> Option<&'a Translation> {
        self.translation
    }

    /// Whether the served translation is in the requested locale.
    pub fn is_exact_match(&self) -> bool {
        self.exact_match
    }

    /// Locale of the served translation.
    pub fn locale(&self) -> Option<&'a str> {
        self.translation.map(|t| t.locale.as_str())
    }

    pub fn requested_locale(&self) -> Option<&str> {
        self.requested_locale.as_deref()
    }

    /// Client-facing "not yet translated" signal.
    ///
    /// With an explicit request this is true whenever the served locale
    /// differs from it. Without one, any translation counts as the content,
    /// so it is true only when nothing exists at all.
    pub fn translation_missing(&self) -> bool {
        match (&self.requested_locale, self.translation) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(requested), Some(translation)) => translation.locale != *requested,
        }
    }
}

/// Resolves translatable content against a locale registry.
#[derive(Debug, Clone, Copy)]
pub struct TranslationResolver {
    fallback: &'static str,
}

impl TranslationResolver {
    pub fn new(registry: &LocaleRegistry) -> Self {
        Self {
            fallback: registry.fallback().code,
        }
    }

    pub fn fallback_locale(&self) -> &'static str {
        self.fallback
    }

    /// Select the translation to serve for `requested`.
    ///
    /// An empty requested locale is treated as absent. A requested locale the
    /// registry does not know is kept as-is: it matches nothing, so the
    /// result falls back and reports `translation_missing`.
    pub fn resolve<'a, T>(&self, content: &'a T, requested: Option<&str>) -> Resolution<'a>
    where
        T: Translatable + ?Sized,
    {
        let requested = requested.filter(|code| !code.is_empty());
        let translations = content.translations();

        let exact = requested.and_then(|code| translations.iter().find(|t| t.locale == code));
        if let Some(translation) = exact {
            return Resolution {
                translation: Some(translation),
                exact_match: true,
                requested_locale: requested.map(str::to_string),
            };
        }

        let fallback = translations
            .iter()
            .find(|t| t.locale == self.fallback)
            .or_else(|| translations.iter().min_by(|a, b| a.locale.cmp(&b.locale)));

        if let (Some(code), Some(translation)) = (requested, fallback) {
            debug!(
                "No '{}' translation, serving '{}' instead",
                code, translation.locale
            );
        }

        Resolution {
            translation: fallback,
            exact_match: false,
            requested_locale: requested.map(str::to_string),
        }
    }
}

impl Default for TranslationResolver {
    fn default() -> Self {
        Self::new(&LocaleRegistry::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_support::{page, translation};
    use crate::i18n::LocaleConfig;
    use proptest::prelude::*;

    fn resolver() -> TranslationResolver {
        TranslationResolver::default()
    }

    // ==================== Exact Match Tests ====================

    #[test]
    fn test_exact_match() {
        let about = page("about", &["en", "fr"]);
        let resolution = resolver().resolve(&about, Some("fr"));

        assert_eq!(resolution.locale(), Some("fr"));
        assert!(resolution.is_exact_match());
        assert!(!resolution.translation_missing());
    }

    #[test]
    fn test_exact_match_fallback_locale_itself() {
        let about = page("about", &["en", "fr"]);
        let resolution = resolver().resolve(&about, Some("en"));

        assert!(resolution.is_exact_match());
        assert!(!resolution.translation_missing());
    }

    // ==================== Fallback Tests ====================

    #[test]
    fn test_missing_locale_falls_back_to_english() {
        let about = page("about", &["en", "fr"]);
        let resolution = resolver().resolve(&about, Some("es"));

        assert_eq!(resolution.locale(), Some("en"));
        assert!(!resolution.is_exact_match());
        assert!(resolution.translation_missing());
        assert_eq!(resolution.requested_locale(), Some("es"));
    }

    #[test]
    fn test_without_english_uses_lowest_locale_code() {
        let post = page("post", &["pt", "nl", "fr"]);
        let resolution = resolver().resolve(&post, Some("es"));

        assert_eq!(resolution.locale(), Some("fr"));
        assert!(resolution.translation_missing());
    }

    #[test]
    fn test_lowest_code_independent_of_storage_order() {
        let translations = vec![translation(1, "pt", "pt"), translation(2, "nl", "nl")];
        let resolution = resolver().resolve(&translations, Some("fr"));
        assert_eq!(resolution.locale(), Some("nl"));
    }

    #[test]
    fn test_unsupported_locale_behaves_like_missing() {
        let about = page("about", &["en"]);
        let resolution = resolver().resolve(&about, Some("xx"));

        assert_eq!(resolution.locale(), Some("en"));
        assert!(resolution.translation_missing());
    }

    // ==================== No Requested Locale Tests ====================

    #[test]
    fn test_no_request_serves_fallback_without_missing_flag() {
        let about = page("about", &["fr", "en"]);
        let resolution = resolver().resolve(&about, None);

        assert_eq!(resolution.locale(), Some("en"));
        assert!(!resolution.is_exact_match());
        assert!(!resolution.translation_missing());
    }

    #[test]
    fn test_empty_request_is_treated_as_absent() {
        let about = page("about", &["fr"]);
        let resolution = resolver().resolve(&about, Some(""));

        assert_eq!(resolution.locale(), Some("fr"));
        assert_eq!(resolution.requested_locale(), None);
        assert!(!resolution.translation_missing());
    }

    // ==================== No Translations Tests ====================

    #[test]
    fn test_no_translations() {
        let draft = page("draft", &[]);

        let with_request = resolver().resolve(&draft, Some("fr"));
        assert!(with_request.translation().is_none());
        assert!(!with_request.is_exact_match());
        assert!(with_request.translation_missing());

        let without_request = resolver().resolve(&draft, None);
        assert!(without_request.translation().is_none());
        assert!(without_request.translation_missing());
    }

    // ==================== Injected Registry Tests ====================

    #[test]
    fn test_custom_registry_fallback() {
        let registry = LocaleRegistry::new(vec![
            LocaleConfig {
                code: "en",
                name: "English",
                native_name: "English",
                is_fallback: false,
            },
            LocaleConfig {
                code: "nl",
                name: "Dutch",
                native_name: "Nederlands",
                is_fallback: true,
            },
        ])
        .unwrap();
        let resolver = TranslationResolver::new(&registry);
        let about = page("about", &["en", "nl"]);

        assert_eq!(resolver.fallback_locale(), "nl");
        assert_eq!(resolver.resolve(&about, Some("fr")).locale(), Some("nl"));
    }

    // ==================== Property Tests ====================

    fn locale_set() -> impl Strategy<Value = Vec<&'static str>> {
        proptest::sample::subsequence(vec!["en", "fr", "nl", "es", "pt"], 0..=5)
            .prop_shuffle()
    }

    proptest! {
        #[test]
        fn prop_english_fallback(locales in locale_set(), requested in "(fr|nl|es|pt|xx)") {
            prop_assume!(locales.contains(&"en"));
            prop_assume!(!locales.contains(&requested.as_str()));
            let entity = page("any", &locales);
            let resolution = resolver().resolve(&entity, Some(&requested));
            prop_assert_eq!(resolution.locale(), Some("en"));
            prop_assert!(resolution.translation_missing());
        }

        #[test]
        fn prop_exact_match(locales in locale_set(), pick in 0usize..5) {
            prop_assume!(!locales.is_empty());
            let requested = locales[pick % locales.len()];
            let entity = page("any", &locales);
            let resolution = resolver().resolve(&entity, Some(requested));
            prop_assert_eq!(resolution.locale(), Some(requested));
            prop_assert!(!resolution.translation_missing());
        }

        #[test]
        fn prop_idempotent(locales in locale_set(), requested in proptest::option::of("(en|fr|nl|es|pt|de)")) {
            let entity = page("any", &locales);
            let first = resolver().resolve(&entity, requested.as_deref());
            let second = resolver().resolve(&entity, requested.as_deref());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_served_locale_is_owned(locales in locale_set(), requested in proptest::option::of("(en|fr|nl|es|pt)")) {
            let entity = page("any", &locales);
            let resolution = resolver().resolve(&entity, requested.as_deref());
            match resolution.locale() {
                Some(locale) => prop_assert!(locales.contains(&locale)),
                None => prop_assert!(locales.is_empty()),
            }
        }
    }
}
