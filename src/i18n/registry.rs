//! Locale registry: the closed set of locales the site publishes in.
//!
//! The registry is an ordinary value rather than a process-wide singleton.
//! The server builds `LocaleRegistry::standard()` once at startup and shares
//! it through the application state, so resolvers and tests can be handed a
//! registry with a different locale set.

use crate::error::{CmsError, CmsResult};
use crate::i18n::Locale;

/// Configuration for a supported locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    /// ISO 639-1 language code (e.g., "en", "fr")
    pub code: &'static str,

    /// English name of the language (e.g., "French")
    pub name: &'static str,

    /// Native name of the language (e.g., "Français")
    pub native_name: &'static str,

    /// Whether this is the fallback locale (exactly one must be true)
    pub is_fallback: bool,
}

/// The set of locales content may be written and requested in.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleConfig>,
    fallback: usize,
}

impl LocaleRegistry {
    /// Build a registry from an explicit locale list.
    ///
    /// # Returns
    /// * `Err(CmsError::Validation)` if the list is empty, contains duplicate
    ///   codes, or does not have exactly one fallback locale
    pub fn new(locales: Vec<LocaleConfig>) -> CmsResult<Self> {
        if locales.is_empty() {
            return Err(CmsError::validation("Locale registry cannot be empty"));
        }

        for (i, locale) in locales.iter().enumerate() {
            if locales[..i].iter().any(|other| other.code == locale.code) {
                return Err(CmsError::validation(format!(
                    "Duplicate locale code '{}'",
                    locale.code
                )));
            }
        }

        let fallbacks: Vec<usize> = locales
            .iter()
            .enumerate()
            .filter(|(_, locale)| locale.is_fallback)
            .map(|(i, _)| i)
            .collect();

        match fallbacks.as_slice() {
            [index] => Ok(Self {
                fallback: *index,
                locales,
            }),
            [] => Err(CmsError::validation("No fallback locale in registry")),
            _ => Err(CmsError::validation(
                "Multiple fallback locales in registry",
            )),
        }
    }

    /// The locales published by the travel site, with English as fallback.
    pub fn standard() -> Self {
        Self {
            locales: standard_locales(),
            fallback: 0,
        }
    }

    /// Get a locale configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Check if a locale code belongs to the registry.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// All locales in registry order.
    pub fn list(&self) -> &[LocaleConfig] {
        &self.locales
    }

    /// All locale codes in registry order.
    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.locales.iter().map(|locale| locale.code)
    }

    /// The fallback locale configuration.
    pub fn fallback(&self) -> &LocaleConfig {
        &self.locales[self.fallback]
    }

    /// The fallback locale as a validated `Locale`.
    pub fn fallback_locale(&self) -> Locale {
        Locale::new(self.fallback().code)
    }

    /// Validate a locale code against the registry.
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is supported
    /// * `Err(CmsError::InvalidLocale)` otherwise
    pub fn parse(&self, code: &str) -> CmsResult<Locale> {
        match self.get_by_code(code) {
            Some(config) => Ok(Locale::new(config.code)),
            None => Err(CmsError::InvalidLocale {
                code: code.to_string(),
                supported: self.codes().collect::<Vec<_>>().join(", "),
            }),
        }
    }
}

impl Default for LocaleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_locales() -> Vec<LocaleConfig> {
    vec![
        LocaleConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_fallback: true,
        },
        LocaleConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            is_fallback: false,
        },
        LocaleConfig {
            code: "nl",
            name: "Dutch",
            native_name: "Nederlands",
            is_fallback: false,
        },
        LocaleConfig {
            code: "es",
            name: "Spanish",
            native_name: "Español",
            is_fallback: false,
        },
        LocaleConfig {
            code: "pt",
            name: "Portuguese",
            native_name: "Português",
            is_fallback: false,
        },
    ]
}
