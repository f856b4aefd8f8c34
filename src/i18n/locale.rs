//! Locale type: a locale code that has been checked against a registry.

use serde::{Serialize, Serializer};
use std::fmt;

/// A validated locale.
///
/// Values are only produced by `LocaleRegistry::parse` (or the constants
/// below), so holding a `Locale` means the code was supported by the
/// registry that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    /// ISO 639-1 language code (e.g., "en", "fr")
    code: &'static str,
}

impl Locale {
    /// English, the fallback locale of the standard registry.
    pub const ENGLISH: Locale = Locale { code: "en" };

    pub(crate) fn new(code: &'static str) -> Self {
        Self { code }
    }

    /// Get the ISO 639-1 locale code.
    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        self.code
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.code == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.code == *other
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
