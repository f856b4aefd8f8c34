//! Internationalization (i18n) module for multi-locale content.
//!
//! All locale-related logic lives here: which locales exist, how a
//! translatable entity resolves to a single locale, and how well each locale
//! is covered.
//!
//! # Architecture
//!
//! - `registry`: the set of supported locales and the fallback locale
//! - `locale`: validated `Locale` values produced by the registry
//! - `resolver`: translation selection with the fallback chain
//! - `coverage`: per-locale translation coverage for the admin dashboard
//! - `validator`: slug, field-length and SEO checks for imported content
//!
//! # Example
//!
//! ```rust,ignore
//! use travel_cms::i18n::{LocaleRegistry, TranslationResolver};
//!
//! let registry = LocaleRegistry::standard();
//! let resolver = TranslationResolver::new(&registry);
//! let resolution = resolver.resolve(&page, Some("es"));
//! assert!(resolution.translation_missing());
//! ```

mod coverage;
mod locale;
mod registry;
mod resolver;
mod validator;

pub use coverage::{translation_coverage, CoverageStat, LocaleCoverage};
pub use locale::Locale;
pub use registry::{LocaleConfig, LocaleRegistry};
pub use resolver::{Resolution, TranslationResolver};
pub use validator::{limits, ContentValidator, ValidationReport};
