//! Content validation for translatable and SEO fields.
//!
//! Hard limits mirror the storage column sizes and are reported as errors.
//! Search-engine recommendations are reported as warnings: they are logged
//! by the importer but never reject an item.

use regex::Regex;
use std::sync::OnceLock;

use crate::content::SeoFields;
use crate::error::{CmsError, CmsResult};

/// Maximum field lengths, in characters.
pub mod limits {
    pub const TITLE: usize = 255;
    pub const SUBTITLE: usize = 500;
    pub const SHORT_DESCRIPTION: usize = 200;
    pub const META_TITLE: usize = 60;
    pub const META_DESCRIPTION: usize = 320;
    pub const OG_TITLE: usize = 60;
    pub const OG_DESCRIPTION: usize = 200;
    pub const JSONLD_TYPE: usize = 100;
    pub const SECTION_TITLE: usize = 255;
    pub const CTA_LABEL: usize = 255;
    pub const CTA_URL: usize = 500;
    pub const CAPTION: usize = 255;
    pub const NAME: usize = 200;
    pub const LABEL: usize = 100;
}

/// Recommended meta title length range for search results.
const META_TITLE_RECOMMENDED: (usize, usize) = (50, 60);

/// Recommended meta description length range for search results.
const META_DESCRIPTION_RECOMMENDED: (usize, usize) = (150, 160);

/// Validation report containing errors and warnings about a content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Violations that reject the item
    pub errors: Vec<String>,

    /// Recommendations that are reported but accepted
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }

    /// Append everything found by another report.
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert into a result: errors reject, warnings are handed back.
    pub fn into_result(self) -> CmsResult<Vec<String>> {
        if self.has_errors() {
            Err(CmsError::Validation(self.errors.join("; ")))
        } else {
            Ok(self.warnings)
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for slugs, field lengths and SEO metadata.
pub struct ContentValidator;

static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();

impl ContentValidator {
    /// Check that a slug is non-empty and URL-safe (letters, digits, `-`, `_`).
    pub fn validate_slug(slug: &str) -> CmsResult<()> {
        let regex = SLUG_REGEX.get_or_init(|| {
            Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is a valid regex")
        });

        if regex.is_match(slug) {
            Ok(())
        } else if slug.is_empty() {
            Err(CmsError::validation("Slug cannot be empty"))
        } else {
            Err(CmsError::validation(format!(
                "Invalid slug '{slug}': use letters, numbers, hyphens or underscores"
            )))
        }
    }

    /// Record an error if `value` is longer than `max` characters.
    pub fn check_length(report: &mut ValidationReport, field: &str, value: &str, max: usize) {
        let length = value.chars().count();
        if length > max {
            report.errors.push(format!(
                "{field} is {length} characters long (maximum {max})"
            ));
        }
    }

    /// Validate a full set of SEO fields.
    pub fn validate_seo(seo: &SeoFields) -> ValidationReport {
        let mut report = ValidationReport::new();
        Self::check_length(&mut report, "meta_title", &seo.meta_title, limits::META_TITLE);
        Self::check_length(
            &mut report,
            "meta_description",
            &seo.meta_description,
            limits::META_DESCRIPTION,
        );
        if let Some(og_title) = &seo.og_title {
            Self::check_length(&mut report, "og_title", og_title, limits::OG_TITLE);
        }
        if let Some(og_description) = &seo.og_description {
            Self::check_length(
                &mut report,
                "og_description",
                og_description,
                limits::OG_DESCRIPTION,
            );
        }
        Self::check_length(&mut report, "jsonld_type", &seo.jsonld_type, limits::JSONLD_TYPE);
        Self::seo_recommendations(&mut report, &seo.meta_title, &seo.meta_description);
        report
    }

    /// Warn when non-empty meta fields fall outside the recommended ranges.
    pub fn seo_recommendations(
        report: &mut ValidationReport,
        meta_title: &str,
        meta_description: &str,
    ) {
        let title_len = meta_title.chars().count();
        let (min, max) = META_TITLE_RECOMMENDED;
        if title_len > 0 && !(min..=max).contains(&title_len) {
            report.warnings.push(format!(
                "meta_title is {title_len} characters; {min}-{max} is recommended"
            ));
        }

        let description_len = meta_description.chars().count();
        let (min, max) = META_DESCRIPTION_RECOMMENDED;
        if description_len > 0 && !(min..=max).contains(&description_len) {
            report.warnings.push(format!(
                "meta_description is {description_len} characters; {min}-{max} is recommended"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Slug Tests ====================

    #[test]
    fn test_valid_slugs() {
        for slug in ["about", "belem-tower", "city_guide_2024", "A-Z"] {
            assert!(ContentValidator::validate_slug(slug).is_ok(), "{slug}");
        }
    }

    #[test]
    fn test_invalid_slugs() {
        for slug in ["with space", "a/b", "café", "x?y"] {
            assert!(ContentValidator::validate_slug(slug).is_err(), "{slug}");
        }
    }

    #[test]
    fn test_empty_slug_message() {
        let err = ContentValidator::validate_slug("").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    // ==================== Length Tests ====================

    #[test]
    fn test_check_length_counts_characters_not_bytes() {
        let mut report = ValidationReport::new();
        let accented = "é".repeat(limits::META_TITLE);
        ContentValidator::check_length(&mut report, "meta_title", &accented, limits::META_TITLE);
        assert!(!report.has_errors());

        ContentValidator::check_length(
            &mut report,
            "meta_title",
            &format!("{accented}é"),
            limits::META_TITLE,
        );
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("maximum 60"));
    }

    // ==================== SEO Tests ====================

    #[test]
    fn test_default_seo_is_clean() {
        let report = ContentValidator::validate_seo(&SeoFields::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_meta_title_over_limit_is_error() {
        let seo = SeoFields {
            meta_title: "x".repeat(61),
            ..SeoFields::default()
        };
        let report = ContentValidator::validate_seo(&seo);
        assert!(report.has_errors());
    }

    #[test]
    fn test_short_meta_title_is_warning_only() {
        let seo = SeoFields {
            meta_title: "Lisbon".to_string(),
            ..SeoFields::default()
        };
        let report = ContentValidator::validate_seo(&seo);
        assert!(!report.has_errors());
        assert!(report.has_warnings());
        assert!(report.warnings[0].contains("50-60"));
    }

    #[test]
    fn test_recommended_lengths_are_clean() {
        let seo = SeoFields {
            meta_title: "t".repeat(55),
            meta_description: "d".repeat(155),
            ..SeoFields::default()
        };
        assert!(ContentValidator::validate_seo(&seo).is_clean());
    }

    #[test]
    fn test_og_fields_checked_when_present() {
        let seo = SeoFields {
            og_description: Some("d".repeat(201)),
            ..SeoFields::default()
        };
        let report = ContentValidator::validate_seo(&seo);
        assert!(report.errors[0].starts_with("og_description"));
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_into_result_rejects_errors() {
        let mut report = ValidationReport::new();
        report.errors.push("title too long".to_string());
        report.errors.push("slug invalid".to_string());
        let err = report.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: title too long; slug invalid");
    }

    #[test]
    fn test_into_result_returns_warnings() {
        let mut report = ValidationReport::new();
        report.warnings.push("short".to_string());
        assert_eq!(report.into_result().unwrap(), vec!["short".to_string()]);
    }

    #[test]
    fn test_merge() {
        let mut report = ValidationReport::new();
        let mut other = ValidationReport::new();
        other.warnings.push("w".to_string());
        report.merge(other);
        assert!(report.has_warnings());
        assert!(!report.has_errors());
    }
}
