//! Translation coverage reporting.
//!
//! For every registry locale, counts how many published pages, blog posts and
//! destinations have a translation in that locale.

use serde::Serialize;

use crate::content::{TranslatableKind, TranslatableSummary};
use crate::i18n::LocaleRegistry;

/// Coverage of one content kind in one locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageStat {
    /// Published entities translated into the locale
    pub translated: usize,

    /// Published entities of the kind
    pub total: usize,

    /// Translated share as a percentage (0-100), one decimal
    pub percentage: f64,
}

impl CoverageStat {
    pub fn new(translated: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            ((translated as f64 / total as f64) * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Self {
            translated,
            total,
            percentage,
        }
    }
}

/// Coverage row for a single locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocaleCoverage {
    pub locale_code: &'static str,
    pub locale_name: &'static str,
    pub pages: CoverageStat,
    pub blog_posts: CoverageStat,
    pub destinations: CoverageStat,
}

/// Build the coverage table, one row per registry locale in registry order.
///
/// Unpublished entities are ignored, so a percentage never exceeds 100.
pub fn translation_coverage(
    registry: &LocaleRegistry,
    inventory: &[TranslatableSummary],
) -> Vec<LocaleCoverage> {
    let stat = |kind: TranslatableKind, locale: &str| {
        let published = inventory
            .iter()
            .filter(|entry| entry.kind == kind && entry.is_published);
        let total = published.clone().count();
        let translated = published.filter(|entry| entry.has_locale(locale)).count();
        CoverageStat::new(translated, total)
    };

    registry
        .list()
        .iter()
        .map(|locale| LocaleCoverage {
            locale_code: locale.code,
            locale_name: locale.name,
            pages: stat(TranslatableKind::Page, locale.code),
            blog_posts: stat(TranslatableKind::BlogPost, locale.code),
            destinations: stat(TranslatableKind::Destination, locale.code),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(kind: TranslatableKind, id: i64, published: bool, locales: &[&str]) -> TranslatableSummary {
        TranslatableSummary {
            kind,
            id,
            slug: format!("{}-{}", kind, id),
            is_published: published,
            locales: locales.iter().map(|l| l.to_string()).collect(),
            updated_at: Utc::now(),
        }
    }

    // ==================== CoverageStat Tests ====================

    #[test]
    fn test_stat_empty_total_is_zero_percent() {
        let stat = CoverageStat::new(0, 0);
        assert_eq!(stat.percentage, 0.0);
    }

    #[test]
    fn test_stat_rounds_to_one_decimal() {
        // 1/3 = 33.333...%
        assert_eq!(CoverageStat::new(1, 3).percentage, 33.3);
        // 2/3 = 66.666...%
        assert_eq!(CoverageStat::new(2, 3).percentage, 66.7);
    }

    #[test]
    fn test_stat_full_coverage() {
        assert_eq!(CoverageStat::new(4, 4).percentage, 100.0);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_one_row_per_locale_in_registry_order() {
        let registry = LocaleRegistry::standard();
        let rows = translation_coverage(&registry, &[]);
        let codes: Vec<_> = rows.iter().map(|r| r.locale_code).collect();
        assert_eq!(codes, vec!["en", "fr", "nl", "es", "pt"]);
        assert_eq!(rows[1].locale_name, "French");
    }

    #[test]
    fn test_counts_per_kind_and_locale() {
        let registry = LocaleRegistry::standard();
        let inventory = vec![
            entry(TranslatableKind::Page, 1, true, &["en", "fr"]),
            entry(TranslatableKind::Page, 2, true, &["en"]),
            entry(TranslatableKind::BlogPost, 3, true, &["fr"]),
            entry(TranslatableKind::Destination, 4, true, &[]),
        ];

        let rows = translation_coverage(&registry, &inventory);
        let en = &rows[0];
        let fr = &rows[1];

        assert_eq!(en.pages, CoverageStat::new(2, 2));
        assert_eq!(fr.pages.translated, 1);
        assert_eq!(fr.pages.percentage, 50.0);
        assert_eq!(fr.blog_posts.percentage, 100.0);
        assert_eq!(en.destinations, CoverageStat::new(0, 1));
    }

    #[test]
    fn test_unpublished_entities_are_ignored() {
        let registry = LocaleRegistry::standard();
        let inventory = vec![
            entry(TranslatableKind::Page, 1, true, &["en"]),
            entry(TranslatableKind::Page, 2, false, &["en", "nl"]),
        ];

        let rows = translation_coverage(&registry, &inventory);
        assert_eq!(rows[0].pages.total, 1);
        assert_eq!(rows[0].pages.translated, 1);
        assert_eq!(rows[2].pages.translated, 0);
    }
}
