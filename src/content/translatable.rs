//! The translatable-content capability shared by Page, Destination and BlogPost.
//!
//! Resolution and presentation are written once against [`Translatable`]
//! instead of once per entity type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::content::{BlogPost, Destination, Page, Translation};
use crate::error::CmsError;

/// Entity kinds that own per-locale translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslatableKind {
    Page,
    Destination,
    BlogPost,
}

impl TranslatableKind {
    pub const ALL: [TranslatableKind; 3] = [
        TranslatableKind::Page,
        TranslatableKind::Destination,
        TranslatableKind::BlogPost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TranslatableKind::Page => "page",
            TranslatableKind::Destination => "destination",
            TranslatableKind::BlogPost => "blog_post",
        }
    }
}

impl fmt::Display for TranslatableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslatableKind {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(TranslatableKind::Page),
            "destination" => Ok(TranslatableKind::Destination),
            "blog_post" => Ok(TranslatableKind::BlogPost),
            other => Err(CmsError::validation(format!(
                "'{other}' is not a translatable content kind"
            ))),
        }
    }
}

/// Locale-independent identity of a translatable entity.
pub trait ContentEntity {
    const KIND: TranslatableKind;

    fn id(&self) -> i64;
    fn slug(&self) -> &str;
    fn is_published(&self) -> bool;

    /// Entity-level hero image, used when the translation has none.
    fn hero_image(&self) -> Option<&str>;

    fn updated_at(&self) -> DateTime<Utc>;
}

impl ContentEntity for Page {
    const KIND: TranslatableKind = TranslatableKind::Page;

    fn id(&self) -> i64 {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn is_published(&self) -> bool {
        self.is_published
    }

    fn hero_image(&self) -> Option<&str> {
        self.hero_image.as_deref()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl ContentEntity for Destination {
    const KIND: TranslatableKind = TranslatableKind::Destination;

    fn id(&self) -> i64 {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn is_published(&self) -> bool {
        self.is_published
    }

    fn hero_image(&self) -> Option<&str> {
        self.hero_image.as_deref()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl ContentEntity for BlogPost {
    const KIND: TranslatableKind = TranslatableKind::BlogPost;

    fn id(&self) -> i64 {
        self.id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn is_published(&self) -> bool {
        self.is_published
    }

    fn hero_image(&self) -> Option<&str> {
        self.hero_image.as_deref()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Anything that exposes a set of per-locale translations.
pub trait Translatable {
    /// All translations; at most one per locale.
    fn translations(&self) -> &[Translation];

    fn translation_for(&self, locale: &str) -> Option<&Translation> {
        self.translations().iter().find(|t| t.locale == locale)
    }

    fn has_translation(&self, locale: &str) -> bool {
        self.translation_for(locale).is_some()
    }

    /// Locales with a translation, sorted by code.
    fn available_locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self
            .translations()
            .iter()
            .map(|t| t.locale.as_str())
            .collect();
        locales.sort_unstable();
        locales
    }
}

/// Identity of a translatable entity plus the locales it is translated into.
///
/// Lighter than a [`Localized`] value: no translation content is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatableSummary {
    pub kind: TranslatableKind,
    pub id: i64,
    pub slug: String,
    pub is_published: bool,
    pub locales: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl TranslatableSummary {
    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.iter().any(|code| code == locale)
    }
}

/// An entity loaded together with all of its translations.
#[derive(Debug, Clone, PartialEq)]
pub struct Localized<E> {
    pub entity: E,
    pub translations: Vec<Translation>,
}

impl<E: ContentEntity> Localized<E> {
    /// Bundle an entity with its translations, sorting them by locale code
    /// and their children into display order.
    pub fn new(entity: E, mut translations: Vec<Translation>) -> Self {
        translations.sort_by(|a, b| a.locale.cmp(&b.locale));
        for translation in &mut translations {
            translation.sort_children();
        }
        Self {
            entity,
            translations,
        }
    }
}

impl<E: ContentEntity> Localized<E> {
    pub fn summary(&self) -> TranslatableSummary {
        TranslatableSummary {
            kind: E::KIND,
            id: self.entity.id(),
            slug: self.entity.slug().to_string(),
            is_published: self.entity.is_published(),
            locales: self
                .available_locales()
                .into_iter()
                .map(str::to_string)
                .collect(),
            updated_at: self.entity.updated_at(),
        }
    }
}

impl<E> Translatable for Localized<E> {
    fn translations(&self) -> &[Translation] {
        &self.translations
    }
}

impl Translatable for [Translation] {
    fn translations(&self) -> &[Translation] {
        self
    }
}

impl Translatable for Vec<Translation> {
    fn translations(&self) -> &[Translation] {
        self
    }
}
