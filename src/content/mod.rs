//! Content entity model.
//!
//! Hierarchies: Country → City → Destination, BlogCategory → BlogPost, plus
//! stand-alone Pages and homepage categories. Only Page, Destination and
//! BlogPost carry per-locale [`Translation`]s; each translation owns its
//! ordered sections and hero slides.

mod entity;
mod homepage;
mod navigation;
mod seo;
mod translatable;
mod translation;

pub use entity::{
    BlogCategory, BlogPost, City, Country, Destination, DestinationCategory, Page, PageType,
};
pub use homepage::{HomepageCard, HomepageCategory, HomepageCategoryTranslation};
pub use navigation::{FooterBlock, FooterLink, NavTarget, NavigationItem};
pub use seo::SeoFields;
pub use translatable::{
    ContentEntity, Localized, Translatable, TranslatableKind, TranslatableSummary,
};
pub use translation::{HeroSlide, Section, SectionType, Translation};

#[cfg(test)]
pub(crate) use translatable::test_support;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CmsError;

/// Every content variant the backend manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Page,
    Country,
    City,
    Destination,
    BlogCategory,
    BlogPost,
    HomepageCategory,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Page => "page",
            ContentKind::Country => "country",
            ContentKind::City => "city",
            ContentKind::Destination => "destination",
            ContentKind::BlogCategory => "blog_category",
            ContentKind::BlogPost => "blog_post",
            ContentKind::HomepageCategory => "homepage_category",
        }
    }

    /// The translatable kind, when this variant carries translations.
    pub fn translatable(&self) -> Option<TranslatableKind> {
        match self {
            ContentKind::Page => Some(TranslatableKind::Page),
            ContentKind::Destination => Some(TranslatableKind::Destination),
            ContentKind::BlogPost => Some(TranslatableKind::BlogPost),
            _ => None,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(ContentKind::Page),
            "country" => Ok(ContentKind::Country),
            "city" => Ok(ContentKind::City),
            "destination" => Ok(ContentKind::Destination),
            "blog_category" => Ok(ContentKind::BlogCategory),
            "blog_post" => Ok(ContentKind::BlogPost),
            "homepage_category" => Ok(ContentKind::HomepageCategory),
            other => Err(CmsError::validation(format!("Unknown content kind '{other}'"))),
        }
    }
}
