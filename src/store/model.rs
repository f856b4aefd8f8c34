//! Read models and write inputs exchanged with a [`ContentStore`](super::ContentStore).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::content::{
    BlogCategory, BlogPost, City, Country, Destination, DestinationCategory, HeroSlide,
    Localized, NavTarget, PageType, Section, SectionType, SeoFields, Translation,
};
use crate::i18n::{limits, ContentValidator, Locale, ValidationReport};

// ==================== Read models ====================

/// Optional hierarchy context for destination lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DestinationScope {
    pub country: Option<String>,
    pub city: Option<String>,
}

impl DestinationScope {
    pub fn new(country: Option<&str>, city: Option<&str>) -> Self {
        let owned = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            country: owned(country),
            city: owned(city),
        }
    }

    pub fn matches(&self, country: &Country, city: &City) -> bool {
        self.country.as_deref().map_or(true, |slug| slug == country.slug)
            && self.city.as_deref().map_or(true, |slug| slug == city.slug)
    }
}

/// A country with its public content counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySummary {
    pub country: Country,
    /// Published cities
    pub cities_count: i64,
    /// Published destinations in any of its cities
    pub destinations_count: i64,
    /// Translations of published destinations in any of its cities
    pub stories_count: i64,
}

impl CountrySummary {
    pub fn has_content(&self) -> bool {
        self.destinations_count > 0 || self.stories_count > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CitySummary {
    pub city: City,
    pub country: CountrySummary,
    /// Published destinations
    pub destinations_count: i64,
}

/// A destination with its translations and hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationDetail {
    pub destination: Localized<Destination>,
    pub city: CitySummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogCategorySummary {
    pub category: BlogCategory,
    /// Published posts
    pub posts_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostDetail {
    pub post: Localized<BlogPost>,
    pub category: BlogCategorySummary,
}

/// Totals shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentStats {
    pub pages: PageStats,
    pub destinations: DestinationStats,
    pub blog: BlogStats,
    pub navigation: NavigationStats,
    pub footer: FooterStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageStats {
    pub total: i64,
    pub published: i64,
    pub translations: i64,
    pub sections: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DestinationStats {
    pub countries: i64,
    pub countries_published: i64,
    pub cities: i64,
    pub cities_published: i64,
    pub destinations: i64,
    pub destinations_published: i64,
    pub translations: i64,
    pub sections: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlogStats {
    pub categories: i64,
    pub categories_published: i64,
    pub posts: i64,
    pub posts_published: i64,
    pub translations: i64,
    pub sections: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationStats {
    pub menu_items: i64,
    pub active_items: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FooterStats {
    pub footer_blocks: i64,
    pub footer_links: i64,
}

// ==================== Write results ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Id of the written row and whether it was inserted or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
    pub id: i64,
    pub outcome: UpsertOutcome,
}

impl Upserted {
    pub fn created(id: i64) -> Self {
        Self {
            id,
            outcome: UpsertOutcome::Created,
        }
    }

    pub fn updated(id: i64) -> Self {
        Self {
            id,
            outcome: UpsertOutcome::Updated,
        }
    }

    pub fn is_created(&self) -> bool {
        self.outcome == UpsertOutcome::Created
    }
}

// ==================== Write inputs ====================

#[derive(Debug, Clone, PartialEq)]
pub struct CountryInput {
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub hero_image: Option<String>,
    pub seo: SeoFields,
    pub is_published: bool,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityInput {
    pub country_slug: String,
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub hero_image: Option<String>,
    pub seo: SeoFields,
    pub is_published: bool,
    pub order: i32,
}

/// Destination identity is `(city, slug)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationInput {
    /// Narrows the city lookup when city slugs repeat across countries
    pub country_slug: Option<String>,
    pub city_slug: String,
    pub slug: String,
    pub category: DestinationCategory,
    pub tags: String,
    pub seo: SeoFields,
    pub is_featured: bool,
    pub is_published: bool,
    pub hero_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageInput {
    pub slug: String,
    pub page_type: PageType,
    pub is_published: bool,
    pub hero_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogCategoryInput {
    pub slug: String,
    pub name: String,
    pub is_published: bool,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostInput {
    /// Category slug; the first category (lowest id) when absent
    pub category_slug: Option<String>,
    pub slug: String,
    pub hero_image: Option<String>,
    pub seo: SeoFields,
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomepageCategoryInput {
    pub slug: String,
    pub order: i32,
    pub seo: SeoFields,
    pub is_active: bool,
    pub translation: Option<HomepageTranslationInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomepageTranslationInput {
    pub locale: Locale,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationItemInput {
    pub locale: Locale,
    pub label: String,
    pub target: NavTarget,
    pub order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FooterBlockInput {
    pub locale: Locale,
    pub title: String,
    pub body: String,
    pub order: i32,
    pub links: Vec<FooterLinkInput>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FooterLinkInput {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SectionInput {
    pub section_type: SectionType,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cta_label: String,
    #[serde(default)]
    pub cta_url: String,
}

impl SectionInput {
    pub(crate) fn into_section(self, id: i64) -> Section {
        Section {
            id,
            section_type: self.section_type,
            order: self.order,
            title: self.title,
            body: self.body,
            image: self.image,
            cta_label: self.cta_label,
            cta_url: self.cta_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeroSlideInput {
    pub image: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub order: i32,
}

impl HeroSlideInput {
    pub(crate) fn into_slide(self, id: i64) -> HeroSlide {
        HeroSlide {
            id,
            image: self.image,
            caption: self.caption,
            order: self.order,
        }
    }
}

/// Partial update of a translation. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TranslationPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub short_description: Option<String>,
    pub body: Option<String>,
    pub hero_image: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub seo_enabled: Option<bool>,
    pub jsonld_type: Option<String>,
    pub jsonld_override: Option<String>,
    pub sections: Option<Vec<SectionInput>>,
    pub hero_slides: Option<Vec<HeroSlideInput>>,
}

impl TranslationPatch {
    /// Check field lengths and SEO recommendations.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        let text_fields = [
            ("title", &self.title, limits::TITLE),
            ("subtitle", &self.subtitle, limits::SUBTITLE),
            ("short_description", &self.short_description, limits::SHORT_DESCRIPTION),
            ("meta_title", &self.meta_title, limits::META_TITLE),
            ("meta_description", &self.meta_description, limits::META_DESCRIPTION),
            ("og_title", &self.og_title, limits::OG_TITLE),
            ("og_description", &self.og_description, limits::OG_DESCRIPTION),
            ("jsonld_type", &self.jsonld_type, limits::JSONLD_TYPE),
        ];
        for (field, value, max) in text_fields {
            if let Some(value) = value {
                ContentValidator::check_length(&mut report, field, value, max);
            }
        }

        for (i, section) in self.sections.iter().flatten().enumerate() {
            let n = i + 1;
            ContentValidator::check_length(
                &mut report,
                &format!("sections[{n}].title"),
                &section.title,
                limits::SECTION_TITLE,
            );
            ContentValidator::check_length(
                &mut report,
                &format!("sections[{n}].cta_label"),
                &section.cta_label,
                limits::CTA_LABEL,
            );
            ContentValidator::check_length(
                &mut report,
                &format!("sections[{n}].cta_url"),
                &section.cta_url,
                limits::CTA_URL,
            );
        }

        for (i, slide) in self.hero_slides.iter().flatten().enumerate() {
            ContentValidator::check_length(
                &mut report,
                &format!("hero_slides[{}].caption", i + 1),
                &slide.caption,
                limits::CAPTION,
            );
        }

        ContentValidator::seo_recommendations(
            &mut report,
            self.meta_title.as_deref().unwrap_or_default(),
            self.meta_description.as_deref().unwrap_or_default(),
        );
        report
    }

    /// Apply the scalar fields of this patch onto an existing translation.
    ///
    /// Sections and hero slides are not touched; stores replace them
    /// separately because they own the child ids.
    pub fn apply_to(&self, translation: &mut Translation) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        fn set_opt(target: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value {
                *target = Some(value.clone()).filter(|v| !v.is_empty());
            }
        }

        set(&mut translation.title, &self.title);
        set(&mut translation.subtitle, &self.subtitle);
        set(&mut translation.short_description, &self.short_description);
        set(&mut translation.body, &self.body);
        set_opt(&mut translation.hero_image, &self.hero_image);
        set(&mut translation.seo.meta_title, &self.meta_title);
        set(&mut translation.seo.meta_description, &self.meta_description);
        set_opt(&mut translation.seo.og_title, &self.og_title);
        set_opt(&mut translation.seo.og_description, &self.og_description);
        set_opt(&mut translation.seo.og_image, &self.og_image);
        set_opt(&mut translation.seo.canonical_url, &self.canonical_url);
        if let Some(enabled) = self.seo_enabled {
            translation.seo.seo_enabled = enabled;
        }
        set(&mut translation.seo.jsonld_type, &self.jsonld_type);
        set(&mut translation.seo.jsonld_override, &self.jsonld_override);
        translation.updated_at = Utc::now();
    }

    /// Build a brand-new translation from this patch, defaults elsewhere.
    pub fn new_translation(&self, id: i64, locale: Locale, default_title: &str) -> Translation {
        let now = Utc::now();
        let mut translation = Translation {
            id,
            locale: locale.code().to_string(),
            title: default_title.to_string(),
            subtitle: String::new(),
            short_description: String::new(),
            body: String::new(),
            hero_image: None,
            seo: SeoFields::default(),
            sections: Vec::new(),
            hero_slides: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.apply_to(&mut translation);
        translation.created_at = translation.updated_at;
        translation
    }
}

/// Title-case a slug for use as a default display name ("belem-tower" → "Belem Tower").
pub fn title_from_slug(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
