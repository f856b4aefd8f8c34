//! Bulk JSON import.
//!
//! A payload is a JSON array of objects, all of one [`ImportKind`]. Items are
//! upserted one at a time; a failing item is recorded as
//! `"Item {n}: {reason}"` and skipped without aborting the rest of the batch.
//!
//! Entity items take defaults for absent fields. Translation items are
//! patches: absent fields keep the stored value on update.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::content::{DestinationCategory, NavTarget, PageType, SeoFields, TranslatableKind};
use crate::error::{CmsError, CmsResult};
use crate::i18n::{limits, ContentValidator, Locale, LocaleRegistry, ValidationReport};
use crate::store::{
    title_from_slug, BlogCategoryInput, BlogPostInput, CityInput, ContentStore, CountryInput,
    DestinationInput, DestinationScope, FooterBlockInput, FooterLinkInput, HomepageCategoryInput,
    HomepageTranslationInput, NavigationItemInput, PageInput, TranslationPatch, Upserted,
};

/// What a payload contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Countries,
    Cities,
    Destinations,
    DestinationTranslations,
    Pages,
    BlogCategories,
    BlogPosts,
    BlogPostTranslations,
    HomepageCategories,
    NavigationItems,
    FooterBlocks,
}

impl ImportKind {
    /// Dependency order: parents before the content that references them.
    pub const ALL: [ImportKind; 11] = [
        ImportKind::Countries,
        ImportKind::Cities,
        ImportKind::Destinations,
        ImportKind::DestinationTranslations,
        ImportKind::Pages,
        ImportKind::BlogCategories,
        ImportKind::BlogPosts,
        ImportKind::BlogPostTranslations,
        ImportKind::HomepageCategories,
        ImportKind::NavigationItems,
        ImportKind::FooterBlocks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Countries => "countries",
            ImportKind::Cities => "cities",
            ImportKind::Destinations => "destinations",
            ImportKind::DestinationTranslations => "destination_translations",
            ImportKind::Pages => "pages",
            ImportKind::BlogCategories => "blog_categories",
            ImportKind::BlogPosts => "blog_posts",
            ImportKind::BlogPostTranslations => "blog_post_translations",
            ImportKind::HomepageCategories => "homepage_categories",
            ImportKind::NavigationItems => "navigation_items",
            ImportKind::FooterBlocks => "footer_blocks",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                CmsError::validation(format!(
                    "Unknown import kind '{}'. Expected one of: {}",
                    s,
                    ImportKind::ALL.map(|k| k.as_str()).join(", ")
                ))
            })
    }
}

/// Outcome of one import batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    fn record(&mut self, upserted: Upserted) {
        if upserted.is_created() {
            self.created += 1;
        } else {
            self.updated += 1;
        }
    }

    fn fail(&mut self, item: usize, error: impl fmt::Display) {
        self.errors.push(format!("Item {}: {}", item, error));
        self.skipped += 1;
    }

    pub fn processed(&self) -> usize {
        self.created + self.updated + self.skipped
    }
}

// ==================== Item shapes ====================

/// Entity-level SEO columns; absent values take entity defaults.
#[derive(Debug, Clone, Default, Deserialize)]
struct SeoItem {
    meta_title: Option<String>,
    meta_description: Option<String>,
    og_title: Option<String>,
    og_description: Option<String>,
    og_image: Option<String>,
    canonical_url: Option<String>,
    seo_enabled: Option<bool>,
    jsonld_type: Option<String>,
    jsonld_override: Option<String>,
}

impl SeoItem {
    fn into_fields(self, default_jsonld_type: &str) -> SeoFields {
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());
        SeoFields {
            meta_title: self.meta_title.unwrap_or_default(),
            meta_description: self.meta_description.unwrap_or_default(),
            og_title: non_empty(self.og_title),
            og_description: non_empty(self.og_description),
            og_image: non_empty(self.og_image),
            canonical_url: non_empty(self.canonical_url),
            seo_enabled: self.seo_enabled.unwrap_or(true),
            jsonld_type: self
                .jsonld_type
                .unwrap_or_else(|| default_jsonld_type.to_string()),
            jsonld_override: self.jsonld_override.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CountryItem {
    slug: String,
    name: Option<String>,
    short_description: Option<String>,
    hero_image: Option<String>,
    is_published: Option<bool>,
    order: Option<i32>,
    #[serde(flatten)]
    seo: SeoItem,
}

#[derive(Debug, Deserialize)]
struct CityItem {
    slug: String,
    country_slug: String,
    name: Option<String>,
    short_description: Option<String>,
    hero_image: Option<String>,
    is_published: Option<bool>,
    order: Option<i32>,
    #[serde(flatten)]
    seo: SeoItem,
}

/// Tags arrive either as a list or as a comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Tags {
    List(Vec<String>),
    Text(String),
}

impl Tags {
    fn joined(self) -> String {
        match self {
            Tags::List(tags) => tags.join(", "),
            Tags::Text(tags) => tags,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DestinationItem {
    slug: String,
    city_slug: String,
    country_slug: Option<String>,
    category: Option<DestinationCategory>,
    tags: Option<Tags>,
    is_featured: Option<bool>,
    is_published: Option<bool>,
    hero_image: Option<String>,
    #[serde(flatten)]
    seo: SeoItem,
}

#[derive(Debug, Deserialize)]
struct DestinationTranslationItem {
    destination_slug: String,
    city_slug: Option<String>,
    country_slug: Option<String>,
    locale: String,
    #[serde(flatten)]
    patch: TranslationPatch,
}

#[derive(Debug, Deserialize)]
struct PageTranslationItem {
    page_slug: String,
    page_type: Option<PageType>,
    locale: String,
    #[serde(flatten)]
    patch: TranslationPatch,
}

#[derive(Debug, Deserialize)]
struct BlogCategoryItem {
    slug: String,
    name: Option<String>,
    is_published: Option<bool>,
    order: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct BlogPostItem {
    slug: String,
    category_slug: Option<String>,
    hero_image: Option<String>,
    is_published: Option<bool>,
    #[serde(flatten)]
    seo: SeoItem,
    // Inline translation, used when `locale` is given
    locale: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlogPostTranslationItem {
    slug: String,
    category_slug: Option<String>,
    locale: String,
    #[serde(flatten)]
    patch: TranslationPatch,
}

#[derive(Debug, Deserialize)]
struct HomepageCategoryItem {
    slug: String,
    order: Option<i32>,
    is_active: Option<bool>,
    #[serde(flatten)]
    seo: SeoItem,
    locale: Option<String>,
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
    is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct NavigationItemRow {
    locale: String,
    label: String,
    target_type: String,
    target_value: String,
    order: Option<i32>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct FooterBlockItem {
    locale: String,
    title: String,
    #[serde(default)]
    body: String,
    order: Option<i32>,
    #[serde(default)]
    links: Vec<FooterLinkInput>,
}

// ==================== Importer ====================

/// Runs imports against a store.
pub struct Importer<'a, S> {
    store: &'a S,
    registry: &'a LocaleRegistry,
    max_bytes: usize,
}

impl<'a, S: ContentStore> Importer<'a, S> {
    pub fn new(store: &'a S, registry: &'a LocaleRegistry, max_bytes: usize) -> Self {
        Self {
            store,
            registry,
            max_bytes,
        }
    }

    /// Parse a raw payload and import it.
    ///
    /// # Returns
    /// * `Err(CmsError::PayloadTooLarge)` above the size limit
    /// * `Err(CmsError::Import)` if the payload is not a non-empty array of objects
    /// * `Ok(ImportReport)` otherwise, even when individual items failed
    pub async fn import_json(&self, kind: ImportKind, payload: &[u8]) -> CmsResult<ImportReport> {
        let items = self.parse_payload(payload)?;
        Ok(self.import_items(kind, items).await)
    }

    fn parse_payload(&self, payload: &[u8]) -> CmsResult<Vec<Value>> {
        if payload.len() > self.max_bytes {
            return Err(CmsError::PayloadTooLarge {
                size: payload.len(),
                limit: self.max_bytes,
            });
        }

        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| CmsError::Import(format!("Invalid JSON: {}", e)))?;
        let Value::Array(items) = value else {
            return Err(CmsError::Import("JSON must be an array of objects".to_string()));
        };
        if items.is_empty() {
            return Err(CmsError::Import("JSON array cannot be empty".to_string()));
        }
        if let Some(n) = items.iter().position(|item| !item.is_object()) {
            return Err(CmsError::Import(format!("Item {} is not a JSON object", n + 1)));
        }
        Ok(items)
    }

    /// Import already-parsed items. Never fails as a whole.
    pub async fn import_items(&self, kind: ImportKind, items: Vec<Value>) -> ImportReport {
        let mut report = ImportReport::default();
        info!("Importing {} {}", items.len(), kind);

        for (i, item) in items.into_iter().enumerate() {
            let n = i + 1;
            match self.import_item(kind, item).await {
                Ok(upserted) => {
                    debug!("{} item {}: {:?} #{}", kind, n, upserted.outcome, upserted.id);
                    report.record(upserted);
                }
                Err(e) => {
                    warn!("{} item {} skipped: {}", kind, n, e);
                    report.fail(n, e);
                }
            }
        }

        info!(
            "Imported {}: {} created, {} updated, {} skipped",
            kind, report.created, report.updated, report.skipped
        );
        report
    }

    /// Import a seed bundle: an object keyed by import kind, each value an
    /// array of items. Kinds are processed in dependency order.
    pub async fn import_bundle(&self, payload: &[u8]) -> CmsResult<Vec<(ImportKind, ImportReport)>> {
        if payload.len() > self.max_bytes {
            return Err(CmsError::PayloadTooLarge {
                size: payload.len(),
                limit: self.max_bytes,
            });
        }

        let value: Value = serde_json::from_slice(payload)
            .map_err(|e| CmsError::Import(format!("Invalid JSON: {}", e)))?;
        let Value::Object(mut sections) = value else {
            return Err(CmsError::Import(
                "Bundle must be an object keyed by import kind".to_string(),
            ));
        };

        for key in sections.keys() {
            if key.parse::<ImportKind>().is_err() {
                warn!("Ignoring unknown bundle section '{}'", key);
            }
        }

        let mut reports = Vec::new();
        for kind in ImportKind::ALL {
            let Some(section) = sections.remove(kind.as_str()) else {
                continue;
            };
            let Value::Array(items) = section else {
                return Err(CmsError::Import(format!("Section '{}' must be an array", kind)));
            };
            reports.push((kind, self.import_items(kind, items).await));
        }
        Ok(reports)
    }

    async fn import_item(&self, kind: ImportKind, item: Value) -> CmsResult<Upserted> {
        match kind {
            ImportKind::Countries => self.import_country(parse(item)?).await,
            ImportKind::Cities => self.import_city(parse(item)?).await,
            ImportKind::Destinations => self.import_destination(parse(item)?).await,
            ImportKind::DestinationTranslations => {
                self.import_destination_translation(parse(item)?).await
            }
            ImportKind::Pages => self.import_page_translation(parse(item)?).await,
            ImportKind::BlogCategories => self.import_blog_category(parse(item)?).await,
            ImportKind::BlogPosts => self.import_blog_post(parse(item)?).await,
            ImportKind::BlogPostTranslations => {
                self.import_blog_post_translation(parse(item)?).await
            }
            ImportKind::HomepageCategories => self.import_homepage_category(parse(item)?).await,
            ImportKind::NavigationItems => self.import_navigation_item(parse(item)?).await,
            ImportKind::FooterBlocks => self.import_footer_block(parse(item)?).await,
        }
    }

    fn locale(&self, code: &str) -> CmsResult<Locale> {
        self.registry.parse(code.trim())
    }

    async fn import_country(&self, item: CountryItem) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.slug)?;
        let input = CountryInput {
            name: item.name.unwrap_or_else(|| title_from_slug(&item.slug)),
            short_description: item.short_description.unwrap_or_default(),
            hero_image: non_empty(item.hero_image),
            seo: item.seo.into_fields("Country"),
            is_published: item.is_published.unwrap_or(true),
            order: item.order.unwrap_or(0),
            slug: item.slug,
        };
        check(entity_report(&input.name, &input.short_description, &input.seo))?;
        self.store.upsert_country(&input).await
    }

    async fn import_city(&self, item: CityItem) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.slug)?;
        ContentValidator::validate_slug(&item.country_slug)?;
        let input = CityInput {
            country_slug: item.country_slug,
            name: item.name.unwrap_or_else(|| title_from_slug(&item.slug)),
            short_description: item.short_description.unwrap_or_default(),
            hero_image: non_empty(item.hero_image),
            seo: item.seo.into_fields("City"),
            is_published: item.is_published.unwrap_or(true),
            order: item.order.unwrap_or(0),
            slug: item.slug,
        };
        check(entity_report(&input.name, &input.short_description, &input.seo))?;
        self.store.upsert_city(&input).await
    }

    async fn import_destination(&self, item: DestinationItem) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.slug)?;
        ContentValidator::validate_slug(&item.city_slug)?;
        if let Some(country) = &item.country_slug {
            ContentValidator::validate_slug(country)?;
        }
        let input = DestinationInput {
            country_slug: item.country_slug,
            city_slug: item.city_slug,
            slug: item.slug,
            category: item.category.unwrap_or_default(),
            tags: item.tags.map(Tags::joined).unwrap_or_default(),
            seo: item.seo.into_fields("TouristAttraction"),
            is_featured: item.is_featured.unwrap_or(false),
            is_published: item.is_published.unwrap_or(true),
            hero_image: non_empty(item.hero_image),
        };
        check(ContentValidator::validate_seo(&input.seo))?;
        self.store.upsert_destination(&input).await
    }

    async fn import_destination_translation(
        &self,
        item: DestinationTranslationItem,
    ) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.destination_slug)?;
        let locale = self.locale(&item.locale)?;
        check(item.patch.validate())?;

        let scope = DestinationScope::new(item.country_slug.as_deref(), item.city_slug.as_deref());
        let destination = self
            .store
            .find_destination(&item.destination_slug, &scope)
            .await?
            .ok_or_else(|| {
                CmsError::not_found(format!("Destination '{}'", item.destination_slug))
            })?;

        self.store
            .upsert_translation(
                TranslatableKind::Destination,
                destination.destination.entity.id,
                locale,
                &item.patch,
                &title_from_slug(&item.destination_slug),
            )
            .await
    }

    /// Page translations; the page is created (published) when missing.
    async fn import_page_translation(&self, item: PageTranslationItem) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.page_slug)?;
        let locale = self.locale(&item.locale)?;
        check(item.patch.validate())?;

        let page = self
            .store
            .ensure_page(&PageInput {
                slug: item.page_slug.clone(),
                page_type: item.page_type.unwrap_or_default(),
                is_published: true,
                hero_image: None,
            })
            .await?;

        self.store
            .upsert_translation(
                TranslatableKind::Page,
                page.id,
                locale,
                &item.patch,
                &title_from_slug(&item.page_slug),
            )
            .await
    }

    async fn import_blog_category(&self, item: BlogCategoryItem) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.slug)?;
        let input = BlogCategoryInput {
            name: item.name.unwrap_or_else(|| title_from_slug(&item.slug)),
            is_published: item.is_published.unwrap_or(true),
            order: item.order.unwrap_or(0),
            slug: item.slug,
        };
        let mut report = ValidationReport::new();
        ContentValidator::check_length(&mut report, "name", &input.name, limits::NAME);
        check(report)?;
        self.store.upsert_blog_category(&input).await
    }

    /// Blog posts, plus the inline translation when `locale` is present.
    async fn import_blog_post(&self, item: BlogPostItem) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.slug)?;
        if let Some(category) = &item.category_slug {
            ContentValidator::validate_slug(category)?;
        }
        let locale = item.locale.as_deref().map(|code| self.locale(code)).transpose()?;

        let patch = TranslationPatch {
            title: item.title,
            subtitle: item.subtitle,
            body: item.body,
            meta_title: item.seo.meta_title.clone(),
            meta_description: item.seo.meta_description.clone(),
            ..TranslationPatch::default()
        };
        if locale.is_some() {
            check(patch.validate())?;
        }

        let input = BlogPostInput {
            category_slug: item.category_slug,
            slug: item.slug,
            hero_image: non_empty(item.hero_image),
            seo: item.seo.into_fields("Article"),
            is_published: item.is_published.unwrap_or(true),
        };
        check(ContentValidator::validate_seo(&input.seo))?;
        let post = self.store.upsert_blog_post(&input).await?;

        if let Some(locale) = locale {
            self.store
                .upsert_translation(
                    TranslatableKind::BlogPost,
                    post.id,
                    locale,
                    &patch,
                    &title_from_slug(&input.slug),
                )
                .await?;
        }
        Ok(post)
    }

    /// Blog post translations; the post is created when missing.
    async fn import_blog_post_translation(
        &self,
        item: BlogPostTranslationItem,
    ) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.slug)?;
        if let Some(category) = &item.category_slug {
            ContentValidator::validate_slug(category)?;
        }
        let locale = self.locale(&item.locale)?;
        check(item.patch.validate())?;

        let post = self
            .store
            .ensure_blog_post(&BlogPostInput {
                category_slug: item.category_slug,
                slug: item.slug.clone(),
                hero_image: None,
                seo: SeoFields::with_jsonld_type("Article"),
                is_published: true,
            })
            .await?;

        self.store
            .upsert_translation(
                TranslatableKind::BlogPost,
                post.id,
                locale,
                &item.patch,
                &title_from_slug(&item.slug),
            )
            .await
    }

    async fn import_homepage_category(&self, item: HomepageCategoryItem) -> CmsResult<Upserted> {
        ContentValidator::validate_slug(&item.slug)?;
        let translation = match item.locale.as_deref() {
            Some(code) => Some(HomepageTranslationInput {
                locale: self.locale(code)?,
                title: item.title.unwrap_or_else(|| title_from_slug(&item.slug)),
                description: item.description.unwrap_or_default(),
                image: non_empty(item.image),
                is_published: item.is_published.unwrap_or(true),
            }),
            None => None,
        };
        if let Some(translation) = &translation {
            let mut report = ValidationReport::new();
            ContentValidator::check_length(&mut report, "title", &translation.title, limits::TITLE);
            check(report)?;
        }

        let input = HomepageCategoryInput {
            order: item.order.unwrap_or(0),
            seo: item.seo.into_fields(""),
            is_active: item.is_active.unwrap_or(true),
            translation,
            slug: item.slug,
        };
        check(ContentValidator::validate_seo(&input.seo))?;
        self.store.upsert_homepage_category(&input).await
    }

    async fn import_navigation_item(&self, item: NavigationItemRow) -> CmsResult<Upserted> {
        let locale = self.locale(&item.locale)?;
        let target = NavTarget::from_parts(item.target_type.trim(), item.target_value.trim())?;
        if !matches!(target, NavTarget::External(_)) {
            ContentValidator::validate_slug(target.value())?;
        }

        let mut report = ValidationReport::new();
        ContentValidator::check_length(&mut report, "label", &item.label, limits::LABEL);
        check(report)?;

        self.store
            .upsert_navigation_item(&NavigationItemInput {
                locale,
                label: item.label,
                target,
                order: item.order.unwrap_or(0),
                is_active: item.is_active.unwrap_or(true),
            })
            .await
    }

    async fn import_footer_block(&self, item: FooterBlockItem) -> CmsResult<Upserted> {
        let locale = self.locale(&item.locale)?;
        if item.title.trim().is_empty() {
            return Err(CmsError::validation("Footer block title cannot be empty"));
        }
        let mut report = ValidationReport::new();
        ContentValidator::check_length(&mut report, "title", &item.title, limits::TITLE);
        for (i, link) in item.links.iter().enumerate() {
            ContentValidator::check_length(
                &mut report,
                &format!("links[{}].label", i + 1),
                &link.label,
                limits::LABEL,
            );
        }
        check(report)?;

        self.store
            .upsert_footer_block(&FooterBlockInput {
                locale,
                title: item.title,
                body: item.body,
                order: item.order.unwrap_or(0),
                links: item.links,
            })
            .await
    }
}

fn parse<T: DeserializeOwned>(item: Value) -> CmsResult<T> {
    serde_json::from_value(item).map_err(|e| CmsError::validation(e.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn entity_report(name: &str, short_description: &str, seo: &SeoFields) -> ValidationReport {
    let mut report = ContentValidator::validate_seo(seo);
    ContentValidator::check_length(&mut report, "name", name, limits::NAME);
    ContentValidator::check_length(
        &mut report,
        "short_description",
        short_description,
        limits::SHORT_DESCRIPTION,
    );
    report
}

/// Reject on errors; log warnings and carry on.
fn check(report: ValidationReport) -> CmsResult<()> {
    for warning in report.into_result()? {
        warn!("Import warning: {}", warning);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Translatable;
    use crate::store::MemoryStore;
    use serde_json::json;

    const LIMIT: usize = 5 * 1024 * 1024;

    async fn run(store: &MemoryStore, kind: ImportKind, payload: Value) -> ImportReport {
        let registry = LocaleRegistry::standard();
        let importer = Importer::new(store, &registry, LIMIT);
        importer
            .import_json(kind, payload.to_string().as_bytes())
            .await
            .unwrap()
    }

    async fn seed_geography(store: &MemoryStore) {
        run(
            store,
            ImportKind::Countries,
            json!([{"slug": "portugal", "name": "Portugal"}]),
        )
        .await;
        run(
            store,
            ImportKind::Cities,
            json!([{"slug": "lisbon", "country_slug": "portugal"}]),
        )
        .await;
    }

    // ==================== Payload Tests ====================

    #[test]
    fn test_kind_parse() {
        assert_eq!(
            "destination_translations".parse::<ImportKind>().unwrap(),
            ImportKind::DestinationTranslations
        );
        let err = "users".parse::<ImportKind>().unwrap_err();
        assert!(err.to_string().contains("countries"));
    }

    #[tokio::test]
    async fn test_payload_must_be_non_empty_array_of_objects() {
        let store = MemoryStore::new();
        let registry = LocaleRegistry::standard();
        let importer = Importer::new(&store, &registry, LIMIT);

        for payload in ["{}", "[]", "[1, 2]", "not json"] {
            let err = importer
                .import_json(ImportKind::Countries, payload.as_bytes())
                .await
                .unwrap_err();
            assert!(matches!(err, CmsError::Import(_)), "{payload}: {err}");
        }
    }

    #[tokio::test]
    async fn test_payload_size_limit() {
        let store = MemoryStore::new();
        let registry = LocaleRegistry::standard();
        let importer = Importer::new(&store, &registry, 16);

        let payload = json!([{"slug": "portugal", "name": "Portugal"}]).to_string();
        let err = importer
            .import_json(ImportKind::Countries, payload.as_bytes())
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::PayloadTooLarge { limit: 16, .. }));
    }

    // ==================== Entity Tests ====================

    #[tokio::test]
    async fn test_countries_created_then_updated() {
        let store = MemoryStore::new();
        let payload = json!([
            {"slug": "portugal", "order": 1},
            {"slug": "spain", "name": "España", "is_published": false}
        ]);

        let report = run(&store, ImportKind::Countries, payload.clone()).await;
        assert_eq!((report.created, report.updated, report.skipped), (2, 0, 0));

        let report = run(&store, ImportKind::Countries, payload).await;
        assert_eq!((report.created, report.updated, report.skipped), (0, 2, 0));

        let countries = store.list_countries().await.unwrap();
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].country.name, "Portugal");
        assert_eq!(countries[0].country.seo.jsonld_type, "Country");
    }

    #[tokio::test]
    async fn test_item_failures_do_not_abort_batch() {
        let store = MemoryStore::new();
        seed_geography(&store).await;

        let report = run(
            &store,
            ImportKind::Cities,
            json!([
                {"slug": "porto", "country_slug": "portugal"},
                {"slug": "madrid", "country_slug": "spain"},
                {"slug": "bad slug", "country_slug": "portugal"},
                {"country_slug": "portugal"}
            ]),
        )
        .await;

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.processed(), 4);
        assert!(report.errors[0].starts_with("Item 2: "));
        assert!(report.errors[0].contains("spain"));
        assert!(report.errors[1].starts_with("Item 3: "));
        assert!(report.errors[2].contains("slug"));
    }

    #[tokio::test]
    async fn test_destination_tags_accept_list_or_string() {
        let store = MemoryStore::new();
        seed_geography(&store).await;

        let report = run(
            &store,
            ImportKind::Destinations,
            json!([
                {"slug": "belem-tower", "city_slug": "lisbon", "tags": ["historical", "unesco"], "category": "landmark"},
                {"slug": "alfama", "city_slug": "lisbon", "country_slug": "portugal", "tags": "neighborhood, views"}
            ]),
        )
        .await;
        assert_eq!(report.created, 2, "{:?}", report.errors);

        let scope = DestinationScope::default();
        let tower = store.find_destination("belem-tower", &scope).await.unwrap().unwrap();
        assert_eq!(tower.destination.entity.tags, "historical, unesco");
        assert_eq!(tower.destination.entity.seo.jsonld_type, "TouristAttraction");
        let alfama = store.find_destination("alfama", &scope).await.unwrap().unwrap();
        assert_eq!(alfama.destination.entity.tag_list(), vec!["neighborhood", "views"]);
    }

    // ==================== Translation Tests ====================

    #[tokio::test]
    async fn test_page_translations_create_page_and_patch() {
        let store = MemoryStore::new();

        let report = run(
            &store,
            ImportKind::Pages,
            json!([
                {"page_slug": "about-us", "locale": "en", "body": "Hello"},
                {"page_slug": "about-us", "locale": "fr", "title": "À propos"}
            ]),
        )
        .await;
        assert_eq!(report.created, 2, "{:?}", report.errors);

        let report = run(
            &store,
            ImportKind::Pages,
            json!([{"page_slug": "about-us", "locale": "en", "subtitle": "Who we are"}]),
        )
        .await;
        assert_eq!(report.updated, 1);

        let page = store.find_page("about-us").await.unwrap().unwrap();
        assert!(page.entity.is_published);
        let en = page.translation_for("en").unwrap();
        assert_eq!(en.title, "About Us");
        assert_eq!(en.body, "Hello");
        assert_eq!(en.subtitle, "Who we are");
        assert_eq!(page.translation_for("fr").unwrap().title, "À propos");
    }

    #[tokio::test]
    async fn test_translation_rejects_unsupported_locale_and_long_fields() {
        let store = MemoryStore::new();
        let report = run(
            &store,
            ImportKind::Pages,
            json!([
                {"page_slug": "about", "locale": "de"},
                {"page_slug": "about", "locale": "en", "meta_title": "x".repeat(61)}
            ]),
        )
        .await;

        assert_eq!(report.skipped, 2);
        assert!(report.errors[0].contains("Unsupported locale 'de'"));
        assert!(report.errors[1].contains("meta_title"));
    }

    #[tokio::test]
    async fn test_destination_translation_sections_replace() {
        let store = MemoryStore::new();
        seed_geography(&store).await;
        run(
            &store,
            ImportKind::Destinations,
            json!([{"slug": "belem-tower", "city_slug": "lisbon"}]),
        )
        .await;

        let item = |sections: Value| {
            json!([{
                "destination_slug": "belem-tower",
                "city_slug": "lisbon",
                "locale": "pt",
                "title": "Torre de Belém",
                "sections": sections
            }])
        };
        run(
            &store,
            ImportKind::DestinationTranslations,
            item(json!([
                {"section_type": "text", "order": 2, "body": "second"},
                {"section_type": "text", "order": 1, "body": "first"}
            ])),
        )
        .await;
        let report = run(
            &store,
            ImportKind::DestinationTranslations,
            item(json!([{"section_type": "cta", "cta_label": "Book", "cta_url": "/book"}])),
        )
        .await;
        assert_eq!(report.updated, 1, "{:?}", report.errors);

        let detail = store
            .find_destination("belem-tower", &DestinationScope::default())
            .await
            .unwrap()
            .unwrap();
        let pt = detail.destination.translation_for("pt").unwrap();
        assert_eq!(pt.title, "Torre de Belém");
        assert_eq!(pt.sections.len(), 1);
        assert_eq!(pt.sections[0].cta_label, "Book");
    }

    #[tokio::test]
    async fn test_blog_posts_with_inline_translation_and_fallback_category() {
        let store = MemoryStore::new();

        let report = run(&store, ImportKind::BlogPosts, json!([{"slug": "orphan"}])).await;
        assert_eq!(report.skipped, 1);

        run(&store, ImportKind::BlogCategories, json!([{"slug": "guides"}])).await;
        let report = run(
            &store,
            ImportKind::BlogPosts,
            json!([{"slug": "lisbon-in-3-days", "locale": "en", "body": "Day one"}]),
        )
        .await;
        assert_eq!(report.created, 1, "{:?}", report.errors);

        let post = store.find_blog_post("lisbon-in-3-days").await.unwrap().unwrap();
        assert_eq!(post.category.category.slug, "guides");
        assert_eq!(post.post.entity.seo.jsonld_type, "Article");
        let en = post.post.translation_for("en").unwrap();
        assert_eq!(en.title, "Lisbon In 3 Days");
        assert_eq!(en.body, "Day one");
    }

    #[tokio::test]
    async fn test_blog_post_translation_creates_post() {
        let store = MemoryStore::new();
        run(&store, ImportKind::BlogCategories, json!([{"slug": "guides"}])).await;

        let report = run(
            &store,
            ImportKind::BlogPostTranslations,
            json!([{"slug": "porto-wine", "locale": "fr", "title": "Vin de Porto"}]),
        )
        .await;
        assert_eq!(report.created, 1, "{:?}", report.errors);

        let post = store.find_blog_post("porto-wine").await.unwrap().unwrap();
        assert_eq!(post.post.available_locales(), vec!["fr"]);
    }

    // ==================== Site Chrome Tests ====================

    #[tokio::test]
    async fn test_navigation_footer_and_homepage_items() {
        let store = MemoryStore::new();

        let report = run(
            &store,
            ImportKind::NavigationItems,
            json!([
                {"locale": "en", "label": "About", "target_type": "page", "target_value": "about", "order": 1},
                {"locale": "en", "label": "Shop", "target_type": "external", "target_value": "https://shop.example.com"},
                {"locale": "en", "label": "Broken", "target_type": "video", "target_value": "x"}
            ]),
        )
        .await;
        assert_eq!((report.created, report.skipped), (2, 1));

        let report = run(
            &store,
            ImportKind::FooterBlocks,
            json!([{"locale": "en", "title": "Contact", "links": [{"label": "Email", "url": "mailto:a@b.c"}]}]),
        )
        .await;
        assert_eq!(report.created, 1, "{:?}", report.errors);

        let report = run(
            &store,
            ImportKind::HomepageCategories,
            json!([{"slug": "beaches", "locale": "fr", "title": "Plages", "order": 2}]),
        )
        .await;
        assert_eq!(report.created, 1, "{:?}", report.errors);

        assert_eq!(store.list_navigation("en").await.unwrap().len(), 2);
        assert_eq!(store.list_footer("en").await.unwrap()[0].links.len(), 1);
        assert_eq!(store.list_homepage_cards("fr").await.unwrap()[0].translation.title, "Plages");
    }

    // ==================== Bundle Tests ====================

    #[tokio::test]
    async fn test_bundle_imports_in_dependency_order() {
        let store = MemoryStore::new();
        let registry = LocaleRegistry::standard();
        let importer = Importer::new(&store, &registry, LIMIT);

        // Children listed first on purpose
        let bundle = json!({
            "cities": [{"slug": "lisbon", "country_slug": "portugal"}],
            "countries": [{"slug": "portugal"}],
            "unknown_section": []
        });
        let reports = importer
            .import_bundle(bundle.to_string().as_bytes())
            .await
            .unwrap();

        let kinds: Vec<ImportKind> = reports.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![ImportKind::Countries, ImportKind::Cities]);
        assert!(reports.iter().all(|(_, report)| report.errors.is_empty()));
    }
}
