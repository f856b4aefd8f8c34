//! Content Entity Store.
//!
//! [`ContentStore`] is the persistence seam: everything above it (link
//! resolution, presentation, import, HTTP handlers) is written against the
//! trait. Two implementations ship with the crate:
//!
//! - [`MemoryStore`]: process-local, used for development, seeding and tests
//! - [`PgStore`]: PostgreSQL via sqlx
//!
//! Reads return entities regardless of their publish flag unless the method
//! says otherwise; callers on the public API decide visibility. Listing
//! methods apply the publish cascade themselves.

mod memory;
mod model;
mod postgres;

pub use memory::MemoryStore;
pub use model::*;
pub use postgres::PgStore;

use std::future::Future;

use crate::content::{
    BlogCategory, ContentKind, FooterBlock, HomepageCard, NavigationItem, Page, Localized,
    TranslatableKind, TranslatableSummary,
};
use crate::error::CmsResult;
use crate::i18n::Locale;

/// Persistence operations for CMS content.
pub trait ContentStore: Send + Sync + Clone + 'static {
    // ---- detail lookups ----

    /// Page by slug, with all translations.
    fn find_page(
        &self,
        slug: &str,
    ) -> impl Future<Output = CmsResult<Option<Localized<Page>>>> + Send;

    /// Destination by slug, optionally narrowed to a country and city.
    ///
    /// Destination slugs are unique per city only; without a scope the
    /// lowest id wins.
    fn find_destination(
        &self,
        slug: &str,
        scope: &DestinationScope,
    ) -> impl Future<Output = CmsResult<Option<DestinationDetail>>> + Send;

    fn find_blog_post(
        &self,
        slug: &str,
    ) -> impl Future<Output = CmsResult<Option<BlogPostDetail>>> + Send;

    fn find_blog_category(
        &self,
        slug: &str,
    ) -> impl Future<Output = CmsResult<Option<BlogCategory>>> + Send;

    /// Identity and translated locales of a translatable entity, without
    /// loading its content. `scope` only applies to destinations.
    fn find_translatable(
        &self,
        kind: TranslatableKind,
        slug: &str,
        scope: &DestinationScope,
    ) -> impl Future<Output = CmsResult<Option<TranslatableSummary>>> + Send;

    // ---- public listings (publish cascade applied) ----

    /// Published countries ordered by `(order, name)`.
    fn list_countries(&self) -> impl Future<Output = CmsResult<Vec<CountrySummary>>> + Send;

    /// Published cities, optionally of one published country, ordered by `(order, name)`.
    fn list_cities(
        &self,
        country: Option<&str>,
    ) -> impl Future<Output = CmsResult<Vec<CitySummary>>> + Send;

    /// Published destinations whose city and country are published, ordered by slug.
    fn list_destinations(
        &self,
        scope: &DestinationScope,
    ) -> impl Future<Output = CmsResult<Vec<DestinationDetail>>> + Send;

    /// Published blog categories ordered by `(order, name)`.
    fn list_blog_categories(
        &self,
    ) -> impl Future<Output = CmsResult<Vec<BlogCategorySummary>>> + Send;

    /// Published posts in published categories, newest first.
    fn list_blog_posts(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = CmsResult<Vec<BlogPostDetail>>> + Send;

    /// Active navigation items of exactly `locale`, ordered by `(order, label)`.
    fn list_navigation(
        &self,
        locale: &str,
    ) -> impl Future<Output = CmsResult<Vec<NavigationItem>>> + Send;

    /// Footer blocks of exactly `locale`, ordered by `(order, title)`.
    fn list_footer(
        &self,
        locale: &str,
    ) -> impl Future<Output = CmsResult<Vec<FooterBlock>>> + Send;

    /// Published translations in `locale` of active homepage categories,
    /// ordered by category `(order, slug)`. No fallback.
    fn list_homepage_cards(
        &self,
        locale: &str,
    ) -> impl Future<Output = CmsResult<Vec<HomepageCard>>> + Send;

    // ---- admin reads ----

    /// Every page, destination and blog post with its translated locales.
    fn translation_inventory(
        &self,
    ) -> impl Future<Output = CmsResult<Vec<TranslatableSummary>>> + Send;

    fn content_stats(&self) -> impl Future<Output = CmsResult<ContentStats>> + Send;

    // ---- writes ----

    fn upsert_country(
        &self,
        input: &CountryInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Fails with `NotFound` when the parent country does not exist.
    fn upsert_city(&self, input: &CityInput) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Fails with `NotFound` when the parent city does not exist.
    fn upsert_destination(
        &self,
        input: &DestinationInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Create the page if missing; an existing page is left untouched.
    fn ensure_page(
        &self,
        input: &PageInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    fn upsert_blog_category(
        &self,
        input: &BlogCategoryInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Create or overwrite a blog post.
    fn upsert_blog_post(
        &self,
        input: &BlogPostInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Create the blog post if missing; an existing post is left untouched.
    fn ensure_blog_post(
        &self,
        input: &BlogPostInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Create or patch the translation of one entity in one locale.
    ///
    /// Absent patch fields keep their stored value; a new translation takes
    /// `default_title` when the patch has no title. Sections and hero slides,
    /// when given, replace the existing ones.
    fn upsert_translation(
        &self,
        kind: TranslatableKind,
        owner_id: i64,
        locale: Locale,
        patch: &TranslationPatch,
        default_title: &str,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Create or overwrite a homepage category and optionally one translation.
    fn upsert_homepage_category(
        &self,
        input: &HomepageCategoryInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Keyed by `(locale, label)`.
    fn upsert_navigation_item(
        &self,
        input: &NavigationItemInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Keyed by `(locale, title)`; links are replaced.
    fn upsert_footer_block(
        &self,
        input: &FooterBlockInput,
    ) -> impl Future<Output = CmsResult<Upserted>> + Send;

    /// Delete an entity and everything it owns. Returns false if nothing matched.
    fn delete(
        &self,
        kind: ContentKind,
        slug: &str,
    ) -> impl Future<Output = CmsResult<bool>> + Send;
}
