//! PostgreSQL content store.
//!
//! Translations are polymorphic: one table keyed by
//! `(content_kind, content_id, locale)` serves pages, destinations and blog
//! posts. Every other ownership edge is a foreign key with `ON DELETE CASCADE`.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};
use std::collections::HashMap;
use tracing::info;

use super::*;
use crate::content::{
    BlogPost, City, Country, Destination, FooterLink, HeroSlide, HomepageCategory,
    HomepageCategoryTranslation, NavTarget, Section, SeoFields, Translation,
};
use crate::error::CmsError;

/// Schema statements, executed one by one on startup.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS pages (
        id BIGSERIAL PRIMARY KEY,
        slug VARCHAR(255) NOT NULL UNIQUE,
        page_type VARCHAR(50) NOT NULL DEFAULT 'custom',
        is_published BOOLEAN NOT NULL DEFAULT TRUE,
        hero_image TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS countries (
        id BIGSERIAL PRIMARY KEY,
        slug VARCHAR(255) NOT NULL UNIQUE,
        name VARCHAR(200) NOT NULL,
        short_description VARCHAR(200) NOT NULL DEFAULT '',
        hero_image TEXT,
        meta_title VARCHAR(60) NOT NULL DEFAULT '',
        meta_description VARCHAR(320) NOT NULL DEFAULT '',
        og_title VARCHAR(60),
        og_description VARCHAR(200),
        og_image TEXT,
        canonical_url TEXT,
        seo_enabled BOOLEAN NOT NULL DEFAULT TRUE,
        jsonld_type VARCHAR(100) NOT NULL DEFAULT '',
        jsonld_override TEXT NOT NULL DEFAULT '',
        is_published BOOLEAN NOT NULL DEFAULT TRUE,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS cities (
        id BIGSERIAL PRIMARY KEY,
        country_id BIGINT NOT NULL REFERENCES countries(id) ON DELETE CASCADE,
        slug VARCHAR(255) NOT NULL,
        name VARCHAR(200) NOT NULL,
        short_description VARCHAR(200) NOT NULL DEFAULT '',
        hero_image TEXT,
        meta_title VARCHAR(60) NOT NULL DEFAULT '',
        meta_description VARCHAR(320) NOT NULL DEFAULT '',
        og_title VARCHAR(60),
        og_description VARCHAR(200),
        og_image TEXT,
        canonical_url TEXT,
        seo_enabled BOOLEAN NOT NULL DEFAULT TRUE,
        jsonld_type VARCHAR(100) NOT NULL DEFAULT '',
        jsonld_override TEXT NOT NULL DEFAULT '',
        is_published BOOLEAN NOT NULL DEFAULT TRUE,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT uk_city_country_slug UNIQUE (country_id, slug)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS destinations (
        id BIGSERIAL PRIMARY KEY,
        city_id BIGINT NOT NULL REFERENCES cities(id) ON DELETE CASCADE,
        slug VARCHAR(255) NOT NULL,
        category VARCHAR(50) NOT NULL DEFAULT 'other',
        tags TEXT NOT NULL DEFAULT '',
        meta_title VARCHAR(60) NOT NULL DEFAULT '',
        meta_description VARCHAR(320) NOT NULL DEFAULT '',
        og_title VARCHAR(60),
        og_description VARCHAR(200),
        og_image TEXT,
        canonical_url TEXT,
        seo_enabled BOOLEAN NOT NULL DEFAULT TRUE,
        jsonld_type VARCHAR(100) NOT NULL DEFAULT '',
        jsonld_override TEXT NOT NULL DEFAULT '',
        is_featured BOOLEAN NOT NULL DEFAULT FALSE,
        is_published BOOLEAN NOT NULL DEFAULT TRUE,
        hero_image TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT uk_destination_city_slug UNIQUE (city_id, slug)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS blog_categories (
        id BIGSERIAL PRIMARY KEY,
        slug VARCHAR(255) NOT NULL UNIQUE,
        name VARCHAR(200) NOT NULL,
        is_published BOOLEAN NOT NULL DEFAULT TRUE,
        sort_order INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS blog_posts (
        id BIGSERIAL PRIMARY KEY,
        category_id BIGINT NOT NULL REFERENCES blog_categories(id) ON DELETE CASCADE,
        slug VARCHAR(255) NOT NULL UNIQUE,
        hero_image TEXT,
        meta_title VARCHAR(60) NOT NULL DEFAULT '',
        meta_description VARCHAR(320) NOT NULL DEFAULT '',
        og_title VARCHAR(60),
        og_description VARCHAR(200),
        og_image TEXT,
        canonical_url TEXT,
        seo_enabled BOOLEAN NOT NULL DEFAULT TRUE,
        jsonld_type VARCHAR(100) NOT NULL DEFAULT '',
        jsonld_override TEXT NOT NULL DEFAULT '',
        is_published BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS translations (
        id BIGSERIAL PRIMARY KEY,
        content_kind VARCHAR(20) NOT NULL,
        content_id BIGINT NOT NULL,
        locale TEXT NOT NULL,
        title VARCHAR(255) NOT NULL,
        subtitle VARCHAR(500) NOT NULL DEFAULT '',
        short_description VARCHAR(200) NOT NULL DEFAULT '',
        body TEXT NOT NULL DEFAULT '',
        hero_image TEXT,
        meta_title VARCHAR(60) NOT NULL DEFAULT '',
        meta_description VARCHAR(320) NOT NULL DEFAULT '',
        og_title VARCHAR(60),
        og_description VARCHAR(200),
        og_image TEXT,
        canonical_url TEXT,
        seo_enabled BOOLEAN NOT NULL DEFAULT TRUE,
        jsonld_type VARCHAR(100) NOT NULL DEFAULT '',
        jsonld_override TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT uk_translation_owner_locale UNIQUE (content_kind, content_id, locale)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS sections (
        id BIGSERIAL PRIMARY KEY,
        translation_id BIGINT NOT NULL REFERENCES translations(id) ON DELETE CASCADE,
        section_type VARCHAR(20) NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0,
        title VARCHAR(255) NOT NULL DEFAULT '',
        body TEXT NOT NULL DEFAULT '',
        image TEXT,
        cta_label VARCHAR(255) NOT NULL DEFAULT '',
        cta_url VARCHAR(500) NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS hero_slides (
        id BIGSERIAL PRIMARY KEY,
        translation_id BIGINT NOT NULL REFERENCES translations(id) ON DELETE CASCADE,
        image TEXT NOT NULL,
        caption VARCHAR(255) NOT NULL DEFAULT '',
        sort_order INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS homepage_categories (
        id BIGSERIAL PRIMARY KEY,
        slug VARCHAR(255) NOT NULL UNIQUE,
        sort_order INTEGER NOT NULL DEFAULT 0,
        meta_title VARCHAR(60) NOT NULL DEFAULT '',
        meta_description VARCHAR(320) NOT NULL DEFAULT '',
        og_title VARCHAR(60),
        og_description VARCHAR(200),
        og_image TEXT,
        canonical_url TEXT,
        seo_enabled BOOLEAN NOT NULL DEFAULT TRUE,
        jsonld_type VARCHAR(100) NOT NULL DEFAULT '',
        jsonld_override TEXT NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS homepage_category_translations (
        id BIGSERIAL PRIMARY KEY,
        category_id BIGINT NOT NULL REFERENCES homepage_categories(id) ON DELETE CASCADE,
        locale TEXT NOT NULL,
        title VARCHAR(200) NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        image TEXT,
        is_published BOOLEAN NOT NULL DEFAULT TRUE,
        CONSTRAINT uk_homepage_category_locale UNIQUE (category_id, locale)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS navigation_items (
        id BIGSERIAL PRIMARY KEY,
        locale TEXT NOT NULL,
        label VARCHAR(100) NOT NULL,
        target_type VARCHAR(20) NOT NULL,
        target_value TEXT NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        CONSTRAINT uk_navigation_locale_label UNIQUE (locale, label)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS footer_blocks (
        id BIGSERIAL PRIMARY KEY,
        locale TEXT NOT NULL,
        title VARCHAR(100) NOT NULL,
        body TEXT NOT NULL DEFAULT '',
        sort_order INTEGER NOT NULL DEFAULT 0,
        CONSTRAINT uk_footer_locale_title UNIQUE (locale, title)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS footer_links (
        id BIGSERIAL PRIMARY KEY,
        block_id BIGINT NOT NULL REFERENCES footer_blocks(id) ON DELETE CASCADE,
        label VARCHAR(100) NOT NULL,
        url VARCHAR(500) NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_translations_owner ON translations(content_kind, content_id)",
    "CREATE INDEX IF NOT EXISTS idx_sections_translation ON sections(translation_id)",
    "CREATE INDEX IF NOT EXISTS idx_hero_slides_translation ON hero_slides(translation_id)",
    "CREATE INDEX IF NOT EXISTS idx_destinations_slug ON destinations(slug)",
    "CREATE INDEX IF NOT EXISTS idx_cities_slug ON cities(slug)",
];

/// SEO column list shared by every table that embeds [`SeoFields`].
/// Must remain a const literal since it is spliced into queries with format!().
const SEO_COLUMNS: &str = "meta_title, meta_description, og_title, og_description, og_image, canonical_url, seo_enabled, jsonld_type, jsonld_override";

const PAGE_COLUMNS: &str =
    "id, slug, page_type, is_published, hero_image, created_at, updated_at";

const CITY_COLUMNS: &str = "ci.id, ci.country_id, ci.slug, ci.name, ci.short_description, ci.hero_image, ci.meta_title, ci.meta_description, ci.og_title, ci.og_description, ci.og_image, ci.canonical_url, ci.seo_enabled, ci.jsonld_type, ci.jsonld_override, ci.is_published, ci.sort_order, ci.created_at, ci.updated_at";

const DESTINATION_COLUMNS: &str = "d.id, d.city_id, d.slug, d.category, d.tags, d.meta_title, d.meta_description, d.og_title, d.og_description, d.og_image, d.canonical_url, d.seo_enabled, d.jsonld_type, d.jsonld_override, d.is_featured, d.is_published, d.hero_image, d.created_at, d.updated_at";

const BLOG_POST_COLUMNS: &str = "p.id, p.category_id, p.slug, p.hero_image, p.meta_title, p.meta_description, p.og_title, p.og_description, p.og_image, p.canonical_url, p.seo_enabled, p.jsonld_type, p.jsonld_override, p.is_published, p.created_at, p.updated_at";

const TRANSLATION_COLUMNS: &str = "id, content_id, locale, title, subtitle, short_description, body, hero_image, meta_title, meta_description, og_title, og_description, og_image, canonical_url, seo_enabled, jsonld_type, jsonld_override, created_at, updated_at";

const COUNTRY_SUMMARY_SELECT: &str = r#"
    SELECT c.id, c.slug, c.name, c.short_description, c.hero_image,
        c.meta_title, c.meta_description, c.og_title, c.og_description, c.og_image,
        c.canonical_url, c.seo_enabled, c.jsonld_type, c.jsonld_override,
        c.is_published, c.sort_order, c.created_at, c.updated_at,
        (SELECT COUNT(*) FROM cities ci
            WHERE ci.country_id = c.id AND ci.is_published) AS cities_count,
        (SELECT COUNT(*) FROM destinations d
            JOIN cities ci ON ci.id = d.city_id
            WHERE ci.country_id = c.id AND ci.is_published AND d.is_published) AS destinations_count,
        (SELECT COUNT(*) FROM translations t
            JOIN destinations d ON t.content_kind = 'destination' AND t.content_id = d.id
            JOIN cities ci ON ci.id = d.city_id
            WHERE ci.country_id = c.id AND ci.is_published AND d.is_published) AS stories_count
    FROM countries c
"#;

const BLOG_CATEGORY_SUMMARY_SELECT: &str = r#"
    SELECT c.id, c.slug, c.name, c.is_published, c.sort_order, c.created_at, c.updated_at,
        (SELECT COUNT(*) FROM blog_posts p
            WHERE p.category_id = c.id AND p.is_published) AS posts_count
    FROM blog_categories c
"#;

/// Hierarchy join used by every destination query; `$1` is the country
/// slug filter and `$2` the city slug filter, both nullable.
const DESTINATION_SCOPE_JOIN: &str = r#"
    FROM destinations d
    JOIN cities ci ON ci.id = d.city_id
    JOIN countries co ON co.id = ci.country_id
    WHERE ($1::text IS NULL OR co.slug = $1)
      AND ($2::text IS NULL OR ci.slug = $2)
"#;

const CONTENT_STATS_QUERY: &str = r#"
    SELECT
        (SELECT COUNT(*) FROM pages) AS pages_total,
        (SELECT COUNT(*) FROM pages WHERE is_published) AS pages_published,
        (SELECT COUNT(*) FROM translations WHERE content_kind = 'page') AS page_translations,
        (SELECT COUNT(*) FROM sections s JOIN translations t ON t.id = s.translation_id
            WHERE t.content_kind = 'page') AS page_sections,
        (SELECT COUNT(*) FROM countries) AS countries,
        (SELECT COUNT(*) FROM countries WHERE is_published) AS countries_published,
        (SELECT COUNT(*) FROM cities) AS cities,
        (SELECT COUNT(*) FROM cities WHERE is_published) AS cities_published,
        (SELECT COUNT(*) FROM destinations) AS destinations,
        (SELECT COUNT(*) FROM destinations WHERE is_published) AS destinations_published,
        (SELECT COUNT(*) FROM translations WHERE content_kind = 'destination') AS destination_translations,
        (SELECT COUNT(*) FROM sections s JOIN translations t ON t.id = s.translation_id
            WHERE t.content_kind = 'destination') AS destination_sections,
        (SELECT COUNT(*) FROM blog_categories) AS categories,
        (SELECT COUNT(*) FROM blog_categories WHERE is_published) AS categories_published,
        (SELECT COUNT(*) FROM blog_posts) AS posts,
        (SELECT COUNT(*) FROM blog_posts WHERE is_published) AS posts_published,
        (SELECT COUNT(*) FROM translations WHERE content_kind = 'blog_post') AS post_translations,
        (SELECT COUNT(*) FROM sections s JOIN translations t ON t.id = s.translation_id
            WHERE t.content_kind = 'blog_post') AS post_sections,
        (SELECT COUNT(*) FROM navigation_items) AS menu_items,
        (SELECT COUNT(*) FROM navigation_items WHERE is_active) AS active_items,
        (SELECT COUNT(*) FROM footer_blocks) AS footer_blocks,
        (SELECT COUNT(*) FROM footer_links) AS footer_links
"#;

/// Content store backed by PostgreSQL.
///
/// # Examples
///
/// ```no_run
/// use travel_cms::store::PgStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = PgStore::connect("postgresql://localhost/travel_cms", 5).await?;
/// store.migrate().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> CmsResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Create missing tables and indexes.
    pub async fn migrate(&self) -> CmsResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema is up to date ({} statements)", SCHEMA.len());
        Ok(())
    }

    // ==================== Loading helpers ====================

    async fn load_translations(
        &self,
        kind: TranslatableKind,
        owner_ids: &[i64],
    ) -> CmsResult<HashMap<i64, Vec<Translation>>> {
        if owner_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE content_kind = $1 AND content_id = ANY($2)"
        );
        let rows: Vec<TranslationRow> = sqlx::query_as(&query)
            .bind(kind.as_str())
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await?;

        let translation_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let (mut sections, mut slides) = futures::try_join!(
            self.load_sections(&translation_ids),
            self.load_slides(&translation_ids)
        )?;

        let mut by_owner: HashMap<i64, Vec<Translation>> = HashMap::new();
        for row in rows {
            let owner_id = row.content_id;
            let id = row.id;
            let mut translation = Translation::from(row);
            translation.sections = sections.remove(&id).unwrap_or_default();
            translation.hero_slides = slides.remove(&id).unwrap_or_default();
            by_owner.entry(owner_id).or_default().push(translation);
        }
        Ok(by_owner)
    }

    async fn load_sections(&self, translation_ids: &[i64]) -> CmsResult<HashMap<i64, Vec<Section>>> {
        if translation_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<SectionRow> = sqlx::query_as(
            r#"
            SELECT id, translation_id, section_type, sort_order, title, body, image, cta_label, cta_url
            FROM sections
            WHERE translation_id = ANY($1)
            ORDER BY sort_order, id
            "#,
        )
        .bind(translation_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Section>> = HashMap::new();
        for row in rows {
            let translation_id = row.translation_id;
            grouped
                .entry(translation_id)
                .or_default()
                .push(Section::try_from(row)?);
        }
        Ok(grouped)
    }

    async fn load_slides(&self, translation_ids: &[i64]) -> CmsResult<HashMap<i64, Vec<HeroSlide>>> {
        if translation_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<HeroSlideRow> = sqlx::query_as(
            r#"
            SELECT id, translation_id, image, caption, sort_order
            FROM hero_slides
            WHERE translation_id = ANY($1)
            ORDER BY sort_order, id
            "#,
        )
        .bind(translation_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<HeroSlide>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.translation_id)
                .or_default()
                .push(HeroSlide::from(row));
        }
        Ok(grouped)
    }

    async fn country_summaries(&self, ids: &[i64]) -> CmsResult<HashMap<i64, CountrySummary>> {
        let query = format!("{COUNTRY_SUMMARY_SELECT} WHERE c.id = ANY($1)");
        let rows: Vec<CountrySummaryRow> = sqlx::query_as(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.country.id, CountrySummary::from(row)))
            .collect())
    }

    async fn city_summaries(&self, rows: Vec<CityRow>) -> CmsResult<Vec<CitySummary>> {
        let city_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let country_ids: Vec<i64> = rows.iter().map(|row| row.country_id).collect();
        let countries = self.country_summaries(&country_ids).await?;

        let counts: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT city_id, COUNT(*)
            FROM destinations
            WHERE city_id = ANY($1) AND is_published
            GROUP BY city_id
            "#,
        )
        .bind(&city_ids)
        .fetch_all(&self.pool)
        .await?;
        let counts: HashMap<i64, i64> = counts.into_iter().collect();

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let country = countries.get(&row.country_id)?.clone();
                let destinations_count = counts.get(&row.id).copied().unwrap_or(0);
                Some(CitySummary {
                    city: City::from(row),
                    country,
                    destinations_count,
                })
            })
            .collect())
    }

    async fn destination_details(
        &self,
        rows: Vec<DestinationRow>,
    ) -> CmsResult<Vec<DestinationDetail>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let city_ids: Vec<i64> = rows.iter().map(|row| row.city_id).collect();

        let query = format!("SELECT {CITY_COLUMNS} FROM cities ci WHERE ci.id = ANY($1)");
        let city_rows: Vec<CityRow> = sqlx::query_as(&query)
            .bind(&city_ids)
            .fetch_all(&self.pool)
            .await?;
        let cities: HashMap<i64, CitySummary> = self
            .city_summaries(city_rows)
            .await?
            .into_iter()
            .map(|summary| (summary.city.id, summary))
            .collect();

        let mut translations = self
            .load_translations(TranslatableKind::Destination, &ids)
            .await?;

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(city) = cities.get(&row.city_id).cloned() else {
                continue;
            };
            let destination = Destination::try_from(row)?;
            let owned = translations.remove(&destination.id).unwrap_or_default();
            details.push(DestinationDetail {
                destination: Localized::new(destination, owned),
                city,
            });
        }
        Ok(details)
    }

    async fn category_summaries(&self, ids: &[i64]) -> CmsResult<HashMap<i64, BlogCategorySummary>> {
        let query = format!("{BLOG_CATEGORY_SUMMARY_SELECT} WHERE c.id = ANY($1)");
        let rows: Vec<BlogCategorySummaryRow> = sqlx::query_as(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.category.id, BlogCategorySummary::from(row)))
            .collect())
    }

    async fn post_details(&self, rows: Vec<BlogPostRow>) -> CmsResult<Vec<BlogPostDetail>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let category_ids: Vec<i64> = rows.iter().map(|row| row.category_id).collect();
        let categories = self.category_summaries(&category_ids).await?;
        let mut translations = self.load_translations(TranslatableKind::BlogPost, &ids).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let category = categories.get(&row.category_id)?.clone();
                let post = BlogPost::from(row);
                let owned = translations.remove(&post.id).unwrap_or_default();
                Some(BlogPostDetail {
                    post: Localized::new(post, owned),
                    category,
                })
            })
            .collect())
    }

    async fn destination_id(&self, slug: &str, scope: &DestinationScope) -> CmsResult<Option<i64>> {
        let query = format!("SELECT d.id {DESTINATION_SCOPE_JOIN} AND d.slug = $3 ORDER BY d.id LIMIT 1");
        let id: Option<(i64,)> = sqlx::query_as(&query)
            .bind(scope.country.as_deref())
            .bind(scope.city.as_deref())
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id.map(|(id,)| id))
    }

    async fn summary(
        &self,
        kind: TranslatableKind,
        filter: SummaryFilter<'_>,
    ) -> CmsResult<Vec<TranslatableSummary>> {
        let table = owner_table(kind);
        let base = format!(
            "SELECT e.id, e.slug, e.is_published, e.updated_at, \
             ARRAY(SELECT t.locale FROM translations t \
                   WHERE t.content_kind = $1 AND t.content_id = e.id ORDER BY t.locale) AS locales \
             FROM {table} e"
        );

        let rows: Vec<SummaryRow> = match filter {
            SummaryFilter::All => {
                sqlx::query_as(&base)
                    .bind(kind.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            SummaryFilter::Slug(slug) => {
                let query = format!("{base} WHERE e.slug = $2 ORDER BY e.id LIMIT 1");
                sqlx::query_as(&query)
                    .bind(kind.as_str())
                    .bind(slug)
                    .fetch_all(&self.pool)
                    .await?
            }
            SummaryFilter::Id(id) => {
                let query = format!("{base} WHERE e.id = $2");
                sqlx::query_as(&query)
                    .bind(kind.as_str())
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows
            .into_iter()
            .map(|row| TranslatableSummary {
                kind,
                id: row.id,
                slug: row.slug,
                is_published: row.is_published,
                locales: row.locales,
                updated_at: row.updated_at,
            })
            .collect())
    }

    async fn resolve_category_id(&self, slug: Option<&str>) -> CmsResult<i64> {
        match slug {
            Some(slug) => {
                let row: Option<(i64,)> =
                    sqlx::query_as("SELECT id FROM blog_categories WHERE slug = $1")
                        .bind(slug)
                        .fetch_optional(&self.pool)
                        .await?;
                row.map(|(id,)| id)
                    .ok_or_else(|| CmsError::not_found(format!("Blog category '{slug}'")))
            }
            None => {
                let row: Option<(i64,)> =
                    sqlx::query_as("SELECT id FROM blog_categories ORDER BY id LIMIT 1")
                        .fetch_optional(&self.pool)
                        .await?;
                row.map(|(id,)| id).ok_or_else(|| {
                    CmsError::validation(
                        "No blog categories available. Create at least one blog category first.",
                    )
                })
            }
        }
    }
}

enum SummaryFilter<'a> {
    All,
    Slug(&'a str),
    Id(i64),
}

fn owner_table(kind: TranslatableKind) -> &'static str {
    match kind {
        TranslatableKind::Page => "pages",
        TranslatableKind::Destination => "destinations",
        TranslatableKind::BlogPost => "blog_posts",
    }
}

/// Bind the nine SEO columns, in [`SEO_COLUMNS`] order.
fn bind_seo<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    seo: &'q SeoFields,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    query
        .bind(seo.meta_title.as_str())
        .bind(seo.meta_description.as_str())
        .bind(seo.og_title.as_deref())
        .bind(seo.og_description.as_deref())
        .bind(seo.og_image.as_deref())
        .bind(seo.canonical_url.as_deref())
        .bind(seo.seo_enabled)
        .bind(seo.jsonld_type.as_str())
        .bind(seo.jsonld_override.as_str())
}

impl ContentStore for PgStore {
    async fn find_page(&self, slug: &str) -> CmsResult<Option<Localized<Page>>> {
        let query = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE slug = $1");
        let row: Option<PageRow> = sqlx::query_as(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let page = Page::try_from(row)?;
        let mut translations = self.load_translations(TranslatableKind::Page, &[page.id]).await?;
        let owned = translations.remove(&page.id).unwrap_or_default();
        Ok(Some(Localized::new(page, owned)))
    }

    async fn find_destination(
        &self,
        slug: &str,
        scope: &DestinationScope,
    ) -> CmsResult<Option<DestinationDetail>> {
        let query = format!(
            "SELECT {DESTINATION_COLUMNS} {DESTINATION_SCOPE_JOIN} AND d.slug = $3 ORDER BY d.id LIMIT 1"
        );
        let rows: Vec<DestinationRow> = sqlx::query_as(&query)
            .bind(scope.country.as_deref())
            .bind(scope.city.as_deref())
            .bind(slug)
            .fetch_all(&self.pool)
            .await?;
        Ok(self.destination_details(rows).await?.into_iter().next())
    }

    async fn find_blog_post(&self, slug: &str) -> CmsResult<Option<BlogPostDetail>> {
        let query = format!("SELECT {BLOG_POST_COLUMNS} FROM blog_posts p WHERE p.slug = $1");
        let rows: Vec<BlogPostRow> = sqlx::query_as(&query)
            .bind(slug)
            .fetch_all(&self.pool)
            .await?;
        Ok(self.post_details(rows).await?.into_iter().next())
    }

    async fn find_blog_category(&self, slug: &str) -> CmsResult<Option<BlogCategory>> {
        let row: Option<BlogCategoryRow> = sqlx::query_as(
            r#"
            SELECT id, slug, name, is_published, sort_order, created_at, updated_at
            FROM blog_categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BlogCategory::from))
    }

    async fn find_translatable(
        &self,
        kind: TranslatableKind,
        slug: &str,
        scope: &DestinationScope,
    ) -> CmsResult<Option<TranslatableSummary>> {
        let summaries = match kind {
            TranslatableKind::Destination => match self.destination_id(slug, scope).await? {
                Some(id) => self.summary(kind, SummaryFilter::Id(id)).await?,
                None => Vec::new(),
            },
            _ => self.summary(kind, SummaryFilter::Slug(slug)).await?,
        };
        Ok(summaries.into_iter().next())
    }

    async fn list_countries(&self) -> CmsResult<Vec<CountrySummary>> {
        let query = format!("{COUNTRY_SUMMARY_SELECT} WHERE c.is_published ORDER BY c.sort_order, c.name");
        let rows: Vec<CountrySummaryRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(CountrySummary::from).collect())
    }

    async fn list_cities(&self, country: Option<&str>) -> CmsResult<Vec<CitySummary>> {
        let query = format!(
            r#"
            SELECT {CITY_COLUMNS}
            FROM cities ci
            JOIN countries co ON co.id = ci.country_id
            WHERE ci.is_published AND co.is_published
              AND ($1::text IS NULL OR co.slug = $1)
            ORDER BY ci.sort_order, ci.name
            "#
        );
        let rows: Vec<CityRow> = sqlx::query_as(&query)
            .bind(country)
            .fetch_all(&self.pool)
            .await?;
        self.city_summaries(rows).await
    }

    async fn list_destinations(
        &self,
        scope: &DestinationScope,
    ) -> CmsResult<Vec<DestinationDetail>> {
        let query = format!(
            "SELECT {DESTINATION_COLUMNS} {DESTINATION_SCOPE_JOIN} \
             AND d.is_published AND ci.is_published AND co.is_published \
             ORDER BY d.slug, d.id"
        );
        let rows: Vec<DestinationRow> = sqlx::query_as(&query)
            .bind(scope.country.as_deref())
            .bind(scope.city.as_deref())
            .fetch_all(&self.pool)
            .await?;
        self.destination_details(rows).await
    }

    async fn list_blog_categories(&self) -> CmsResult<Vec<BlogCategorySummary>> {
        let query = format!("{BLOG_CATEGORY_SUMMARY_SELECT} WHERE c.is_published ORDER BY c.sort_order, c.name");
        let rows: Vec<BlogCategorySummaryRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(BlogCategorySummary::from).collect())
    }

    async fn list_blog_posts(&self, category: Option<&str>) -> CmsResult<Vec<BlogPostDetail>> {
        let query = format!(
            r#"
            SELECT {BLOG_POST_COLUMNS}
            FROM blog_posts p
            JOIN blog_categories c ON c.id = p.category_id
            WHERE p.is_published AND c.is_published
              AND ($1::text IS NULL OR c.slug = $1)
            ORDER BY p.created_at DESC, p.id DESC
            "#
        );
        let rows: Vec<BlogPostRow> = sqlx::query_as(&query)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        self.post_details(rows).await
    }

    async fn list_navigation(&self, locale: &str) -> CmsResult<Vec<NavigationItem>> {
        let rows: Vec<NavigationRow> = sqlx::query_as(
            r#"
            SELECT id, locale, label, target_type, target_value, sort_order, is_active
            FROM navigation_items
            WHERE locale = $1 AND is_active
            ORDER BY sort_order, label
            "#,
        )
        .bind(locale)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(NavigationItem::try_from).collect()
    }

    async fn list_footer(&self, locale: &str) -> CmsResult<Vec<FooterBlock>> {
        let blocks: Vec<FooterBlockRow> = sqlx::query_as(
            r#"
            SELECT id, locale, title, body, sort_order
            FROM footer_blocks
            WHERE locale = $1
            ORDER BY sort_order, title
            "#,
        )
        .bind(locale)
        .fetch_all(&self.pool)
        .await?;

        let block_ids: Vec<i64> = blocks.iter().map(|block| block.id).collect();
        let links: Vec<FooterLinkRow> = sqlx::query_as(
            r#"
            SELECT id, block_id, label, url, sort_order
            FROM footer_links
            WHERE block_id = ANY($1)
            ORDER BY sort_order, label
            "#,
        )
        .bind(&block_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut links_by_block: HashMap<i64, Vec<FooterLink>> = HashMap::new();
        for link in links {
            links_by_block
                .entry(link.block_id)
                .or_default()
                .push(FooterLink::from(link));
        }

        Ok(blocks
            .into_iter()
            .map(|row| FooterBlock {
                links: links_by_block.remove(&row.id).unwrap_or_default(),
                id: row.id,
                locale: row.locale,
                title: row.title,
                body: row.body,
                order: row.sort_order,
            })
            .collect())
    }

    async fn list_homepage_cards(&self, locale: &str) -> CmsResult<Vec<HomepageCard>> {
        let rows: Vec<HomepageCardRow> = sqlx::query_as(
            r#"
            SELECT c.id, c.slug, c.sort_order,
                c.meta_title, c.meta_description, c.og_title, c.og_description, c.og_image,
                c.canonical_url, c.seo_enabled, c.jsonld_type, c.jsonld_override,
                c.is_active, c.created_at, c.updated_at,
                t.id AS translation_id, t.locale, t.title, t.description, t.image, t.is_published
            FROM homepage_category_translations t
            JOIN homepage_categories c ON c.id = t.category_id
            WHERE t.locale = $1 AND t.is_published AND c.is_active
            ORDER BY c.sort_order, c.slug
            "#,
        )
        .bind(locale)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(HomepageCard::from).collect())
    }

    async fn translation_inventory(&self) -> CmsResult<Vec<TranslatableSummary>> {
        let mut inventory = Vec::new();
        for kind in TranslatableKind::ALL {
            inventory.extend(self.summary(kind, SummaryFilter::All).await?);
        }
        Ok(inventory)
    }

    async fn content_stats(&self) -> CmsResult<ContentStats> {
        let row: StatsRow = sqlx::query_as(CONTENT_STATS_QUERY)
            .fetch_one(&self.pool)
            .await?;
        Ok(ContentStats::from(row))
    }

    async fn upsert_country(&self, input: &CountryInput) -> CmsResult<Upserted> {
        let query = format!(
            r#"
            INSERT INTO countries (slug, name, short_description, hero_image, {SEO_COLUMNS}, is_published, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (slug) DO UPDATE SET
                name = EXCLUDED.name,
                short_description = EXCLUDED.short_description,
                hero_image = EXCLUDED.hero_image,
                meta_title = EXCLUDED.meta_title,
                meta_description = EXCLUDED.meta_description,
                og_title = EXCLUDED.og_title,
                og_description = EXCLUDED.og_description,
                og_image = EXCLUDED.og_image,
                canonical_url = EXCLUDED.canonical_url,
                seo_enabled = EXCLUDED.seo_enabled,
                jsonld_type = EXCLUDED.jsonld_type,
                jsonld_override = EXCLUDED.jsonld_override,
                is_published = EXCLUDED.is_published,
                sort_order = EXCLUDED.sort_order,
                updated_at = NOW()
            RETURNING id, (xmax = 0) AS created
            "#
        );
        let query = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.short_description)
            .bind(input.hero_image.as_deref());
        let row = bind_seo(query, &input.seo)
            .bind(input.is_published)
            .bind(input.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn upsert_city(&self, input: &CityInput) -> CmsResult<Upserted> {
        let country: Option<(i64,)> = sqlx::query_as("SELECT id FROM countries WHERE slug = $1")
            .bind(&input.country_slug)
            .fetch_optional(&self.pool)
            .await?;
        let (country_id,) = country
            .ok_or_else(|| CmsError::not_found(format!("Country '{}'", input.country_slug)))?;

        let query = format!(
            r#"
            INSERT INTO cities (country_id, slug, name, short_description, hero_image, {SEO_COLUMNS}, is_published, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (country_id, slug) DO UPDATE SET
                name = EXCLUDED.name,
                short_description = EXCLUDED.short_description,
                hero_image = EXCLUDED.hero_image,
                meta_title = EXCLUDED.meta_title,
                meta_description = EXCLUDED.meta_description,
                og_title = EXCLUDED.og_title,
                og_description = EXCLUDED.og_description,
                og_image = EXCLUDED.og_image,
                canonical_url = EXCLUDED.canonical_url,
                seo_enabled = EXCLUDED.seo_enabled,
                jsonld_type = EXCLUDED.jsonld_type,
                jsonld_override = EXCLUDED.jsonld_override,
                is_published = EXCLUDED.is_published,
                sort_order = EXCLUDED.sort_order,
                updated_at = NOW()
            RETURNING id, (xmax = 0) AS created
            "#
        );
        let query = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(country_id)
            .bind(&input.slug)
            .bind(&input.name)
            .bind(&input.short_description)
            .bind(input.hero_image.as_deref());
        let row = bind_seo(query, &input.seo)
            .bind(input.is_published)
            .bind(input.order)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn upsert_destination(&self, input: &DestinationInput) -> CmsResult<Upserted> {
        let city: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT ci.id
            FROM cities ci
            JOIN countries co ON co.id = ci.country_id
            WHERE ci.slug = $1 AND ($2::text IS NULL OR co.slug = $2)
            ORDER BY ci.id
            LIMIT 1
            "#,
        )
        .bind(&input.city_slug)
        .bind(input.country_slug.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        let (city_id,) = city.ok_or_else(|| match &input.country_slug {
            Some(country) => CmsError::not_found(format!(
                "City '{}' in country '{}'",
                input.city_slug, country
            )),
            None => CmsError::not_found(format!("City '{}'", input.city_slug)),
        })?;

        let query = format!(
            r#"
            INSERT INTO destinations (city_id, slug, category, tags, {SEO_COLUMNS}, is_featured, is_published, hero_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (city_id, slug) DO UPDATE SET
                category = EXCLUDED.category,
                tags = EXCLUDED.tags,
                meta_title = EXCLUDED.meta_title,
                meta_description = EXCLUDED.meta_description,
                og_title = EXCLUDED.og_title,
                og_description = EXCLUDED.og_description,
                og_image = EXCLUDED.og_image,
                canonical_url = EXCLUDED.canonical_url,
                seo_enabled = EXCLUDED.seo_enabled,
                jsonld_type = EXCLUDED.jsonld_type,
                jsonld_override = EXCLUDED.jsonld_override,
                is_featured = EXCLUDED.is_featured,
                is_published = EXCLUDED.is_published,
                hero_image = EXCLUDED.hero_image,
                updated_at = NOW()
            RETURNING id, (xmax = 0) AS created
            "#
        );
        let query = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(city_id)
            .bind(&input.slug)
            .bind(input.category.as_str())
            .bind(&input.tags);
        let row = bind_seo(query, &input.seo)
            .bind(input.is_featured)
            .bind(input.is_published)
            .bind(input.hero_image.as_deref())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn ensure_page(&self, input: &PageInput) -> CmsResult<Upserted> {
        let inserted: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO pages (slug, page_type, is_published, hero_image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&input.slug)
        .bind(input.page_type.as_str())
        .bind(input.is_published)
        .bind(input.hero_image.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        if let Some((id,)) = inserted {
            return Ok(Upserted::created(id));
        }

        let (id,): (i64,) = sqlx::query_as("SELECT id FROM pages WHERE slug = $1")
            .bind(&input.slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(Upserted::updated(id))
    }

    async fn upsert_blog_category(&self, input: &BlogCategoryInput) -> CmsResult<Upserted> {
        let row: UpsertRow = sqlx::query_as(
            r#"
            INSERT INTO blog_categories (slug, name, is_published, sort_order)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO UPDATE SET
                name = EXCLUDED.name,
                is_published = EXCLUDED.is_published,
                sort_order = EXCLUDED.sort_order,
                updated_at = NOW()
            RETURNING id, (xmax = 0) AS created
            "#,
        )
        .bind(&input.slug)
        .bind(&input.name)
        .bind(input.is_published)
        .bind(input.order)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn upsert_blog_post(&self, input: &BlogPostInput) -> CmsResult<Upserted> {
        let category_id = self
            .resolve_category_id(input.category_slug.as_deref())
            .await?;

        let query = format!(
            r#"
            INSERT INTO blog_posts (category_id, slug, hero_image, {SEO_COLUMNS}, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (slug) DO UPDATE SET
                category_id = EXCLUDED.category_id,
                hero_image = EXCLUDED.hero_image,
                meta_title = EXCLUDED.meta_title,
                meta_description = EXCLUDED.meta_description,
                og_title = EXCLUDED.og_title,
                og_description = EXCLUDED.og_description,
                og_image = EXCLUDED.og_image,
                canonical_url = EXCLUDED.canonical_url,
                seo_enabled = EXCLUDED.seo_enabled,
                jsonld_type = EXCLUDED.jsonld_type,
                jsonld_override = EXCLUDED.jsonld_override,
                is_published = EXCLUDED.is_published,
                updated_at = NOW()
            RETURNING id, (xmax = 0) AS created
            "#
        );
        let query = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(category_id)
            .bind(&input.slug)
            .bind(input.hero_image.as_deref());
        let row = bind_seo(query, &input.seo)
            .bind(input.is_published)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn ensure_blog_post(&self, input: &BlogPostInput) -> CmsResult<Upserted> {
        let category_id = self
            .resolve_category_id(input.category_slug.as_deref())
            .await?;

        let query = format!(
            r#"
            INSERT INTO blog_posts (category_id, slug, hero_image, {SEO_COLUMNS}, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id
            "#
        );
        let query = sqlx::query_as::<_, (i64,)>(&query)
            .bind(category_id)
            .bind(&input.slug)
            .bind(input.hero_image.as_deref());
        let inserted = bind_seo(query, &input.seo)
            .bind(input.is_published)
            .fetch_optional(&self.pool)
            .await?;

        if let Some((id,)) = inserted {
            return Ok(Upserted::created(id));
        }

        let (id,): (i64,) = sqlx::query_as("SELECT id FROM blog_posts WHERE slug = $1")
            .bind(&input.slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(Upserted::updated(id))
    }

    async fn upsert_translation(
        &self,
        kind: TranslatableKind,
        owner_id: i64,
        locale: Locale,
        patch: &TranslationPatch,
        default_title: &str,
    ) -> CmsResult<Upserted> {
        let mut tx = self.pool.begin().await?;

        let exists_query = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            owner_table(kind)
        );
        let (exists,): (bool,) = sqlx::query_as(&exists_query)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            return Err(CmsError::not_found(format!("{kind} #{owner_id}")));
        }

        let select = format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations \
             WHERE content_kind = $1 AND content_id = $2 AND locale = $3 FOR UPDATE"
        );
        let existing: Option<TranslationRow> = sqlx::query_as(&select)
            .bind(kind.as_str())
            .bind(owner_id)
            .bind(locale.code())
            .fetch_optional(&mut *tx)
            .await?;

        let upserted = match existing {
            Some(row) => {
                let mut translation = Translation::from(row);
                patch.apply_to(&mut translation);
                let update = format!(
                    r#"
                    UPDATE translations SET
                        title = $1, subtitle = $2, short_description = $3, body = $4, hero_image = $5,
                        ({SEO_COLUMNS}) = ($6, $7, $8, $9, $10, $11, $12, $13, $14),
                        updated_at = $15
                    WHERE id = $16
                    RETURNING id, FALSE AS created
                    "#
                );
                let row = translation_binds(sqlx::query_as::<_, UpsertRow>(&update), &translation)
                    .bind(translation.updated_at)
                    .bind(translation.id)
                    .fetch_one(&mut *tx)
                    .await?;
                row
            }
            None => {
                let translation = patch.new_translation(0, locale, default_title);
                let insert = format!(
                    r#"
                    INSERT INTO translations (
                        title, subtitle, short_description, body, hero_image, {SEO_COLUMNS},
                        content_kind, content_id, locale
                    )
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                    RETURNING id, TRUE AS created
                    "#
                );
                let row = translation_binds(sqlx::query_as::<_, UpsertRow>(&insert), &translation)
                    .bind(kind.as_str())
                    .bind(owner_id)
                    .bind(locale.code())
                    .fetch_one(&mut *tx)
                    .await?;
                row
            }
        };

        if let Some(sections) = &patch.sections {
            sqlx::query("DELETE FROM sections WHERE translation_id = $1")
                .bind(upserted.id)
                .execute(&mut *tx)
                .await?;
            for section in sections {
                sqlx::query(
                    r#"
                    INSERT INTO sections (translation_id, section_type, sort_order, title, body, image, cta_label, cta_url)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(upserted.id)
                .bind(section.section_type.as_str())
                .bind(section.order)
                .bind(&section.title)
                .bind(&section.body)
                .bind(section.image.as_deref())
                .bind(&section.cta_label)
                .bind(&section.cta_url)
                .execute(&mut *tx)
                .await?;
            }
        }

        if let Some(slides) = &patch.hero_slides {
            sqlx::query("DELETE FROM hero_slides WHERE translation_id = $1")
                .bind(upserted.id)
                .execute(&mut *tx)
                .await?;
            for slide in slides {
                sqlx::query(
                    r#"
                    INSERT INTO hero_slides (translation_id, image, caption, sort_order)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(upserted.id)
                .bind(&slide.image)
                .bind(&slide.caption)
                .bind(slide.order)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(upserted.into())
    }

    async fn upsert_homepage_category(&self, input: &HomepageCategoryInput) -> CmsResult<Upserted> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO homepage_categories (slug, sort_order, {SEO_COLUMNS}, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (slug) DO UPDATE SET
                sort_order = EXCLUDED.sort_order,
                meta_title = EXCLUDED.meta_title,
                meta_description = EXCLUDED.meta_description,
                og_title = EXCLUDED.og_title,
                og_description = EXCLUDED.og_description,
                og_image = EXCLUDED.og_image,
                canonical_url = EXCLUDED.canonical_url,
                seo_enabled = EXCLUDED.seo_enabled,
                jsonld_type = EXCLUDED.jsonld_type,
                jsonld_override = EXCLUDED.jsonld_override,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            RETURNING id, (xmax = 0) AS created
            "#
        );
        let query = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(&input.slug)
            .bind(input.order);
        let row = bind_seo(query, &input.seo)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(translation) = &input.translation {
            sqlx::query(
                r#"
                INSERT INTO homepage_category_translations (category_id, locale, title, description, image, is_published)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (category_id, locale) DO UPDATE SET
                    title = EXCLUDED.title,
                    description = EXCLUDED.description,
                    image = EXCLUDED.image,
                    is_published = EXCLUDED.is_published
                "#,
            )
            .bind(row.id)
            .bind(translation.locale.code())
            .bind(&translation.title)
            .bind(&translation.description)
            .bind(translation.image.as_deref())
            .bind(translation.is_published)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    async fn upsert_navigation_item(&self, input: &NavigationItemInput) -> CmsResult<Upserted> {
        let row: UpsertRow = sqlx::query_as(
            r#"
            INSERT INTO navigation_items (locale, label, target_type, target_value, sort_order, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (locale, label) DO UPDATE SET
                target_type = EXCLUDED.target_type,
                target_value = EXCLUDED.target_value,
                sort_order = EXCLUDED.sort_order,
                is_active = EXCLUDED.is_active
            RETURNING id, (xmax = 0) AS created
            "#,
        )
        .bind(input.locale.code())
        .bind(&input.label)
        .bind(input.target.kind())
        .bind(input.target.value())
        .bind(input.order)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn upsert_footer_block(&self, input: &FooterBlockInput) -> CmsResult<Upserted> {
        let mut tx = self.pool.begin().await?;

        let row: UpsertRow = sqlx::query_as(
            r#"
            INSERT INTO footer_blocks (locale, title, body, sort_order)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (locale, title) DO UPDATE SET
                body = EXCLUDED.body,
                sort_order = EXCLUDED.sort_order
            RETURNING id, (xmax = 0) AS created
            "#,
        )
        .bind(input.locale.code())
        .bind(&input.title)
        .bind(&input.body)
        .bind(input.order)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM footer_links WHERE block_id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        for link in &input.links {
            sqlx::query(
                "INSERT INTO footer_links (block_id, label, url, sort_order) VALUES ($1, $2, $3, $4)",
            )
            .bind(row.id)
            .bind(&link.label)
            .bind(&link.url)
            .bind(link.order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row.into())
    }

    async fn delete(&self, kind: ContentKind, slug: &str) -> CmsResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Polymorphic translations have no foreign key, so they are removed
        // explicitly before the owning rows; everything else cascades.
        let deleted = match kind {
            ContentKind::Page => {
                sqlx::query(
                    "DELETE FROM translations WHERE content_kind = 'page' \
                     AND content_id IN (SELECT id FROM pages WHERE slug = $1)",
                )
                .bind(slug)
                .execute(&mut *tx)
                .await?;
                sqlx::query("DELETE FROM pages WHERE slug = $1")
                    .bind(slug)
                    .execute(&mut *tx)
                    .await?
            }
            ContentKind::Destination => {
                let target = "(SELECT MIN(id) FROM destinations WHERE slug = $1)";
                sqlx::query(&format!(
                    "DELETE FROM translations WHERE content_kind = 'destination' AND content_id = {target}"
                ))
                .bind(slug)
                .execute(&mut *tx)
                .await?;
                sqlx::query(&format!("DELETE FROM destinations WHERE id = {target}"))
                    .bind(slug)
                    .execute(&mut *tx)
                    .await?
            }
            ContentKind::BlogPost => {
                sqlx::query(
                    "DELETE FROM translations WHERE content_kind = 'blog_post' \
                     AND content_id IN (SELECT id FROM blog_posts WHERE slug = $1)",
                )
                .bind(slug)
                .execute(&mut *tx)
                .await?;
                sqlx::query("DELETE FROM blog_posts WHERE slug = $1")
                    .bind(slug)
                    .execute(&mut *tx)
                    .await?
            }
            ContentKind::Country => {
                sqlx::query(
                    r#"
                    DELETE FROM translations WHERE content_kind = 'destination' AND content_id IN (
                        SELECT d.id FROM destinations d
                        JOIN cities ci ON ci.id = d.city_id
                        JOIN countries co ON co.id = ci.country_id
                        WHERE co.slug = $1
                    )
                    "#,
                )
                .bind(slug)
                .execute(&mut *tx)
                .await?;
                sqlx::query("DELETE FROM countries WHERE slug = $1")
                    .bind(slug)
                    .execute(&mut *tx)
                    .await?
            }
            ContentKind::City => {
                let target = "(SELECT MIN(id) FROM cities WHERE slug = $1)";
                sqlx::query(&format!(
                    "DELETE FROM translations WHERE content_kind = 'destination' \
                     AND content_id IN (SELECT id FROM destinations WHERE city_id = {target})"
                ))
                .bind(slug)
                .execute(&mut *tx)
                .await?;
                sqlx::query(&format!("DELETE FROM cities WHERE id = {target}"))
                    .bind(slug)
                    .execute(&mut *tx)
                    .await?
            }
            ContentKind::BlogCategory => {
                sqlx::query(
                    r#"
                    DELETE FROM translations WHERE content_kind = 'blog_post' AND content_id IN (
                        SELECT p.id FROM blog_posts p
                        JOIN blog_categories c ON c.id = p.category_id
                        WHERE c.slug = $1
                    )
                    "#,
                )
                .bind(slug)
                .execute(&mut *tx)
                .await?;
                sqlx::query("DELETE FROM blog_categories WHERE slug = $1")
                    .bind(slug)
                    .execute(&mut *tx)
                    .await?
            }
            ContentKind::HomepageCategory => {
                sqlx::query("DELETE FROM homepage_categories WHERE slug = $1")
                    .bind(slug)
                    .execute(&mut *tx)
                    .await?
            }
        };

        tx.commit().await?;
        Ok(deleted.rows_affected() > 0)
    }
}

/// Bind the scalar translation columns as `$1..=$14`.
fn translation_binds<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    translation: &'q Translation,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    let query = query
        .bind(translation.title.as_str())
        .bind(translation.subtitle.as_str())
        .bind(translation.short_description.as_str())
        .bind(translation.body.as_str())
        .bind(translation.hero_image.as_deref());
    bind_seo(query, &translation.seo)
}

// ==================== Row types ====================

#[derive(Debug, FromRow)]
struct UpsertRow {
    id: i64,
    created: bool,
}

impl From<UpsertRow> for Upserted {
    fn from(row: UpsertRow) -> Self {
        if row.created {
            Upserted::created(row.id)
        } else {
            Upserted::updated(row.id)
        }
    }
}

#[derive(Debug, FromRow)]
struct SeoRow {
    meta_title: String,
    meta_description: String,
    og_title: Option<String>,
    og_description: Option<String>,
    og_image: Option<String>,
    canonical_url: Option<String>,
    seo_enabled: bool,
    jsonld_type: String,
    jsonld_override: String,
}

impl From<SeoRow> for SeoFields {
    fn from(row: SeoRow) -> Self {
        Self {
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            og_title: row.og_title,
            og_description: row.og_description,
            og_image: row.og_image,
            canonical_url: row.canonical_url,
            seo_enabled: row.seo_enabled,
            jsonld_type: row.jsonld_type,
            jsonld_override: row.jsonld_override,
        }
    }
}

#[derive(Debug, FromRow)]
struct PageRow {
    id: i64,
    slug: String,
    page_type: String,
    is_published: bool,
    hero_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PageRow> for Page {
    type Error = CmsError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            slug: row.slug,
            page_type: row.page_type.parse()?,
            is_published: row.is_published,
            hero_image: row.hero_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct CountryRow {
    id: i64,
    slug: String,
    name: String,
    short_description: String,
    hero_image: Option<String>,
    #[sqlx(flatten)]
    seo: SeoRow,
    is_published: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CountryRow> for Country {
    fn from(row: CountryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            short_description: row.short_description,
            hero_image: row.hero_image,
            seo: row.seo.into(),
            is_published: row.is_published,
            order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CountrySummaryRow {
    #[sqlx(flatten)]
    country: CountryRow,
    cities_count: i64,
    destinations_count: i64,
    stories_count: i64,
}

impl From<CountrySummaryRow> for CountrySummary {
    fn from(row: CountrySummaryRow) -> Self {
        Self {
            country: row.country.into(),
            cities_count: row.cities_count,
            destinations_count: row.destinations_count,
            stories_count: row.stories_count,
        }
    }
}

#[derive(Debug, FromRow)]
struct CityRow {
    id: i64,
    country_id: i64,
    slug: String,
    name: String,
    short_description: String,
    hero_image: Option<String>,
    #[sqlx(flatten)]
    seo: SeoRow,
    is_published: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CityRow> for City {
    fn from(row: CityRow) -> Self {
        Self {
            id: row.id,
            country_id: row.country_id,
            slug: row.slug,
            name: row.name,
            short_description: row.short_description,
            hero_image: row.hero_image,
            seo: row.seo.into(),
            is_published: row.is_published,
            order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct DestinationRow {
    id: i64,
    city_id: i64,
    slug: String,
    category: String,
    tags: String,
    #[sqlx(flatten)]
    seo: SeoRow,
    is_featured: bool,
    is_published: bool,
    hero_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DestinationRow> for Destination {
    type Error = CmsError;

    fn try_from(row: DestinationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            city_id: row.city_id,
            slug: row.slug,
            category: row.category.parse()?,
            tags: row.tags,
            seo: row.seo.into(),
            is_featured: row.is_featured,
            is_published: row.is_published,
            hero_image: row.hero_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct BlogCategoryRow {
    id: i64,
    slug: String,
    name: String,
    is_published: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogCategoryRow> for BlogCategory {
    fn from(row: BlogCategoryRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            is_published: row.is_published,
            order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct BlogCategorySummaryRow {
    #[sqlx(flatten)]
    category: BlogCategoryRow,
    posts_count: i64,
}

impl From<BlogCategorySummaryRow> for BlogCategorySummary {
    fn from(row: BlogCategorySummaryRow) -> Self {
        Self {
            category: row.category.into(),
            posts_count: row.posts_count,
        }
    }
}

#[derive(Debug, FromRow)]
struct BlogPostRow {
    id: i64,
    category_id: i64,
    slug: String,
    hero_image: Option<String>,
    #[sqlx(flatten)]
    seo: SeoRow,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogPostRow> for BlogPost {
    fn from(row: BlogPostRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            slug: row.slug,
            hero_image: row.hero_image,
            seo: row.seo.into(),
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TranslationRow {
    id: i64,
    content_id: i64,
    locale: String,
    title: String,
    subtitle: String,
    short_description: String,
    body: String,
    hero_image: Option<String>,
    #[sqlx(flatten)]
    seo: SeoRow,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TranslationRow> for Translation {
    fn from(row: TranslationRow) -> Self {
        Self {
            id: row.id,
            locale: row.locale,
            title: row.title,
            subtitle: row.subtitle,
            short_description: row.short_description,
            body: row.body,
            hero_image: row.hero_image,
            seo: row.seo.into(),
            sections: Vec::new(),
            hero_slides: Vec::new(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SectionRow {
    id: i64,
    translation_id: i64,
    section_type: String,
    sort_order: i32,
    title: String,
    body: String,
    image: Option<String>,
    cta_label: String,
    cta_url: String,
}

impl TryFrom<SectionRow> for Section {
    type Error = CmsError;

    fn try_from(row: SectionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            section_type: row.section_type.parse()?,
            order: row.sort_order,
            title: row.title,
            body: row.body,
            image: row.image,
            cta_label: row.cta_label,
            cta_url: row.cta_url,
        })
    }
}

#[derive(Debug, FromRow)]
struct HeroSlideRow {
    id: i64,
    translation_id: i64,
    image: String,
    caption: String,
    sort_order: i32,
}

impl From<HeroSlideRow> for HeroSlide {
    fn from(row: HeroSlideRow) -> Self {
        Self {
            id: row.id,
            image: row.image,
            caption: row.caption,
            order: row.sort_order,
        }
    }
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    slug: String,
    is_published: bool,
    updated_at: DateTime<Utc>,
    locales: Vec<String>,
}

#[derive(Debug, FromRow)]
struct NavigationRow {
    id: i64,
    locale: String,
    label: String,
    target_type: String,
    target_value: String,
    sort_order: i32,
    is_active: bool,
}

impl TryFrom<NavigationRow> for NavigationItem {
    type Error = CmsError;

    fn try_from(row: NavigationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            locale: row.locale,
            label: row.label,
            target: NavTarget::from_parts(&row.target_type, row.target_value)?,
            order: row.sort_order,
            is_active: row.is_active,
        })
    }
}

#[derive(Debug, FromRow)]
struct FooterBlockRow {
    id: i64,
    locale: String,
    title: String,
    body: String,
    sort_order: i32,
}

#[derive(Debug, FromRow)]
struct FooterLinkRow {
    id: i64,
    block_id: i64,
    label: String,
    url: String,
    sort_order: i32,
}

impl From<FooterLinkRow> for FooterLink {
    fn from(row: FooterLinkRow) -> Self {
        Self {
            id: row.id,
            label: row.label,
            url: row.url,
            order: row.sort_order,
        }
    }
}

#[derive(Debug, FromRow)]
struct HomepageCardRow {
    id: i64,
    slug: String,
    sort_order: i32,
    #[sqlx(flatten)]
    seo: SeoRow,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    translation_id: i64,
    locale: String,
    title: String,
    description: String,
    image: Option<String>,
    is_published: bool,
}

impl From<HomepageCardRow> for HomepageCard {
    fn from(row: HomepageCardRow) -> Self {
        Self {
            translation: HomepageCategoryTranslation {
                id: row.translation_id,
                category_id: row.id,
                locale: row.locale,
                title: row.title,
                description: row.description,
                image: row.image,
                is_published: row.is_published,
            },
            category: HomepageCategory {
                id: row.id,
                slug: row.slug,
                order: row.sort_order,
                seo: row.seo.into(),
                is_active: row.is_active,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

#[derive(Debug, FromRow)]
struct StatsRow {
    pages_total: i64,
    pages_published: i64,
    page_translations: i64,
    page_sections: i64,
    countries: i64,
    countries_published: i64,
    cities: i64,
    cities_published: i64,
    destinations: i64,
    destinations_published: i64,
    destination_translations: i64,
    destination_sections: i64,
    categories: i64,
    categories_published: i64,
    posts: i64,
    posts_published: i64,
    post_translations: i64,
    post_sections: i64,
    menu_items: i64,
    active_items: i64,
    footer_blocks: i64,
    footer_links: i64,
}

impl From<StatsRow> for ContentStats {
    fn from(row: StatsRow) -> Self {
        Self {
            pages: PageStats {
                total: row.pages_total,
                published: row.pages_published,
                translations: row.page_translations,
                sections: row.page_sections,
            },
            destinations: DestinationStats {
                countries: row.countries,
                countries_published: row.countries_published,
                cities: row.cities,
                cities_published: row.cities_published,
                destinations: row.destinations,
                destinations_published: row.destinations_published,
                translations: row.destination_translations,
                sections: row.destination_sections,
            },
            blog: BlogStats {
                categories: row.categories,
                categories_published: row.categories_published,
                posts: row.posts,
                posts_published: row.posts_published,
                translations: row.post_translations,
                sections: row.post_sections,
            },
            navigation: NavigationStats {
                menu_items: row.menu_items,
                active_items: row.active_items,
            },
            footer: FooterStats {
                footer_blocks: row.footer_blocks,
                footer_links: row.footer_links,
            },
        }
    }
}
