//! Presentation: turns resolved content into client payloads.
//!
//! Every payload is built from one resolution, so title, body, sections and
//! hero slides always come from the same translation. Stored image values
//! are relative paths and are made absolute here with [`MediaUrls`]; the
//! stored value itself is never changed.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::{
    BlogCategory, ContentEntity, FooterBlock, HeroSlide, HomepageCard, Localized, NavigationItem,
    Page, Section, SeoFields, Translation,
};
use crate::i18n::{Resolution, TranslationResolver};
use crate::store::{BlogCategorySummary, BlogPostDetail, CitySummary, CountrySummary, DestinationDetail};

/// Builds absolute media URLs from stored relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaUrls {
    origin: Option<String>,
}

impl MediaUrls {
    pub fn new(origin: Option<String>) -> Self {
        Self {
            origin: origin.filter(|o| !o.trim().is_empty()),
        }
    }

    /// `origin + "/" + path`. Values that are already absolute are returned
    /// as is; without an origin the stored path is returned.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        match &self.origin {
            Some(origin) => format!(
                "{}/{}",
                origin.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    /// Like [`absolute`](Self::absolute), treating empty values as absent.
    pub fn optional(&self, path: Option<&str>) -> Option<String> {
        path.filter(|p| !p.is_empty()).map(|p| self.absolute(p))
    }
}

/// Frontend URL of a page, used for admin preview links.
pub fn frontend_url(frontend_base: &str, slug: &str, locale: &str) -> String {
    let base = frontend_base.trim_end_matches('/');
    if slug == "home" {
        format!("{}/{}", base, locale)
    } else {
        format!("{}/{}/{}", base, locale, slug)
    }
}

// ==================== Payloads ====================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoPayload {
    pub meta_title: String,
    pub meta_description: String,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub seo_enabled: bool,
    pub jsonld_type: String,
    pub jsonld_override: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPayload {
    pub id: i64,
    pub section_type: &'static str,
    pub order: i32,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub cta_label: String,
    pub cta_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroSlidePayload {
    pub image: String,
    pub caption: String,
    pub order: i32,
}

/// One translation, serialized independently of any resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationPayload {
    pub locale: String,
    pub title: String,
    pub subtitle: String,
    pub short_description: String,
    pub body: String,
    pub hero_image: Option<String>,
    pub hero_slides: Vec<HeroSlidePayload>,
    #[serde(flatten)]
    pub seo: SeoPayload,
    pub sections: Vec<SectionPayload>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDetailPayload {
    pub slug: String,
    pub page_type: &'static str,
    pub is_published: bool,
    pub locale: Option<String>,
    pub requested_locale: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub hero_image: Option<String>,
    pub hero_slides: Vec<HeroSlidePayload>,
    #[serde(flatten)]
    pub seo: SeoPayload,
    pub sections: Vec<SectionPayload>,
    pub translation_missing: bool,
    pub translation: Option<TranslationPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPayload {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub short_description: String,
    pub hero_image: Option<String>,
    pub is_published: bool,
    pub order: i32,
    pub cities_count: i64,
    pub destinations_count: i64,
    pub stories_count: i64,
    pub has_content: bool,
    #[serde(flatten)]
    pub seo: SeoPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityPayload {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub short_description: String,
    pub hero_image: Option<String>,
    pub is_published: bool,
    pub order: i32,
    pub country: CountryPayload,
    pub destinations_count: i64,
    #[serde(flatten)]
    pub seo: SeoPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRef {
    pub name: String,
    pub slug: String,
}

/// Fields resolved from one translation, shared by destinations and posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedText {
    pub locale: Option<String>,
    pub title: String,
    pub subtitle: String,
    pub short_description: String,
    pub body: String,
    pub meta_title: String,
    pub meta_description: String,
    pub sections: Vec<SectionPayload>,
    pub translation_missing: bool,
}

/// Entity-level SEO for content whose meta title and description come from
/// the resolved translation instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySeoPayload {
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub canonical_url: Option<String>,
    pub seo_enabled: bool,
    pub jsonld_type: String,
    pub jsonld_override: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationPayload {
    pub id: i64,
    pub slug: String,
    pub category: &'static str,
    pub tags: Vec<String>,
    pub is_featured: bool,
    pub hero_image: Option<String>,
    pub hero_slides: Vec<HeroSlidePayload>,
    pub is_published: bool,
    pub city: CityPayload,
    pub country: CountryRef,
    pub translations: Vec<TranslationPayload>,
    #[serde(flatten)]
    pub text: ResolvedText,
    #[serde(flatten)]
    pub seo: EntitySeoPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogCategoryPayload {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_published: bool,
    pub order: i32,
    pub posts_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPostPayload {
    pub id: i64,
    pub slug: String,
    pub hero_image: Option<String>,
    pub hero_slides: Vec<HeroSlidePayload>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: BlogCategoryPayload,
    pub translations: Vec<TranslationPayload>,
    #[serde(flatten)]
    pub text: ResolvedText,
    #[serde(flatten)]
    pub seo: EntitySeoPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDetailPayload {
    pub category: CategoryRef,
    pub posts: Vec<BlogPostPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItemPayload {
    pub label: String,
    pub href: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterLinkPayload {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterBlockPayload {
    pub title: String,
    pub body: String,
    pub links: Vec<FooterLinkPayload>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomepageCardPayload {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub slug: String,
    pub order: i32,
    #[serde(flatten)]
    pub seo: SeoPayload,
}

// ==================== Presenter ====================

/// Assembles payloads for one request.
#[derive(Debug, Clone)]
pub struct Presenter {
    resolver: TranslationResolver,
    media: MediaUrls,
}

impl Presenter {
    pub fn new(resolver: TranslationResolver, media: MediaUrls) -> Self {
        Self { resolver, media }
    }

    pub fn media(&self) -> &MediaUrls {
        &self.media
    }

    fn seo(&self, seo: &SeoFields) -> SeoPayload {
        SeoPayload {
            meta_title: seo.meta_title.clone(),
            meta_description: seo.meta_description.clone(),
            og_title: seo.og_title.clone(),
            og_description: seo.og_description.clone(),
            og_image: self.media.optional(seo.og_image.as_deref()),
            canonical_url: seo.canonical_url.clone(),
            seo_enabled: seo.seo_enabled,
            jsonld_type: seo.jsonld_type.clone(),
            jsonld_override: seo.jsonld_override.clone(),
        }
    }

    fn entity_seo(&self, seo: &SeoFields) -> EntitySeoPayload {
        EntitySeoPayload {
            og_title: seo.og_title.clone(),
            og_description: seo.og_description.clone(),
            og_image: self.media.optional(seo.og_image.as_deref()),
            canonical_url: seo.canonical_url.clone(),
            seo_enabled: seo.seo_enabled,
            jsonld_type: seo.jsonld_type.clone(),
            jsonld_override: seo.jsonld_override.clone(),
        }
    }

    fn sections(&self, sections: &[Section]) -> Vec<SectionPayload> {
        sections
            .iter()
            .map(|section| SectionPayload {
                id: section.id,
                section_type: section.section_type.as_str(),
                order: section.order,
                title: section.title.clone(),
                body: section.body.clone(),
                image: self.media.optional(section.image.as_deref()),
                cta_label: section.cta_label.clone(),
                cta_url: section.cta_url.clone(),
            })
            .collect()
    }

    fn slides(&self, slides: &[HeroSlide]) -> Vec<HeroSlidePayload> {
        slides
            .iter()
            .map(|slide| HeroSlidePayload {
                image: self.media.absolute(&slide.image),
                caption: slide.caption.clone(),
                order: slide.order,
            })
            .collect()
    }

    /// Translation hero image, else the entity's, else none.
    fn hero_image(&self, translation: Option<&Translation>, entity: Option<&str>) -> Option<String> {
        let chosen = translation
            .and_then(|t| t.hero_image.as_deref())
            .filter(|image| !image.is_empty())
            .or(entity);
        self.media.optional(chosen)
    }

    pub fn translation(&self, translation: &Translation) -> TranslationPayload {
        TranslationPayload {
            locale: translation.locale.clone(),
            title: translation.title.clone(),
            subtitle: translation.subtitle.clone(),
            short_description: translation.short_description.clone(),
            body: translation.body.clone(),
            hero_image: self.media.optional(translation.hero_image.as_deref()),
            hero_slides: self.slides(&translation.hero_slides),
            seo: self.seo(&translation.seo),
            sections: self.sections(&translation.sections),
            created_at: translation.created_at,
            updated_at: translation.updated_at,
        }
    }

    fn resolved_text(&self, resolution: &Resolution<'_>) -> ResolvedText {
        let translation = resolution.translation();
        let text = |field: fn(&Translation) -> &String| {
            translation.map(|t| field(t).clone()).unwrap_or_default()
        };
        ResolvedText {
            locale: resolution.locale().map(str::to_string),
            title: text(|t| &t.title),
            subtitle: text(|t| &t.subtitle),
            short_description: text(|t| &t.short_description),
            body: text(|t| &t.body),
            meta_title: text(|t| &t.seo.meta_title),
            meta_description: text(|t| &t.seo.meta_description),
            sections: translation
                .map(|t| self.sections(&t.sections))
                .unwrap_or_default(),
            translation_missing: resolution.translation_missing(),
        }
    }

    pub fn page_detail(&self, page: &Localized<Page>, locale: Option<&str>) -> PageDetailPayload {
        let resolution = self.resolver.resolve(page, locale);
        let translation = resolution.translation();

        let seo = match translation {
            Some(t) => self.seo(&t.seo),
            None => SeoPayload {
                seo_enabled: false,
                ..self.seo(&SeoFields::default())
            },
        };

        PageDetailPayload {
            slug: page.entity.slug.clone(),
            page_type: page.entity.page_type.as_str(),
            is_published: page.entity.is_published,
            locale: resolution.locale().map(str::to_string),
            requested_locale: resolution.requested_locale().map(str::to_string),
            title: translation.map(|t| t.title.clone()).unwrap_or_default(),
            subtitle: translation.map(|t| t.subtitle.clone()).unwrap_or_default(),
            body: translation.map(|t| t.body.clone()).unwrap_or_default(),
            hero_image: self.hero_image(translation, page.entity.hero_image()),
            hero_slides: translation
                .map(|t| self.slides(&t.hero_slides))
                .unwrap_or_default(),
            seo,
            sections: translation
                .map(|t| self.sections(&t.sections))
                .unwrap_or_default(),
            translation_missing: resolution.translation_missing(),
            translation: translation.map(|t| self.translation(t)),
        }
    }

    pub fn country(&self, summary: &CountrySummary) -> CountryPayload {
        let country = &summary.country;
        CountryPayload {
            id: country.id,
            name: country.name.clone(),
            slug: country.slug.clone(),
            short_description: country.short_description.clone(),
            hero_image: self.media.optional(country.hero_image.as_deref()),
            is_published: country.is_published,
            order: country.order,
            cities_count: summary.cities_count,
            destinations_count: summary.destinations_count,
            stories_count: summary.stories_count,
            has_content: summary.has_content(),
            seo: self.seo(&country.seo),
        }
    }

    pub fn city(&self, summary: &CitySummary) -> CityPayload {
        let city = &summary.city;
        CityPayload {
            id: city.id,
            name: city.name.clone(),
            slug: city.slug.clone(),
            short_description: city.short_description.clone(),
            hero_image: self.media.optional(city.hero_image.as_deref()),
            is_published: city.is_published,
            order: city.order,
            country: self.country(&summary.country),
            destinations_count: summary.destinations_count,
            seo: self.seo(&city.seo),
        }
    }

    pub fn destination(&self, detail: &DestinationDetail, locale: Option<&str>) -> DestinationPayload {
        let localized = &detail.destination;
        let destination = &localized.entity;
        let resolution = self.resolver.resolve(localized, locale);
        let translation = resolution.translation();
        let country = &detail.city.country.country;

        DestinationPayload {
            id: destination.id,
            slug: destination.slug.clone(),
            category: destination.category.as_str(),
            tags: destination.tag_list().into_iter().map(str::to_string).collect(),
            is_featured: destination.is_featured,
            hero_image: self.hero_image(translation, destination.hero_image()),
            hero_slides: translation
                .map(|t| self.slides(&t.hero_slides))
                .unwrap_or_default(),
            is_published: destination.is_published,
            city: self.city(&detail.city),
            country: CountryRef {
                name: country.name.clone(),
                slug: country.slug.clone(),
            },
            translations: localized
                .translations
                .iter()
                .map(|t| self.translation(t))
                .collect(),
            text: self.resolved_text(&resolution),
            seo: self.entity_seo(&destination.seo),
        }
    }

    pub fn blog_category(&self, summary: &BlogCategorySummary) -> BlogCategoryPayload {
        let category = &summary.category;
        BlogCategoryPayload {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            is_published: category.is_published,
            order: category.order,
            posts_count: summary.posts_count,
        }
    }

    pub fn blog_post(&self, detail: &BlogPostDetail, locale: Option<&str>) -> BlogPostPayload {
        let localized = &detail.post;
        let post = &localized.entity;
        let resolution = self.resolver.resolve(localized, locale);
        let translation = resolution.translation();

        BlogPostPayload {
            id: post.id,
            slug: post.slug.clone(),
            hero_image: self.hero_image(translation, post.hero_image()),
            hero_slides: translation
                .map(|t| self.slides(&t.hero_slides))
                .unwrap_or_default(),
            is_published: post.is_published,
            created_at: post.created_at,
            updated_at: post.updated_at,
            category: self.blog_category(&detail.category),
            translations: localized
                .translations
                .iter()
                .map(|t| self.translation(t))
                .collect(),
            text: self.resolved_text(&resolution),
            seo: self.entity_seo(&post.seo),
        }
    }

    pub fn category_detail(
        &self,
        category: &BlogCategory,
        posts: &[BlogPostDetail],
        locale: Option<&str>,
    ) -> CategoryDetailPayload {
        CategoryDetailPayload {
            category: CategoryRef {
                id: category.id,
                name: category.name.clone(),
                slug: category.slug.clone(),
            },
            posts: posts.iter().map(|post| self.blog_post(post, locale)).collect(),
        }
    }

    pub fn nav_item(&self, item: &NavigationItem) -> NavItemPayload {
        NavItemPayload {
            label: item.label.clone(),
            href: item.href(),
            order: item.order,
        }
    }

    pub fn footer_block(&self, block: &FooterBlock) -> FooterBlockPayload {
        FooterBlockPayload {
            title: block.title.clone(),
            body: block.body.clone(),
            links: block
                .links
                .iter()
                .map(|link| FooterLinkPayload {
                    label: link.label.clone(),
                    url: link.url.clone(),
                })
                .collect(),
            order: block.order,
        }
    }

    pub fn homepage_card(&self, card: &HomepageCard) -> HomepageCardPayload {
        HomepageCardPayload {
            title: card.translation.title.clone(),
            description: card.translation.description.clone(),
            image: self.media.optional(card.translation.image.as_deref()),
            slug: card.category.slug.clone(),
            order: card.category.order,
            seo: self.seo(&card.category.seo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_support::{page, translation};
    use crate::content::{
        BlogPost, City, Country, Destination, DestinationCategory, HomepageCategory,
        HomepageCategoryTranslation, NavTarget, SectionType,
    };
    use serde_json::json;

    fn presenter(origin: Option<&str>) -> Presenter {
        Presenter::new(
            TranslationResolver::default(),
            MediaUrls::new(origin.map(str::to_string)),
        )
    }

    fn section(id: i64, order: i32, body: &str) -> Section {
        Section {
            id,
            section_type: SectionType::Text,
            order,
            title: String::new(),
            body: body.to_string(),
            image: Some("media/sections/a.jpg".to_string()),
            cta_label: String::new(),
            cta_url: String::new(),
        }
    }

    fn country_summary() -> CountrySummary {
        let now = Utc::now();
        CountrySummary {
            country: Country {
                id: 1,
                slug: "portugal".to_string(),
                name: "Portugal".to_string(),
                short_description: "Atlantic coast".to_string(),
                hero_image: Some("media/countries/pt.jpg".to_string()),
                seo: SeoFields::with_jsonld_type("Country"),
                is_published: true,
                order: 1,
                created_at: now,
                updated_at: now,
            },
            cities_count: 1,
            destinations_count: 1,
            stories_count: 0,
        }
    }

    fn destination_detail(locales: &[&str]) -> DestinationDetail {
        let now = Utc::now();
        let city = CitySummary {
            city: City {
                id: 2,
                country_id: 1,
                slug: "lisbon".to_string(),
                name: "Lisbon".to_string(),
                short_description: String::new(),
                hero_image: None,
                seo: SeoFields::with_jsonld_type("City"),
                is_published: true,
                order: 0,
                created_at: now,
                updated_at: now,
            },
            country: country_summary(),
            destinations_count: 1,
        };
        let translations = locales
            .iter()
            .enumerate()
            .map(|(i, code)| translation(i as i64 + 10, code, &format!("Belém [{code}]")))
            .collect();
        DestinationDetail {
            destination: Localized::new(
                Destination {
                    id: 3,
                    city_id: 2,
                    slug: "belem-tower".to_string(),
                    category: DestinationCategory::Landmark,
                    tags: "historical, unesco".to_string(),
                    seo: SeoFields::with_jsonld_type("TouristAttraction"),
                    is_featured: true,
                    is_published: true,
                    hero_image: Some("media/destinations/belem.jpg".to_string()),
                    created_at: now,
                    updated_at: now,
                },
                translations,
            ),
            city,
        }
    }

    // ==================== Media URL Tests ====================

    #[test]
    fn test_absolute_joins_origin_and_path() {
        let media = MediaUrls::new(Some("https://cms.example.com/".to_string()));
        assert_eq!(
            media.absolute("/media/hero.jpg"),
            "https://cms.example.com/media/hero.jpg"
        );
        assert_eq!(
            media.absolute("media/hero.jpg"),
            "https://cms.example.com/media/hero.jpg"
        );
    }

    #[test]
    fn test_absolute_keeps_absolute_urls_and_missing_origin() {
        let media = MediaUrls::new(Some("https://cms.example.com".to_string()));
        assert_eq!(
            media.absolute("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );

        let bare = MediaUrls::new(None);
        assert_eq!(bare.absolute("media/a.jpg"), "media/a.jpg");
        assert_eq!(bare.optional(Some("")), None);
    }

    #[test]
    fn test_frontend_url() {
        assert_eq!(frontend_url("http://localhost:3000/", "home", "fr"), "http://localhost:3000/fr");
        assert_eq!(
            frontend_url("http://localhost:3000", "about", "fr"),
            "http://localhost:3000/fr/about"
        );
    }

    // ==================== Page Tests ====================

    #[test]
    fn test_page_fallback_reports_missing_translation() {
        let about = page("about", &["en", "fr"]);
        let payload = presenter(None).page_detail(&about, Some("es"));

        assert_eq!(payload.locale.as_deref(), Some("en"));
        assert_eq!(payload.requested_locale.as_deref(), Some("es"));
        assert_eq!(payload.title, "about [en]");
        assert!(payload.translation_missing);
        assert!(payload.translation.is_some());
    }

    #[test]
    fn test_page_without_translations_is_blank() {
        let empty = page("draft", &[]);
        let payload = presenter(None).page_detail(&empty, Some("fr"));

        assert_eq!(payload.locale, None);
        assert_eq!(payload.title, "");
        assert!(!payload.seo.seo_enabled);
        assert!(payload.translation_missing);
        assert!(payload.translation.is_none());
    }

    #[test]
    fn test_page_sections_come_from_resolved_translation_only() {
        let mut about = page("about", &["en", "fr"]);
        about.translations[0].sections = vec![section(2, 2, "en second"), section(1, 1, "en first")];
        about.translations[1].sections = vec![section(3, 1, "fr only")];
        about.translations[0].sort_children();

        let payload = presenter(Some("https://cms.example.com")).page_detail(&about, Some("en"));
        let bodies: Vec<&str> = payload.sections.iter().map(|s| s.body.as_str()).collect();
        assert_eq!(bodies, vec!["en first", "en second"]);
        assert_eq!(
            payload.sections[0].image.as_deref(),
            Some("https://cms.example.com/media/sections/a.jpg")
        );
    }

    #[test]
    fn test_page_hero_image_falls_back_to_entity() {
        let mut about = page("about", &["en"]);
        about.entity.hero_image = Some("media/pages/about.jpg".to_string());
        let payload = presenter(Some("https://cms.example.com")).page_detail(&about, Some("en"));
        assert_eq!(
            payload.hero_image.as_deref(),
            Some("https://cms.example.com/media/pages/about.jpg")
        );

        about.translations[0].hero_image = Some("media/pages/about-en.jpg".to_string());
        let payload = presenter(Some("https://cms.example.com")).page_detail(&about, Some("en"));
        assert_eq!(
            payload.hero_image.as_deref(),
            Some("https://cms.example.com/media/pages/about-en.jpg")
        );
    }

    #[test]
    fn test_page_payload_shape() {
        let about = page("about", &["en"]);
        let json = serde_json::to_value(presenter(None).page_detail(&about, None)).unwrap();

        assert_eq!(json["slug"], "about");
        assert_eq!(json["page_type"], "custom");
        assert_eq!(json["translation_missing"], false);
        assert_eq!(json["requested_locale"], serde_json::Value::Null);
        assert_eq!(json["seo_enabled"], true);
        assert!(json.get("meta_title").is_some());
        assert!(json.get("seo").is_none());
    }

    // ==================== Destination Tests ====================

    #[test]
    fn test_destination_payload() {
        let detail = destination_detail(&["en", "pt"]);
        let payload = presenter(Some("https://cms.example.com")).destination(&detail, Some("pt"));

        assert_eq!(payload.text.locale.as_deref(), Some("pt"));
        assert!(!payload.text.translation_missing);
        assert_eq!(payload.tags, vec!["historical", "unesco"]);
        assert_eq!(payload.translations.len(), 2);
        assert_eq!(payload.country.slug, "portugal");
        assert_eq!(payload.city.country.slug, "portugal");
        assert_eq!(payload.seo.jsonld_type, "TouristAttraction");
        assert_eq!(
            payload.hero_image.as_deref(),
            Some("https://cms.example.com/media/destinations/belem.jpg")
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["title"], "Belém [pt]");
        assert_eq!(json["category"], "landmark");
        assert_eq!(json["city"]["country"]["has_content"], true);
    }

    #[test]
    fn test_destination_untranslated_locale_falls_back() {
        let detail = destination_detail(&["en"]);
        let payload = presenter(None).destination(&detail, Some("es"));
        assert_eq!(payload.text.locale.as_deref(), Some("en"));
        assert!(payload.text.translation_missing);
    }

    // ==================== Blog Tests ====================

    #[test]
    fn test_blog_post_and_category_detail() {
        let now = Utc::now();
        let category = BlogCategory {
            id: 4,
            slug: "guides".to_string(),
            name: "Guides".to_string(),
            is_published: true,
            order: 0,
            created_at: now,
            updated_at: now,
        };
        let detail = BlogPostDetail {
            post: Localized::new(
                BlogPost {
                    id: 5,
                    category_id: 4,
                    slug: "lisbon-in-3-days".to_string(),
                    hero_image: None,
                    seo: SeoFields::with_jsonld_type("Article"),
                    is_published: true,
                    created_at: now,
                    updated_at: now,
                },
                vec![translation(1, "en", "Lisbon in 3 days")],
            ),
            category: BlogCategorySummary {
                category: category.clone(),
                posts_count: 1,
            },
        };

        let presenter = presenter(None);
        let payload = presenter.category_detail(&category, &[detail], Some("fr"));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["category"], json!({"id": 4, "name": "Guides", "slug": "guides"}));
        assert_eq!(json["posts"][0]["title"], "Lisbon in 3 days");
        assert_eq!(json["posts"][0]["translation_missing"], true);
        assert_eq!(json["posts"][0]["category"]["posts_count"], 1);
        assert_eq!(json["posts"][0]["jsonld_type"], "Article");
    }

    // ==================== Navigation Tests ====================

    #[test]
    fn test_nav_footer_and_homepage_payloads() {
        let presenter = presenter(Some("https://cms.example.com"));

        let item = NavigationItem {
            id: 1,
            locale: "fr".to_string(),
            label: "Blog".to_string(),
            target: NavTarget::BlogCategory("guides".to_string()),
            order: 2,
            is_active: true,
        };
        assert_eq!(
            serde_json::to_value(presenter.nav_item(&item)).unwrap(),
            json!({"label": "Blog", "href": "/fr/blog/category/guides/", "order": 2})
        );

        let block = FooterBlock {
            id: 1,
            locale: "fr".to_string(),
            title: "Contact".to_string(),
            body: "Write to us".to_string(),
            order: 1,
            links: vec![crate::content::FooterLink {
                id: 1,
                label: "Email".to_string(),
                url: "mailto:hi@example.com".to_string(),
                order: 0,
            }],
        };
        assert_eq!(
            serde_json::to_value(presenter.footer_block(&block)).unwrap(),
            json!({
                "title": "Contact",
                "body": "Write to us",
                "links": [{"label": "Email", "url": "mailto:hi@example.com"}],
                "order": 1
            })
        );

        let now = Utc::now();
        let card = HomepageCard {
            category: HomepageCategory {
                id: 1,
                slug: "beaches".to_string(),
                order: 3,
                seo: SeoFields::default(),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            translation: HomepageCategoryTranslation {
                id: 1,
                category_id: 1,
                locale: "fr".to_string(),
                title: "Plages".to_string(),
                description: "Sable".to_string(),
                image: Some("media/home/beach.jpg".to_string()),
                is_published: true,
            },
        };
        let json = serde_json::to_value(presenter.homepage_card(&card)).unwrap();
        assert_eq!(json["title"], "Plages");
        assert_eq!(json["image"], "https://cms.example.com/media/home/beach.jpg");
        assert_eq!(json["slug"], "beaches");
        assert_eq!(json["seo_enabled"], true);
    }
}
