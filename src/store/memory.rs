//! In-process content store.
//!
//! All tables live behind one `RwLock`; every operation takes the lock once
//! and never awaits while holding it.

use chrono::Utc;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::*;
use crate::content::{
    BlogPost, City, ContentEntity, Country, Destination, FooterLink, HomepageCategory,
    HomepageCategoryTranslation, Translation,
};
use crate::error::CmsError;

/// A translation together with the entity that owns it.
#[derive(Debug, Clone)]
struct OwnedTranslation {
    kind: TranslatableKind,
    owner_id: i64,
    translation: Translation,
}

#[derive(Debug, Default)]
struct MemoryData {
    next_id: i64,
    pages: Vec<Page>,
    countries: Vec<Country>,
    cities: Vec<City>,
    destinations: Vec<Destination>,
    blog_categories: Vec<BlogCategory>,
    blog_posts: Vec<BlogPost>,
    translations: Vec<OwnedTranslation>,
    homepage_categories: Vec<HomepageCategory>,
    homepage_translations: Vec<HomepageCategoryTranslation>,
    navigation: Vec<NavigationItem>,
    footer: Vec<FooterBlock>,
}

/// Content store kept entirely in memory. Cloning shares the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryData {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn translations_of(&self, kind: TranslatableKind, owner_id: i64) -> Vec<Translation> {
        self.translations
            .iter()
            .filter(|t| t.kind == kind && t.owner_id == owner_id)
            .map(|t| t.translation.clone())
            .collect()
    }

    fn localized<E: ContentEntity + Clone>(&self, entity: &E) -> Localized<E> {
        Localized::new(entity.clone(), self.translations_of(E::KIND, entity.id()))
    }

    fn country(&self, id: i64) -> Option<&Country> {
        self.countries.iter().find(|c| c.id == id)
    }

    fn city(&self, id: i64) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    fn category(&self, id: i64) -> Option<&BlogCategory> {
        self.blog_categories.iter().find(|c| c.id == id)
    }

    /// Published destinations of a city, assuming the city itself is visible.
    fn published_destinations_of(&self, city_id: i64) -> impl Iterator<Item = &Destination> {
        self.destinations
            .iter()
            .filter(move |d| d.city_id == city_id && d.is_published)
    }

    fn country_summary(&self, country: &Country) -> CountrySummary {
        let cities: Vec<&City> = self
            .cities
            .iter()
            .filter(|c| c.country_id == country.id && c.is_published)
            .collect();

        let destinations: Vec<&Destination> = cities
            .iter()
            .flat_map(|city| self.published_destinations_of(city.id))
            .collect();

        let stories_count = destinations
            .iter()
            .map(|d| {
                self.translations
                    .iter()
                    .filter(|t| t.kind == TranslatableKind::Destination && t.owner_id == d.id)
                    .count()
            })
            .sum::<usize>();

        CountrySummary {
            country: country.clone(),
            cities_count: cities.len() as i64,
            destinations_count: destinations.len() as i64,
            stories_count: stories_count as i64,
        }
    }

    fn city_summary(&self, city: &City) -> Option<CitySummary> {
        let country = self.country(city.country_id)?;
        Some(CitySummary {
            city: city.clone(),
            country: self.country_summary(country),
            destinations_count: self.published_destinations_of(city.id).count() as i64,
        })
    }

    fn destination_detail(&self, destination: &Destination) -> Option<DestinationDetail> {
        let city = self.city_summary(self.city(destination.city_id)?)?;
        Some(DestinationDetail {
            destination: self.localized(destination),
            city,
        })
    }

    fn category_summary(&self, category: &BlogCategory) -> BlogCategorySummary {
        let posts_count = self
            .blog_posts
            .iter()
            .filter(|p| p.category_id == category.id && p.is_published)
            .count();
        BlogCategorySummary {
            category: category.clone(),
            posts_count: posts_count as i64,
        }
    }

    fn post_detail(&self, post: &BlogPost) -> Option<BlogPostDetail> {
        let category = self.category(post.category_id)?;
        Some(BlogPostDetail {
            post: self.localized(post),
            category: self.category_summary(category),
        })
    }

    fn find_destination(&self, slug: &str, scope: &DestinationScope) -> Option<&Destination> {
        self.destinations
            .iter()
            .filter(|d| d.slug == slug)
            .filter(|d| {
                let city = self.city(d.city_id);
                let country = city.and_then(|c| self.country(c.country_id));
                match (country, city) {
                    (Some(country), Some(city)) => scope.matches(country, city),
                    _ => false,
                }
            })
            .min_by_key(|d| d.id)
    }

    fn find_city(&self, country_slug: Option<&str>, city_slug: &str) -> Option<&City> {
        self.cities
            .iter()
            .filter(|c| c.slug == city_slug)
            .filter(|c| match country_slug {
                Some(slug) => self.country(c.country_id).is_some_and(|country| country.slug == slug),
                None => true,
            })
            .min_by_key(|c| c.id)
    }

    fn resolve_category(&self, slug: Option<&str>) -> CmsResult<i64> {
        match slug {
            Some(slug) => self
                .blog_categories
                .iter()
                .find(|c| c.slug == slug)
                .map(|c| c.id)
                .ok_or_else(|| CmsError::not_found(format!("Blog category '{slug}'"))),
            None => self
                .blog_categories
                .iter()
                .min_by_key(|c| c.id)
                .map(|c| c.id)
                .ok_or_else(|| {
                    CmsError::validation(
                        "No blog categories available. Create at least one blog category first.",
                    )
                }),
        }
    }

    fn owner_exists(&self, kind: TranslatableKind, owner_id: i64) -> bool {
        match kind {
            TranslatableKind::Page => self.pages.iter().any(|p| p.id == owner_id),
            TranslatableKind::Destination => self.destinations.iter().any(|d| d.id == owner_id),
            TranslatableKind::BlogPost => self.blog_posts.iter().any(|p| p.id == owner_id),
        }
    }

    fn summary_of<E: ContentEntity + Clone>(&self, entity: &E) -> TranslatableSummary {
        self.localized(entity).summary()
    }

    fn drop_translations(&mut self, kind: TranslatableKind, owner_ids: &[i64]) {
        self.translations
            .retain(|t| !(t.kind == kind && owner_ids.contains(&t.owner_id)));
    }

    fn delete_destinations(&mut self, ids: &[i64]) {
        self.destinations.retain(|d| !ids.contains(&d.id));
        self.drop_translations(TranslatableKind::Destination, ids);
    }

    fn delete_cities(&mut self, ids: &[i64]) {
        let destinations: Vec<i64> = self
            .destinations
            .iter()
            .filter(|d| ids.contains(&d.city_id))
            .map(|d| d.id)
            .collect();
        self.delete_destinations(&destinations);
        self.cities.retain(|c| !ids.contains(&c.id));
    }

    fn sections_of(&self, kind: TranslatableKind) -> i64 {
        self.translations
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.translation.sections.len() as i64)
            .sum()
    }

    fn translations_count(&self, kind: TranslatableKind) -> i64 {
        self.translations.iter().filter(|t| t.kind == kind).count() as i64
    }
}

fn count<T>(items: &[T], pred: impl Fn(&T) -> bool) -> i64 {
    items.iter().filter(|item| pred(item)).count() as i64
}

impl ContentStore for MemoryStore {
    async fn find_page(&self, slug: &str) -> CmsResult<Option<Localized<Page>>> {
        let data = self.read();
        Ok(data
            .pages
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| data.localized(p)))
    }

    async fn find_destination(
        &self,
        slug: &str,
        scope: &DestinationScope,
    ) -> CmsResult<Option<DestinationDetail>> {
        let data = self.read();
        Ok(data
            .find_destination(slug, scope)
            .and_then(|d| data.destination_detail(d)))
    }

    async fn find_blog_post(&self, slug: &str) -> CmsResult<Option<BlogPostDetail>> {
        let data = self.read();
        Ok(data
            .blog_posts
            .iter()
            .find(|p| p.slug == slug)
            .and_then(|p| data.post_detail(p)))
    }

    async fn find_blog_category(&self, slug: &str) -> CmsResult<Option<BlogCategory>> {
        let data = self.read();
        Ok(data.blog_categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn find_translatable(
        &self,
        kind: TranslatableKind,
        slug: &str,
        scope: &DestinationScope,
    ) -> CmsResult<Option<TranslatableSummary>> {
        let data = self.read();
        let summary = match kind {
            TranslatableKind::Page => data
                .pages
                .iter()
                .find(|p| p.slug == slug)
                .map(|p| data.summary_of(p)),
            TranslatableKind::Destination => data
                .find_destination(slug, scope)
                .map(|d| data.summary_of(d)),
            TranslatableKind::BlogPost => data
                .blog_posts
                .iter()
                .find(|p| p.slug == slug)
                .map(|p| data.summary_of(p)),
        };
        Ok(summary)
    }

    async fn list_countries(&self) -> CmsResult<Vec<CountrySummary>> {
        let data = self.read();
        let mut countries: Vec<&Country> =
            data.countries.iter().filter(|c| c.is_published).collect();
        countries.sort_by(|a, b| (a.order, &a.name).cmp(&(b.order, &b.name)));
        Ok(countries
            .into_iter()
            .map(|c| data.country_summary(c))
            .collect())
    }

    async fn list_cities(&self, country: Option<&str>) -> CmsResult<Vec<CitySummary>> {
        let data = self.read();
        let mut cities: Vec<&City> = data
            .cities
            .iter()
            .filter(|c| c.is_published)
            .filter(|c| {
                data.country(c.country_id).is_some_and(|parent| {
                    parent.is_published && country.map_or(true, |slug| parent.slug == slug)
                })
            })
            .collect();
        cities.sort_by(|a, b| (a.order, &a.name).cmp(&(b.order, &b.name)));
        Ok(cities
            .into_iter()
            .filter_map(|c| data.city_summary(c))
            .collect())
    }

    async fn list_destinations(
        &self,
        scope: &DestinationScope,
    ) -> CmsResult<Vec<DestinationDetail>> {
        let data = self.read();
        let mut destinations: Vec<&Destination> = data
            .destinations
            .iter()
            .filter(|d| d.is_published)
            .filter(|d| {
                let city = data.city(d.city_id);
                let country = city.and_then(|c| data.country(c.country_id));
                match (country, city) {
                    (Some(country), Some(city)) => {
                        country.is_published && city.is_published && scope.matches(country, city)
                    }
                    _ => false,
                }
            })
            .collect();
        destinations.sort_by(|a, b| (&a.slug, a.id).cmp(&(&b.slug, b.id)));
        Ok(destinations
            .into_iter()
            .filter_map(|d| data.destination_detail(d))
            .collect())
    }

    async fn list_blog_categories(&self) -> CmsResult<Vec<BlogCategorySummary>> {
        let data = self.read();
        let mut categories: Vec<&BlogCategory> = data
            .blog_categories
            .iter()
            .filter(|c| c.is_published)
            .collect();
        categories.sort_by(|a, b| (a.order, &a.name).cmp(&(b.order, &b.name)));
        Ok(categories
            .into_iter()
            .map(|c| data.category_summary(c))
            .collect())
    }

    async fn list_blog_posts(&self, category: Option<&str>) -> CmsResult<Vec<BlogPostDetail>> {
        let data = self.read();
        let mut posts: Vec<&BlogPost> = data
            .blog_posts
            .iter()
            .filter(|p| p.is_published)
            .filter(|p| {
                data.category(p.category_id).is_some_and(|parent| {
                    parent.is_published && category.map_or(true, |slug| parent.slug == slug)
                })
            })
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(posts
            .into_iter()
            .filter_map(|p| data.post_detail(p))
            .collect())
    }

    async fn list_navigation(&self, locale: &str) -> CmsResult<Vec<NavigationItem>> {
        let data = self.read();
        let mut items: Vec<NavigationItem> = data
            .navigation
            .iter()
            .filter(|item| item.locale == locale && item.is_active)
            .cloned()
            .collect();
        items.sort_by(|a, b| (a.order, &a.label).cmp(&(b.order, &b.label)));
        Ok(items)
    }

    async fn list_footer(&self, locale: &str) -> CmsResult<Vec<FooterBlock>> {
        let data = self.read();
        let mut blocks: Vec<FooterBlock> = data
            .footer
            .iter()
            .filter(|block| block.locale == locale)
            .cloned()
            .collect();
        blocks.sort_by(|a, b| (a.order, &a.title).cmp(&(b.order, &b.title)));
        for block in &mut blocks {
            block.sort_links();
        }
        Ok(blocks)
    }

    async fn list_homepage_cards(&self, locale: &str) -> CmsResult<Vec<HomepageCard>> {
        let data = self.read();
        let mut cards: Vec<HomepageCard> = data
            .homepage_translations
            .iter()
            .filter(|t| t.locale == locale && t.is_published)
            .filter_map(|t| {
                let category = data
                    .homepage_categories
                    .iter()
                    .find(|c| c.id == t.category_id && c.is_active)?;
                Some(HomepageCard {
                    category: category.clone(),
                    translation: t.clone(),
                })
            })
            .collect();
        cards.sort_by(|a, b| {
            (a.category.order, &a.category.slug).cmp(&(b.category.order, &b.category.slug))
        });
        Ok(cards)
    }

    async fn translation_inventory(&self) -> CmsResult<Vec<TranslatableSummary>> {
        let data = self.read();
        let pages = data.pages.iter().map(|p| data.summary_of(p));
        let destinations = data.destinations.iter().map(|d| data.summary_of(d));
        let posts = data.blog_posts.iter().map(|p| data.summary_of(p));
        Ok(pages.chain(destinations).chain(posts).collect())
    }

    async fn content_stats(&self) -> CmsResult<ContentStats> {
        let data = self.read();
        Ok(ContentStats {
            pages: PageStats {
                total: data.pages.len() as i64,
                published: count(&data.pages, |p| p.is_published),
                translations: data.translations_count(TranslatableKind::Page),
                sections: data.sections_of(TranslatableKind::Page),
            },
            destinations: DestinationStats {
                countries: data.countries.len() as i64,
                countries_published: count(&data.countries, |c| c.is_published),
                cities: data.cities.len() as i64,
                cities_published: count(&data.cities, |c| c.is_published),
                destinations: data.destinations.len() as i64,
                destinations_published: count(&data.destinations, |d| d.is_published),
                translations: data.translations_count(TranslatableKind::Destination),
                sections: data.sections_of(TranslatableKind::Destination),
            },
            blog: BlogStats {
                categories: data.blog_categories.len() as i64,
                categories_published: count(&data.blog_categories, |c| c.is_published),
                posts: data.blog_posts.len() as i64,
                posts_published: count(&data.blog_posts, |p| p.is_published),
                translations: data.translations_count(TranslatableKind::BlogPost),
                sections: data.sections_of(TranslatableKind::BlogPost),
            },
            navigation: NavigationStats {
                menu_items: data.navigation.len() as i64,
                active_items: count(&data.navigation, |n| n.is_active),
            },
            footer: FooterStats {
                footer_blocks: data.footer.len() as i64,
                footer_links: data.footer.iter().map(|b| b.links.len() as i64).sum(),
            },
        })
    }

    async fn upsert_country(&self, input: &CountryInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let now = Utc::now();

        if let Some(country) = data.countries.iter_mut().find(|c| c.slug == input.slug) {
            country.name.clone_from(&input.name);
            country.short_description.clone_from(&input.short_description);
            country.hero_image.clone_from(&input.hero_image);
            country.seo = input.seo.clone();
            country.is_published = input.is_published;
            country.order = input.order;
            country.updated_at = now;
            return Ok(Upserted::updated(country.id));
        }

        let id = data.next_id();
        data.countries.push(Country {
            id,
            slug: input.slug.clone(),
            name: input.name.clone(),
            short_description: input.short_description.clone(),
            hero_image: input.hero_image.clone(),
            seo: input.seo.clone(),
            is_published: input.is_published,
            order: input.order,
            created_at: now,
            updated_at: now,
        });
        Ok(Upserted::created(id))
    }

    async fn upsert_city(&self, input: &CityInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let now = Utc::now();

        let country_id = data
            .countries
            .iter()
            .find(|c| c.slug == input.country_slug)
            .map(|c| c.id)
            .ok_or_else(|| CmsError::not_found(format!("Country '{}'", input.country_slug)))?;

        if let Some(city) = data
            .cities
            .iter_mut()
            .find(|c| c.country_id == country_id && c.slug == input.slug)
        {
            city.name.clone_from(&input.name);
            city.short_description.clone_from(&input.short_description);
            city.hero_image.clone_from(&input.hero_image);
            city.seo = input.seo.clone();
            city.is_published = input.is_published;
            city.order = input.order;
            city.updated_at = now;
            return Ok(Upserted::updated(city.id));
        }

        let id = data.next_id();
        data.cities.push(City {
            id,
            country_id,
            slug: input.slug.clone(),
            name: input.name.clone(),
            short_description: input.short_description.clone(),
            hero_image: input.hero_image.clone(),
            seo: input.seo.clone(),
            is_published: input.is_published,
            order: input.order,
            created_at: now,
            updated_at: now,
        });
        Ok(Upserted::created(id))
    }

    async fn upsert_destination(&self, input: &DestinationInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let now = Utc::now();

        let city_id = data
            .find_city(input.country_slug.as_deref(), &input.city_slug)
            .map(|c| c.id)
            .ok_or_else(|| match &input.country_slug {
                Some(country) => CmsError::not_found(format!(
                    "City '{}' in country '{}'",
                    input.city_slug, country
                )),
                None => CmsError::not_found(format!("City '{}'", input.city_slug)),
            })?;

        if let Some(destination) = data
            .destinations
            .iter_mut()
            .find(|d| d.city_id == city_id && d.slug == input.slug)
        {
            destination.category = input.category;
            destination.tags.clone_from(&input.tags);
            destination.seo = input.seo.clone();
            destination.is_featured = input.is_featured;
            destination.is_published = input.is_published;
            destination.hero_image.clone_from(&input.hero_image);
            destination.updated_at = now;
            return Ok(Upserted::updated(destination.id));
        }

        let id = data.next_id();
        data.destinations.push(Destination {
            id,
            city_id,
            slug: input.slug.clone(),
            category: input.category,
            tags: input.tags.clone(),
            seo: input.seo.clone(),
            is_featured: input.is_featured,
            is_published: input.is_published,
            hero_image: input.hero_image.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(Upserted::created(id))
    }

    async fn ensure_page(&self, input: &PageInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        if let Some(page) = data.pages.iter().find(|p| p.slug == input.slug) {
            return Ok(Upserted::updated(page.id));
        }

        let now = Utc::now();
        let id = data.next_id();
        data.pages.push(Page {
            id,
            slug: input.slug.clone(),
            page_type: input.page_type,
            is_published: input.is_published,
            hero_image: input.hero_image.clone(),
            created_at: now,
            updated_at: now,
        });
        Ok(Upserted::created(id))
    }

    async fn upsert_blog_category(&self, input: &BlogCategoryInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let now = Utc::now();

        if let Some(category) = data.blog_categories.iter_mut().find(|c| c.slug == input.slug) {
            category.name.clone_from(&input.name);
            category.is_published = input.is_published;
            category.order = input.order;
            category.updated_at = now;
            return Ok(Upserted::updated(category.id));
        }

        let id = data.next_id();
        data.blog_categories.push(BlogCategory {
            id,
            slug: input.slug.clone(),
            name: input.name.clone(),
            is_published: input.is_published,
            order: input.order,
            created_at: now,
            updated_at: now,
        });
        Ok(Upserted::created(id))
    }

    async fn upsert_blog_post(&self, input: &BlogPostInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let now = Utc::now();
        let category_id = data.resolve_category(input.category_slug.as_deref())?;

        if let Some(post) = data.blog_posts.iter_mut().find(|p| p.slug == input.slug) {
            post.category_id = category_id;
            post.hero_image.clone_from(&input.hero_image);
            post.seo = input.seo.clone();
            post.is_published = input.is_published;
            post.updated_at = now;
            return Ok(Upserted::updated(post.id));
        }

        let id = data.next_id();
        data.blog_posts.push(BlogPost {
            id,
            category_id,
            slug: input.slug.clone(),
            hero_image: input.hero_image.clone(),
            seo: input.seo.clone(),
            is_published: input.is_published,
            created_at: now,
            updated_at: now,
        });
        Ok(Upserted::created(id))
    }

    async fn ensure_blog_post(&self, input: &BlogPostInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let category_id = data.resolve_category(input.category_slug.as_deref())?;
        if let Some(post) = data.blog_posts.iter().find(|p| p.slug == input.slug) {
            return Ok(Upserted::updated(post.id));
        }

        let now = Utc::now();
        let id = data.next_id();
        data.blog_posts.push(BlogPost {
            id,
            category_id,
            slug: input.slug.clone(),
            hero_image: input.hero_image.clone(),
            seo: input.seo.clone(),
            is_published: input.is_published,
            created_at: now,
            updated_at: now,
        });
        Ok(Upserted::created(id))
    }

    async fn upsert_translation(
        &self,
        kind: TranslatableKind,
        owner_id: i64,
        locale: Locale,
        patch: &TranslationPatch,
        default_title: &str,
    ) -> CmsResult<Upserted> {
        let mut data = self.write();
        if !data.owner_exists(kind, owner_id) {
            return Err(CmsError::not_found(format!("{kind} #{owner_id}")));
        }

        let sections: Option<Vec<_>> = patch.sections.as_ref().map(|sections| {
            sections
                .iter()
                .cloned()
                .map(|section| {
                    let id = data.next_id();
                    section.into_section(id)
                })
                .collect()
        });
        let slides: Option<Vec<_>> = patch.hero_slides.as_ref().map(|slides| {
            slides
                .iter()
                .cloned()
                .map(|slide| {
                    let id = data.next_id();
                    slide.into_slide(id)
                })
                .collect()
        });

        let existing = data.translations.iter().position(|t| {
            t.kind == kind && t.owner_id == owner_id && t.translation.locale == locale.code()
        });

        let (upserted, index) = match existing {
            Some(index) => {
                let translation = &mut data.translations[index].translation;
                patch.apply_to(translation);
                (Upserted::updated(translation.id), index)
            }
            None => {
                let id = data.next_id();
                data.translations.push(OwnedTranslation {
                    kind,
                    owner_id,
                    translation: patch.new_translation(id, locale, default_title),
                });
                (Upserted::created(id), data.translations.len() - 1)
            }
        };

        let translation = &mut data.translations[index].translation;
        if let Some(sections) = sections {
            translation.sections = sections;
        }
        if let Some(slides) = slides {
            translation.hero_slides = slides;
        }
        translation.sort_children();
        Ok(upserted)
    }

    async fn upsert_homepage_category(&self, input: &HomepageCategoryInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let now = Utc::now();

        let upserted = match data
            .homepage_categories
            .iter_mut()
            .find(|c| c.slug == input.slug)
        {
            Some(category) => {
                category.order = input.order;
                category.seo = input.seo.clone();
                category.is_active = input.is_active;
                category.updated_at = now;
                Upserted::updated(category.id)
            }
            None => {
                let id = data.next_id();
                data.homepage_categories.push(HomepageCategory {
                    id,
                    slug: input.slug.clone(),
                    order: input.order,
                    seo: input.seo.clone(),
                    is_active: input.is_active,
                    created_at: now,
                    updated_at: now,
                });
                Upserted::created(id)
            }
        };

        if let Some(translation) = &input.translation {
            let category_id = upserted.id;
            let locale = translation.locale.code();
            match data
                .homepage_translations
                .iter_mut()
                .find(|t| t.category_id == category_id && t.locale == locale)
            {
                Some(existing) => {
                    existing.title.clone_from(&translation.title);
                    existing.description.clone_from(&translation.description);
                    existing.image.clone_from(&translation.image);
                    existing.is_published = translation.is_published;
                }
                None => {
                    let id = data.next_id();
                    data.homepage_translations.push(HomepageCategoryTranslation {
                        id,
                        category_id,
                        locale: locale.to_string(),
                        title: translation.title.clone(),
                        description: translation.description.clone(),
                        image: translation.image.clone(),
                        is_published: translation.is_published,
                    });
                }
            }
        }

        Ok(upserted)
    }

    async fn upsert_navigation_item(&self, input: &NavigationItemInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let locale = input.locale.code();

        if let Some(item) = data
            .navigation
            .iter_mut()
            .find(|n| n.locale == locale && n.label == input.label)
        {
            item.target = input.target.clone();
            item.order = input.order;
            item.is_active = input.is_active;
            return Ok(Upserted::updated(item.id));
        }

        let id = data.next_id();
        data.navigation.push(NavigationItem {
            id,
            locale: locale.to_string(),
            label: input.label.clone(),
            target: input.target.clone(),
            order: input.order,
            is_active: input.is_active,
        });
        Ok(Upserted::created(id))
    }

    async fn upsert_footer_block(&self, input: &FooterBlockInput) -> CmsResult<Upserted> {
        let mut data = self.write();
        let locale = input.locale.code();

        let links: Vec<FooterLink> = input
            .links
            .iter()
            .map(|link| FooterLink {
                id: data.next_id(),
                label: link.label.clone(),
                url: link.url.clone(),
                order: link.order,
            })
            .collect();

        if let Some(block) = data
            .footer
            .iter_mut()
            .find(|b| b.locale == locale && b.title == input.title)
        {
            block.body.clone_from(&input.body);
            block.order = input.order;
            block.links = links;
            block.sort_links();
            return Ok(Upserted::updated(block.id));
        }

        let id = data.next_id();
        let mut block = FooterBlock {
            id,
            locale: locale.to_string(),
            title: input.title.clone(),
            body: input.body.clone(),
            order: input.order,
            links,
        };
        block.sort_links();
        data.footer.push(block);
        Ok(Upserted::created(id))
    }

    async fn delete(&self, kind: ContentKind, slug: &str) -> CmsResult<bool> {
        let mut data = self.write();

        match kind {
            ContentKind::Page => {
                let Some(id) = data.pages.iter().find(|p| p.slug == slug).map(|p| p.id) else {
                    return Ok(false);
                };
                data.pages.retain(|p| p.id != id);
                data.drop_translations(TranslatableKind::Page, &[id]);
            }
            ContentKind::Destination => {
                let Some(id) = data
                    .find_destination(slug, &DestinationScope::default())
                    .map(|d| d.id)
                else {
                    return Ok(false);
                };
                data.delete_destinations(&[id]);
            }
            ContentKind::BlogPost => {
                let Some(id) = data.blog_posts.iter().find(|p| p.slug == slug).map(|p| p.id)
                else {
                    return Ok(false);
                };
                data.blog_posts.retain(|p| p.id != id);
                data.drop_translations(TranslatableKind::BlogPost, &[id]);
            }
            ContentKind::Country => {
                let Some(id) = data.countries.iter().find(|c| c.slug == slug).map(|c| c.id)
                else {
                    return Ok(false);
                };
                let cities: Vec<i64> = data
                    .cities
                    .iter()
                    .filter(|c| c.country_id == id)
                    .map(|c| c.id)
                    .collect();
                data.delete_cities(&cities);
                data.countries.retain(|c| c.id != id);
            }
            ContentKind::City => {
                let Some(id) = data.find_city(None, slug).map(|c| c.id) else {
                    return Ok(false);
                };
                data.delete_cities(&[id]);
            }
            ContentKind::BlogCategory => {
                let Some(id) = data
                    .blog_categories
                    .iter()
                    .find(|c| c.slug == slug)
                    .map(|c| c.id)
                else {
                    return Ok(false);
                };
                let posts: Vec<i64> = data
                    .blog_posts
                    .iter()
                    .filter(|p| p.category_id == id)
                    .map(|p| p.id)
                    .collect();
                data.blog_posts.retain(|p| p.category_id != id);
                data.drop_translations(TranslatableKind::BlogPost, &posts);
                data.blog_categories.retain(|c| c.id != id);
            }
            ContentKind::HomepageCategory => {
                let Some(id) = data
                    .homepage_categories
                    .iter()
                    .find(|c| c.slug == slug)
                    .map(|c| c.id)
                else {
                    return Ok(false);
                };
                data.homepage_categories.retain(|c| c.id != id);
                data.homepage_translations.retain(|t| t.category_id != id);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{DestinationCategory, NavTarget, PageType, SectionType, SeoFields};
    use crate::i18n::LocaleRegistry;

    fn locale(code: &str) -> Locale {
        LocaleRegistry::standard().parse(code).unwrap()
    }

    fn country(slug: &str, published: bool) -> CountryInput {
        CountryInput {
            slug: slug.to_string(),
            name: title_from_slug(slug),
            short_description: String::new(),
            hero_image: None,
            seo: SeoFields::with_jsonld_type("Country"),
            is_published: published,
            order: 0,
        }
    }

    fn city(country: &str, slug: &str, published: bool) -> CityInput {
        CityInput {
            country_slug: country.to_string(),
            slug: slug.to_string(),
            name: title_from_slug(slug),
            short_description: String::new(),
            hero_image: None,
            seo: SeoFields::with_jsonld_type("City"),
            is_published: published,
            order: 0,
        }
    }

    fn destination(country: &str, city: &str, slug: &str, published: bool) -> DestinationInput {
        DestinationInput {
            country_slug: Some(country.to_string()),
            city_slug: city.to_string(),
            slug: slug.to_string(),
            category: DestinationCategory::Landmark,
            tags: String::new(),
            seo: SeoFields::default(),
            is_featured: false,
            is_published: published,
            hero_image: None,
        }
    }

    fn page(slug: &str) -> PageInput {
        PageInput {
            slug: slug.to_string(),
            page_type: PageType::Custom,
            is_published: true,
            hero_image: None,
        }
    }

    fn titled(title: &str) -> TranslationPatch {
        TranslationPatch {
            title: Some(title.to_string()),
            ..TranslationPatch::default()
        }
    }

    async fn seeded_geography(store: &MemoryStore) {
        store.upsert_country(&country("portugal", true)).await.unwrap();
        store.upsert_country(&country("spain", true)).await.unwrap();
        store.upsert_city(&city("portugal", "lisbon", true)).await.unwrap();
        store.upsert_city(&city("portugal", "porto", false)).await.unwrap();
        store.upsert_city(&city("spain", "madrid", true)).await.unwrap();
        store
            .upsert_destination(&destination("portugal", "lisbon", "belem-tower", true))
            .await
            .unwrap();
        store
            .upsert_destination(&destination("portugal", "porto", "ribeira", true))
            .await
            .unwrap();
        store
            .upsert_destination(&destination("spain", "madrid", "prado", true))
            .await
            .unwrap();
    }

    // ==================== Upsert Tests ====================

    #[tokio::test]
    async fn test_upsert_country_created_then_updated() {
        let store = MemoryStore::new();
        let first = store.upsert_country(&country("portugal", true)).await.unwrap();
        let mut changed = country("portugal", true);
        changed.name = "Portuguese Republic".to_string();
        let second = store.upsert_country(&changed).await.unwrap();

        assert!(first.is_created());
        assert_eq!(second, Upserted::updated(first.id));
        let countries = store.list_countries().await.unwrap();
        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].country.name, "Portuguese Republic");
    }

    #[tokio::test]
    async fn test_upsert_city_requires_country() {
        let store = MemoryStore::new();
        let err = store.upsert_city(&city("atlantis", "x", true)).await.unwrap_err();
        assert_eq!(err.to_string(), "Country 'atlantis' not found");
    }

    #[tokio::test]
    async fn test_destination_slug_unique_per_city_only() {
        let store = MemoryStore::new();
        seeded_geography(&store).await;
        let other = store
            .upsert_destination(&destination("spain", "madrid", "belem-tower", true))
            .await
            .unwrap();
        assert!(other.is_created());

        let scoped = store
            .find_destination("belem-tower", &DestinationScope::new(Some("spain"), None))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scoped.city.city.slug, "madrid");

        let unscoped = store
            .find_destination("belem-tower", &DestinationScope::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unscoped.city.city.slug, "lisbon");
    }

    #[tokio::test]
    async fn test_ensure_page_leaves_existing_page() {
        let store = MemoryStore::new();
        let created = store.ensure_page(&page("about")).await.unwrap();
        let mut unpublished = page("about");
        unpublished.is_published = false;
        let again = store.ensure_page(&unpublished).await.unwrap();

        assert_eq!(again, Upserted::updated(created.id));
        let found = store.find_page("about").await.unwrap().unwrap();
        assert!(found.entity.is_published);
    }

    // ==================== Translation Tests ====================

    #[tokio::test]
    async fn test_upsert_translation_patch_semantics() {
        let store = MemoryStore::new();
        let page_id = store.ensure_page(&page("about")).await.unwrap().id;

        let mut patch = titled("About us");
        patch.body = Some("We travel.".to_string());
        let created = store
            .upsert_translation(TranslatableKind::Page, page_id, locale("en"), &patch, "About")
            .await
            .unwrap();
        assert!(created.is_created());

        let updated = store
            .upsert_translation(
                TranslatableKind::Page,
                page_id,
                locale("en"),
                &titled("About Us!"),
                "About",
            )
            .await
            .unwrap();
        assert_eq!(updated, Upserted::updated(created.id));

        let found = store.find_page("about").await.unwrap().unwrap();
        assert_eq!(found.translations.len(), 1);
        assert_eq!(found.translations[0].title, "About Us!");
        assert_eq!(found.translations[0].body, "We travel.");
    }

    #[tokio::test]
    async fn test_upsert_translation_replaces_sections_in_order() {
        let store = MemoryStore::new();
        let page_id = store.ensure_page(&page("about")).await.unwrap().id;
        let section = |order: i32, body: &str| SectionInput {
            section_type: SectionType::Text,
            order,
            title: String::new(),
            body: body.to_string(),
            image: None,
            cta_label: String::new(),
            cta_url: String::new(),
        };

        let mut patch = titled("About");
        patch.sections = Some(vec![section(2, "second"), section(1, "first")]);
        store
            .upsert_translation(TranslatableKind::Page, page_id, locale("fr"), &patch, "About")
            .await
            .unwrap();

        let found = store.find_page("about").await.unwrap().unwrap();
        let bodies: Vec<_> = found.translations[0]
            .sections
            .iter()
            .map(|s| s.body.as_str())
            .collect();
        assert_eq!(bodies, vec!["first", "second"]);

        let mut replace = TranslationPatch::default();
        replace.sections = Some(vec![section(0, "only")]);
        store
            .upsert_translation(TranslatableKind::Page, page_id, locale("fr"), &replace, "About")
            .await
            .unwrap();
        let found = store.find_page("about").await.unwrap().unwrap();
        assert_eq!(found.translations[0].sections.len(), 1);
        assert_eq!(found.translations[0].title, "About");
    }

    #[tokio::test]
    async fn test_upsert_translation_unknown_owner() {
        let store = MemoryStore::new();
        let result = store
            .upsert_translation(
                TranslatableKind::BlogPost,
                99,
                locale("en"),
                &TranslationPatch::default(),
                "Ghost",
            )
            .await;
        assert!(matches!(result, Err(CmsError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_translatable_reports_locales() {
        let store = MemoryStore::new();
        let page_id = store.ensure_page(&page("about")).await.unwrap().id;
        for code in ["fr", "en"] {
            store
                .upsert_translation(TranslatableKind::Page, page_id, locale(code), &titled("x"), "x")
                .await
                .unwrap();
        }

        let summary = store
            .find_translatable(TranslatableKind::Page, "about", &DestinationScope::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.locales, vec!["en", "fr"]);
        assert!(store
            .find_translatable(TranslatableKind::BlogPost, "about", &DestinationScope::default())
            .await
            .unwrap()
            .is_none());
    }

    // ==================== Listing Tests ====================

    #[tokio::test]
    async fn test_destination_listing_applies_publish_cascade() {
        let store = MemoryStore::new();
        seeded_geography(&store).await;

        let listed = store
            .list_destinations(&DestinationScope::default())
            .await
            .unwrap();
        let slugs: Vec<_> = listed
            .iter()
            .map(|d| d.destination.entity.slug.as_str())
            .collect();
        // ribeira is published but its city (porto) is not
        assert_eq!(slugs, vec!["belem-tower", "prado"]);

        let in_spain = store
            .list_destinations(&DestinationScope::new(Some("spain"), None))
            .await
            .unwrap();
        assert_eq!(in_spain.len(), 1);
    }

    #[tokio::test]
    async fn test_unpublished_country_hides_cities_and_destinations() {
        let store = MemoryStore::new();
        seeded_geography(&store).await;
        store.upsert_country(&country("spain", false)).await.unwrap();

        let cities = store.list_cities(None).await.unwrap();
        let names: Vec<_> = cities.iter().map(|c| c.city.slug.as_str()).collect();
        assert_eq!(names, vec!["lisbon"]);
        assert!(store
            .list_destinations(&DestinationScope::new(None, Some("madrid")))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_country_counts() {
        let store = MemoryStore::new();
        seeded_geography(&store).await;
        let belem = store
            .find_translatable(
                TranslatableKind::Destination,
                "belem-tower",
                &DestinationScope::default(),
            )
            .await
            .unwrap()
            .unwrap();
        store
            .upsert_translation(
                TranslatableKind::Destination,
                belem.id,
                locale("en"),
                &titled("Belém Tower"),
                "Belem Tower",
            )
            .await
            .unwrap();

        let countries = store.list_countries().await.unwrap();
        let portugal = countries
            .iter()
            .find(|c| c.country.slug == "portugal")
            .unwrap();
        assert_eq!(portugal.cities_count, 1);
        assert_eq!(portugal.destinations_count, 1);
        assert_eq!(portugal.stories_count, 1);
        assert!(portugal.has_content());
    }

    #[tokio::test]
    async fn test_navigation_is_locale_exact_and_sorted() {
        let store = MemoryStore::new();
        let item = |code: &str, label: &str, order: i32, active: bool| NavigationItemInput {
            locale: locale(code),
            label: label.to_string(),
            target: NavTarget::Page(label.to_lowercase()),
            order,
            is_active: active,
        };
        store.upsert_navigation_item(&item("en", "Contact", 2, true)).await.unwrap();
        store.upsert_navigation_item(&item("en", "Blog", 1, true)).await.unwrap();
        store.upsert_navigation_item(&item("en", "About", 1, true)).await.unwrap();
        store.upsert_navigation_item(&item("en", "Hidden", 0, false)).await.unwrap();
        store.upsert_navigation_item(&item("fr", "Blog", 0, true)).await.unwrap();

        let en = store.list_navigation("en").await.unwrap();
        let labels: Vec<_> = en.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["About", "Blog", "Contact"]);
        assert!(store.list_navigation("es").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_homepage_cards_skip_inactive_and_untranslated() {
        let store = MemoryStore::new();
        let category = |slug: &str, order: i32, active: bool, code: Option<&str>| {
            HomepageCategoryInput {
                slug: slug.to_string(),
                order,
                seo: SeoFields::default(),
                is_active: active,
                translation: code.map(|code| HomepageTranslationInput {
                    locale: locale(code),
                    title: title_from_slug(slug),
                    description: String::new(),
                    image: None,
                    is_published: true,
                }),
            }
        };
        store.upsert_homepage_category(&category("beaches", 2, true, Some("en"))).await.unwrap();
        store.upsert_homepage_category(&category("museums", 1, true, Some("en"))).await.unwrap();
        store.upsert_homepage_category(&category("nightlife", 0, false, Some("en"))).await.unwrap();
        store.upsert_homepage_category(&category("parks", 0, true, Some("fr"))).await.unwrap();

        let cards = store.list_homepage_cards("en").await.unwrap();
        let slugs: Vec<_> = cards.iter().map(|c| c.category.slug.as_str()).collect();
        assert_eq!(slugs, vec!["museums", "beaches"]);
    }

    // ==================== Delete Tests ====================

    #[tokio::test]
    async fn test_delete_country_cascades() {
        let store = MemoryStore::new();
        seeded_geography(&store).await;

        assert!(store.delete(ContentKind::Country, "portugal").await.unwrap());
        assert!(!store.delete(ContentKind::Country, "portugal").await.unwrap());

        let stats = store.content_stats().await.unwrap();
        assert_eq!(stats.destinations.countries, 1);
        assert_eq!(stats.destinations.cities, 1);
        assert_eq!(stats.destinations.destinations, 1);
    }

    #[tokio::test]
    async fn test_delete_page_removes_translations() {
        let store = MemoryStore::new();
        let page_id = store.ensure_page(&page("about")).await.unwrap().id;
        store
            .upsert_translation(TranslatableKind::Page, page_id, locale("en"), &titled("About"), "About")
            .await
            .unwrap();

        assert!(store.delete(ContentKind::Page, "about").await.unwrap());
        let stats = store.content_stats().await.unwrap();
        assert_eq!(stats.pages.total, 0);
        assert_eq!(stats.pages.translations, 0);
    }
}
