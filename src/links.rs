//! Cross-locale link resolution for the language switcher.
//!
//! Given the content a visitor is looking at and the locale they switch to,
//! [`resolve_link`] computes where to send them: the same content in the
//! target locale when it is translated, otherwise the nearest section index.
//!
//! The resolver is total. Bad input and store failures both come back as a
//! [`LinkResolution`] with `found = false`; nothing is propagated as an error.

use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, warn};

use crate::content::{Translatable, TranslatableKind};
use crate::error::CmsResult;
use crate::i18n::LocaleRegistry;
use crate::store::{ContentStore, DestinationScope};

/// Query accepted by the link resolver.
///
/// `country` and `city` describe where a destination sits in the hierarchy.
/// When either is given, `current_path` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRequest {
    pub content_type: String,
    pub slug: String,
    pub locale: Option<String>,
    pub current_path: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl LinkRequest {
    /// Build a request from raw query pairs.
    ///
    /// Never fails: a repeated parameter keeps its last value and unknown
    /// parameters are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut request = LinkRequest::default();
        for (key, value) in pairs {
            match key.as_str() {
                "content_type" => request.content_type = value,
                "slug" => request.slug = value,
                "locale" => request.locale = Some(value),
                "current_path" => request.current_path = Some(value),
                "country" => request.country = Some(value),
                "city" => request.city = Some(value),
                _ => {}
            }
        }
        request
    }
}

/// Why a link resolved the way it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkReason {
    MissingContentType,
    MissingSlug,
    InvalidLocale,
    StaticPage,
    HomePage,
    PageTranslated,
    PageTranslationMissing,
    PageNotFound,
    DestinationTranslated,
    CityPage,
    CountryPage,
    DestinationsIndex,
    BlogPostTranslated,
    BlogPostTranslationMissing,
    BlogPostNotFound,
    BlogCategory,
    BlogCategoryNotFound,
    BlogIndex,
    UnknownContentType,
    /// A lookup failed; carries the error text.
    Error(String),
}

impl LinkReason {
    fn code(&self) -> &'static str {
        match self {
            LinkReason::MissingContentType => "missing_content_type",
            LinkReason::MissingSlug => "missing_slug",
            LinkReason::InvalidLocale => "invalid_locale",
            LinkReason::StaticPage => "static_page",
            LinkReason::HomePage => "home_page",
            LinkReason::PageTranslated => "page_translated",
            LinkReason::PageTranslationMissing => "page_translation_missing",
            LinkReason::PageNotFound => "page_not_found",
            LinkReason::DestinationTranslated => "destination_translated",
            LinkReason::CityPage => "city_page",
            LinkReason::CountryPage => "country_page",
            LinkReason::DestinationsIndex => "destinations_index",
            LinkReason::BlogPostTranslated => "blog_post_translated",
            LinkReason::BlogPostTranslationMissing => "blog_post_translation_missing",
            LinkReason::BlogPostNotFound => "blog_post_not_found",
            LinkReason::BlogCategory => "blog_category",
            LinkReason::BlogCategoryNotFound => "blog_category_not_found",
            LinkReason::BlogIndex => "blog_index",
            LinkReason::UnknownContentType => "unknown_content_type",
            LinkReason::Error(_) => "error",
        }
    }
}

impl fmt::Display for LinkReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkReason::Error(message) => write!(f, "error: {}", message),
            other => f.write_str(other.code()),
        }
    }
}

impl Serialize for LinkReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of a link resolution, serialized as `{found, url, reason}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkResolution {
    pub found: bool,
    pub url: String,
    pub reason: LinkReason,
}

impl LinkResolution {
    fn found(url: String, reason: LinkReason) -> Self {
        Self {
            found: true,
            url,
            reason,
        }
    }

    fn missing(url: String, reason: LinkReason) -> Self {
        Self {
            found: false,
            url,
            reason,
        }
    }

    /// Soft response for a lookup that failed in the store.
    pub fn soft_failure(locale: &str, error: impl fmt::Display) -> Self {
        Self::missing(format!("/{}/", locale), LinkReason::Error(error.to_string()))
    }
}

/// Position inside the destinations section.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DestinationLocation {
    Destination {
        scope: DestinationScope,
        slug: String,
    },
    City {
        country: String,
        city: String,
    },
    Country {
        country: String,
    },
    Index,
}

impl DestinationLocation {
    /// Structured hierarchy parameters take priority over path parsing.
    fn from_request(request: &LinkRequest, slug: &str) -> Self {
        let scope = DestinationScope::new(request.country.as_deref(), request.city.as_deref());
        if scope.country.is_some() || scope.city.is_some() {
            return DestinationLocation::Destination {
                scope,
                slug: slug.to_string(),
            };
        }
        request
            .current_path
            .as_deref()
            .map(Self::from_path)
            .unwrap_or(DestinationLocation::Index)
    }

    /// Recover the hierarchy from `/{locale}/destinations/{country}/{city}/{destination}`
    /// or one of its prefixes. Anything else is the index.
    fn from_path(path: &str) -> Self {
        let parts: Vec<&str> = path.trim().trim_matches('/').split('/').collect();
        if parts.len() < 2 || parts[1] != "destinations" {
            return DestinationLocation::Index;
        }

        match &parts[2..] {
            [country, city, destination, ..] => DestinationLocation::Destination {
                scope: DestinationScope::new(Some(*country), Some(*city)),
                slug: destination.to_string(),
            },
            [country, city] => DestinationLocation::City {
                country: country.to_string(),
                city: city.to_string(),
            },
            [country] => DestinationLocation::Country {
                country: country.to_string(),
            },
            [] => DestinationLocation::Index,
        }
    }
}

/// Resolve where the locale switcher should send the visitor.
///
/// Parameters are trimmed; the locale defaults to the registry fallback.
/// Validation short-circuits in this order: content type, slug (not needed
/// for `home`), then locale.
pub async fn resolve_link<S: ContentStore>(
    store: &S,
    registry: &LocaleRegistry,
    request: &LinkRequest,
) -> LinkResolution {
    let content_type = request.content_type.trim();
    let slug = request.slug.trim();
    let locale = request
        .locale
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(registry.fallback().code);

    if content_type.is_empty() {
        return LinkResolution::missing(format!("/{}", locale), LinkReason::MissingContentType);
    }

    if slug.is_empty() && content_type != "home" {
        return LinkResolution::missing(format!("/{}", locale), LinkReason::MissingSlug);
    }

    if !registry.is_supported(locale) {
        return LinkResolution::missing(
            format!("/{}", registry.fallback().code),
            LinkReason::InvalidLocale,
        );
    }

    match lookup(store, content_type, slug, locale, request).await {
        Ok(resolution) => {
            debug!(
                "Resolved {} '{}' to {} ({})",
                content_type, slug, resolution.url, resolution.reason
            );
            resolution
        }
        Err(e) => {
            warn!(
                "Link resolution for {} '{}' in '{}' failed: {}",
                content_type, slug, locale, e
            );
            LinkResolution::soft_failure(locale, e)
        }
    }
}

async fn lookup<S: ContentStore>(
    store: &S,
    content_type: &str,
    slug: &str,
    locale: &str,
    request: &LinkRequest,
) -> CmsResult<LinkResolution> {
    let resolution = match content_type {
        "static" => LinkResolution::found(format!("/{}/{}/", locale, slug), LinkReason::StaticPage),

        "home" => LinkResolution::found(format!("/{}/", locale), LinkReason::HomePage),

        "page" => {
            let page = store
                .find_translatable(TranslatableKind::Page, slug, &DestinationScope::default())
                .await?;
            match page {
                Some(page) if page.has_locale(locale) => LinkResolution::found(
                    format!("/{}/{}/", locale, page.slug),
                    LinkReason::PageTranslated,
                ),
                Some(_) => LinkResolution::missing(
                    format!("/{}/", locale),
                    LinkReason::PageTranslationMissing,
                ),
                None => LinkResolution::missing(format!("/{}/", locale), LinkReason::PageNotFound),
            }
        }

        "destination" => {
            resolve_destination(store, DestinationLocation::from_request(request, slug), locale)
                .await?
        }

        "blog_post" => {
            let post = store
                .find_translatable(TranslatableKind::BlogPost, slug, &DestinationScope::default())
                .await?;
            match post {
                Some(post) if post.has_locale(locale) => LinkResolution::found(
                    format!("/{}/blog/{}/", locale, post.slug),
                    LinkReason::BlogPostTranslated,
                ),
                Some(_) => LinkResolution::missing(
                    format!("/{}/blog/", locale),
                    LinkReason::BlogPostTranslationMissing,
                ),
                None => {
                    LinkResolution::missing(format!("/{}/blog/", locale), LinkReason::BlogPostNotFound)
                }
            }
        }

        // Categories are locale-invariant: existence alone decides.
        "blog_category" => match store.find_blog_category(slug).await? {
            Some(category) => LinkResolution::found(
                format!("/{}/blog/category/{}/", locale, category.slug),
                LinkReason::BlogCategory,
            ),
            None => LinkResolution::missing(
                format!("/{}/blog/", locale),
                LinkReason::BlogCategoryNotFound,
            ),
        },

        "blog" => LinkResolution::found(format!("/{}/blog/", locale), LinkReason::BlogIndex),

        _ => LinkResolution::missing(format!("/{}/", locale), LinkReason::UnknownContentType),
    };

    Ok(resolution)
}

async fn resolve_destination<S: ContentStore>(
    store: &S,
    location: DestinationLocation,
    locale: &str,
) -> CmsResult<LinkResolution> {
    match location {
        DestinationLocation::Destination { scope, slug } => {
            // The URL is rebuilt from the stored hierarchy, not echoed from the request.
            if let Some(detail) = store.find_destination(&slug, &scope).await? {
                if detail.destination.has_translation(locale) {
                    return Ok(LinkResolution::found(
                        format!(
                            "/{}/destinations/{}/{}/{}/",
                            locale,
                            detail.city.country.country.slug,
                            detail.city.city.slug,
                            detail.destination.entity.slug
                        ),
                        LinkReason::DestinationTranslated,
                    ));
                }
            }
            Ok(destinations_index(locale))
        }
        DestinationLocation::City { country, city } => Ok(LinkResolution::found(
            format!("/{}/destinations/{}/{}/", locale, country, city),
            LinkReason::CityPage,
        )),
        DestinationLocation::Country { country } => Ok(LinkResolution::found(
            format!("/{}/destinations/{}/", locale, country),
            LinkReason::CountryPage,
        )),
        DestinationLocation::Index => Ok(destinations_index(locale)),
    }
}

fn destinations_index(locale: &str) -> LinkResolution {
    LinkResolution::found(
        format!("/{}/destinations/", locale),
        LinkReason::DestinationsIndex,
    )
}
