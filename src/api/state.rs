use axum::http::{header, HeaderMap};
use std::sync::Arc;

use crate::config::Config;
use crate::i18n::{LocaleRegistry, TranslationResolver};
use crate::presenter::{MediaUrls, Presenter};
use crate::store::ContentStore;

/// Shared application state for all handlers.
///
/// Cloned per request by axum; the store is cheap to clone (a pool or an
/// `Arc`), everything else sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState<S> {
    /// Content persistence
    pub store: S,

    /// Supported locales and the fallback locale
    pub registry: Arc<LocaleRegistry>,

    /// Runtime configuration (media origin, frontend URL, import limits)
    pub config: Arc<Config>,
}

impl<S: ContentStore> AppState<S> {
    pub fn new(store: S, registry: LocaleRegistry, config: Config) -> Self {
        Self {
            store,
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    pub fn resolver(&self) -> TranslationResolver {
        TranslationResolver::new(&self.registry)
    }

    /// Presenter for one request, with media URLs rooted at the request origin.
    pub fn presenter(&self, headers: &HeaderMap) -> Presenter {
        Presenter::new(self.resolver(), MediaUrls::new(self.origin(headers)))
    }

    /// Origin used for absolute media URLs.
    ///
    /// `PUBLIC_BASE_URL` wins; otherwise the origin is rebuilt from the
    /// forwarding headers or `Host`.
    pub fn origin(&self, headers: &HeaderMap) -> Option<String> {
        if let Some(base) = &self.config.public_base_url {
            return Some(base.clone());
        }

        let header_value = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let host = header_value("x-forwarded-host").or_else(|| header_value(header::HOST.as_str()))?;
        let scheme = header_value("x-forwarded-proto").unwrap_or("http");
        Some(format!("{}://{}", scheme, host))
    }

    /// The requested locale, or the fallback locale when absent or blank.
    pub fn locale_or_fallback<'a>(&self, locale: Option<&'a str>) -> &'a str {
        locale
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(self.registry.fallback().code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use axum::http::HeaderValue;

    fn state(public_base_url: Option<&str>) -> AppState<MemoryStore> {
        let mut config = Config::from_env().unwrap();
        config.public_base_url = public_base_url.map(str::to_string);
        AppState::new(MemoryStore::new(), LocaleRegistry::standard(), config)
    }

    #[test]
    fn test_origin_prefers_public_base_url() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:8000"));
        let state = state(Some("https://cms.example.com"));
        assert_eq!(state.origin(&headers).as_deref(), Some("https://cms.example.com"));
    }

    #[test]
    fn test_origin_from_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("internal:8000"));
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("travel.example.com, proxy"));
        let state = state(None);
        assert_eq!(state.origin(&headers).as_deref(), Some("https://travel.example.com"));
    }

    #[test]
    fn test_origin_from_host_or_none() {
        let state = state(None);
        let mut headers = HeaderMap::new();
        assert_eq!(state.origin(&headers), None);

        headers.insert(header::HOST, HeaderValue::from_static("localhost:8000"));
        assert_eq!(state.origin(&headers).as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_locale_or_fallback() {
        let state = state(None);
        assert_eq!(state.locale_or_fallback(Some("fr")), "fr");
        assert_eq!(state.locale_or_fallback(Some("  ")), "en");
        assert_eq!(state.locale_or_fallback(None), "en");
    }
}
