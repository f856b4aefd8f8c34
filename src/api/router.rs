//! Router configuration and route composition.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handlers::{admin, blog, destinations, health, links, pages, site};
use crate::api::state::AppState;
use crate::config::AllowedOrigins;
use crate::store::ContentStore;

/// Creates the application router with all routes and middleware.
pub fn create_router<S: ContentStore>(state: AppState<S>) -> Router {
    // Public content API
    let cms_routes = Router::new()
        .route("/pages/:slug", get(pages::page_detail::<S>))
        .route("/countries", get(destinations::list_countries::<S>))
        .route("/cities", get(destinations::list_cities::<S>))
        .route("/destinations", get(destinations::list_destinations::<S>))
        .route(
            "/destinations/:slug",
            get(destinations::destination_detail::<S>),
        )
        .route("/blog", get(blog::list_posts::<S>))
        .route("/blog/categories", get(blog::list_categories::<S>))
        .route("/blog/category/:slug", get(blog::category_detail::<S>))
        .route("/blog/:slug", get(blog::post_detail::<S>))
        .route("/navigation", get(site::navigation::<S>))
        .route("/footer", get(site::footer::<S>))
        .route("/homepage-categories", get(site::homepage_categories::<S>))
        .route("/resolve-translation", get(links::resolve_translation::<S>));

    // Admin API; import bodies are capped at the configured import size
    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard::<S>))
        .route("/import", post(admin::import_bundle::<S>))
        .route("/import/:kind", post(admin::import::<S>))
        .route("/:kind/:slug", delete(admin::delete::<S>))
        .layer(DefaultBodyLimit::max(state.config.max_import_bytes));

    let cors = cors_layer(state.config.allowed_origins());

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/cms", cms_routes)
        .nest("/api/admin", admin_routes)
        // Middleware layers (order matters: bottom layers run first)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Preflight cache lifetime sent to browsers.
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// CORS for the public and admin APIs.
fn cors_layer(origins: AllowedOrigins) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(CORS_MAX_AGE);

    match origins {
        AllowedOrigins::Any => cors.allow_origin(Any),
        AllowedOrigins::List(origins) => cors.allow_origin(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect::<Vec<_>>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::i18n::LocaleRegistry;
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn router() -> Router {
        let config = Config {
            database_url: None,
            database_max_connections: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: "https://travel.example.com, https://admin.example.com".to_string(),
            public_base_url: None,
            frontend_base_url: "http://localhost:3000".to_string(),
            seed_file: None,
            max_import_bytes: 1024,
        };
        create_router(AppState::new(
            MemoryStore::new(),
            LocaleRegistry::standard(),
            config,
        ))
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = router()
            .oneshot(Request::get("/api/cms/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let request = Request::get("/health")
            .header("origin", "https://admin.example.com")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "https://admin.example.com"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_unlisted_origin() {
        let request = Request::get("/health")
            .header("origin", "https://evil.example.com")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_delete() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/admin/page/about")
            .header("origin", "https://admin.example.com")
            .header("access-control-request-method", "DELETE")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        let methods = response
            .headers()
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_import_body_over_limit_is_rejected() {
        let body = format!("[{}]", "{},".repeat(400));
        let request = Request::post("/api/admin/import/countries")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
