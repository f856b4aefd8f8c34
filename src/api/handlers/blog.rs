//! Blog endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::handlers::LocaleQuery;
use crate::api::state::AppState;
use crate::presenter::{BlogCategoryPayload, BlogPostPayload, CategoryDetailPayload};
use crate::store::ContentStore;

/// Query parameters for the post listing.
#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    pub category: Option<String>,
    pub locale: Option<String>,
}

/// `GET /api/cms/blog?category=&locale=`
///
/// Published posts in published categories, newest first.
pub async fn list_posts<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<BlogQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<BlogPostPayload>>, ApiError> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let posts = state.store.list_blog_posts(category).await?;
    let presenter = state.presenter(&headers);
    let locale = query.locale.as_deref();
    Ok(Json(posts.iter().map(|p| presenter.blog_post(p, locale)).collect()))
}

/// `GET /api/cms/blog/categories`
pub async fn list_categories<S: ContentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<Json<Vec<BlogCategoryPayload>>, ApiError> {
    let categories = state.store.list_blog_categories().await?;
    let presenter = state.presenter(&headers);
    Ok(Json(
        categories.iter().map(|c| presenter.blog_category(c)).collect(),
    ))
}

/// `GET /api/cms/blog/category/:slug?locale=`
pub async fn category_detail<S: ContentStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Result<Json<CategoryDetailPayload>, ApiError> {
    let category = state
        .store
        .find_blog_category(&slug)
        .await?
        .filter(|category| category.is_published)
        .ok_or_else(|| ApiError::not_found("Category"))?;

    let posts = state.store.list_blog_posts(Some(&category.slug)).await?;
    let presenter = state.presenter(&headers);
    Ok(Json(presenter.category_detail(
        &category,
        &posts,
        query.locale.as_deref(),
    )))
}

/// `GET /api/cms/blog/:slug?locale=`
pub async fn post_detail<S: ContentStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Result<Json<BlogPostPayload>, ApiError> {
    let post = state
        .store
        .find_blog_post(&slug)
        .await?
        .filter(|detail| detail.post.entity.is_published)
        .ok_or_else(|| ApiError::not_found("Blog post"))?;

    let presenter = state.presenter(&headers);
    Ok(Json(presenter.blog_post(&post, query.locale.as_deref())))
}
