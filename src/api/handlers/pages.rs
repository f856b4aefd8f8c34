//! Page endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};

use crate::api::error::ApiError;
use crate::api::handlers::LocaleQuery;
use crate::api::state::AppState;
use crate::presenter::PageDetailPayload;
use crate::store::ContentStore;

/// `GET /api/cms/pages/:slug?locale=`
///
/// 404 unless the page exists and is published. The locale falls back per
/// the translation resolver and `translation_missing` reports it.
pub async fn page_detail<S: ContentStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Result<Json<PageDetailPayload>, ApiError> {
    let page = state
        .store
        .find_page(&slug)
        .await?
        .filter(|page| page.entity.is_published)
        .ok_or_else(|| ApiError::not_found("Page"))?;

    let presenter = state.presenter(&headers);
    Ok(Json(presenter.page_detail(&page, query.locale.as_deref())))
}
