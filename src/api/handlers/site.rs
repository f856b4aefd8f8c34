//! Site chrome: navigation, footer and homepage categories.
//!
//! These are authored per locale and never fall back; an absent `locale`
//! means the registry's fallback locale.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};

use crate::api::error::ApiError;
use crate::api::handlers::LocaleQuery;
use crate::api::state::AppState;
use crate::presenter::{FooterBlockPayload, HomepageCardPayload, NavItemPayload};
use crate::store::ContentStore;

/// `GET /api/cms/navigation?locale=`
pub async fn navigation<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<NavItemPayload>>, ApiError> {
    let locale = state.locale_or_fallback(query.locale.as_deref());
    let items = state.store.list_navigation(locale).await?;
    let presenter = state.presenter(&headers);
    Ok(Json(items.iter().map(|item| presenter.nav_item(item)).collect()))
}

/// `GET /api/cms/footer?locale=`
pub async fn footer<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<FooterBlockPayload>>, ApiError> {
    let locale = state.locale_or_fallback(query.locale.as_deref());
    let blocks = state.store.list_footer(locale).await?;
    let presenter = state.presenter(&headers);
    Ok(Json(
        blocks.iter().map(|block| presenter.footer_block(block)).collect(),
    ))
}

/// `GET /api/cms/homepage-categories?locale=`
pub async fn homepage_categories<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<HomepageCardPayload>>, ApiError> {
    let locale = state.locale_or_fallback(query.locale.as_deref());
    let cards = state.store.list_homepage_cards(locale).await?;
    let presenter = state.presenter(&headers);
    Ok(Json(
        cards.iter().map(|card| presenter.homepage_card(card)).collect(),
    ))
}
