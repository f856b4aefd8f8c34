//! Country, city and destination endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::presenter::{CityPayload, CountryPayload, DestinationPayload};
use crate::store::{ContentStore, DestinationScope};

/// Query parameters for city listings.
#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub country: Option<String>,
}

/// Query parameters for destination listings and detail lookups.
#[derive(Debug, Default, Deserialize)]
pub struct DestinationQuery {
    pub country: Option<String>,
    pub city: Option<String>,
    pub locale: Option<String>,
}

impl DestinationQuery {
    fn scope(&self) -> DestinationScope {
        DestinationScope::new(self.country.as_deref(), self.city.as_deref())
    }
}

/// `GET /api/cms/countries`
pub async fn list_countries<S: ContentStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<Json<Vec<CountryPayload>>, ApiError> {
    let countries = state.store.list_countries().await?;
    let presenter = state.presenter(&headers);
    Ok(Json(countries.iter().map(|c| presenter.country(c)).collect()))
}

/// `GET /api/cms/cities?country=`
pub async fn list_cities<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<CityQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<CityPayload>>, ApiError> {
    let country = query.country.as_deref().filter(|c| !c.is_empty());
    let cities = state.store.list_cities(country).await?;
    let presenter = state.presenter(&headers);
    Ok(Json(cities.iter().map(|c| presenter.city(c)).collect()))
}

/// `GET /api/cms/destinations?country=&city=&locale=`
pub async fn list_destinations<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<DestinationQuery>,
    headers: HeaderMap,
) -> Result<Json<Vec<DestinationPayload>>, ApiError> {
    let destinations = state.store.list_destinations(&query.scope()).await?;
    let presenter = state.presenter(&headers);
    let locale = query.locale.as_deref();
    Ok(Json(
        destinations
            .iter()
            .map(|d| presenter.destination(d, locale))
            .collect(),
    ))
}

/// `GET /api/cms/destinations/:slug?locale=&country=&city=`
///
/// `country` and `city` disambiguate slugs shared across cities.
pub async fn destination_detail<S: ContentStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
    Query(query): Query<DestinationQuery>,
    headers: HeaderMap,
) -> Result<Json<DestinationPayload>, ApiError> {
    let detail = state
        .store
        .find_destination(&slug, &query.scope())
        .await?
        .filter(|detail| detail.destination.entity.is_published)
        .ok_or_else(|| ApiError::not_found("Destination"))?;

    let presenter = state.presenter(&headers);
    Ok(Json(presenter.destination(&detail, query.locale.as_deref())))
}
