//! Language switcher endpoint.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::state::AppState;
use crate::links::{resolve_link, LinkRequest, LinkResolution};
use crate::store::ContentStore;

/// `GET /api/cms/resolve-translation?content_type=&slug=&locale=&current_path=&country=&city=`
///
/// Always 200: failures are reported in the body as `found=false`. The query
/// is read as raw pairs so repeated parameters keep their last value instead
/// of rejecting the request.
pub async fn resolve_translation<S: ContentStore>(
    State(state): State<AppState<S>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<LinkResolution> {
    let request = LinkRequest::from_pairs(pairs);
    Json(resolve_link(&state.store, &state.registry, &request).await)
}
