//! Admin endpoints: dashboard, bulk import and deletion.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::content::{ContentKind, TranslatableKind, TranslatableSummary};
use crate::i18n::{translation_coverage, LocaleCoverage};
use crate::import::{ImportKind, ImportReport, Importer};
use crate::presenter::frontend_url;
use crate::store::{ContentStats, ContentStore};

/// Entries per kind in the recent-activity list.
const RECENT_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub stats: ContentStats,
    pub coverage: Vec<LocaleCoverage>,
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Serialize)]
pub struct RecentActivity {
    pub pages: Vec<ActivityEntry>,
    pub blog_posts: Vec<ActivityEntry>,
    pub destinations: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub slug: String,
    pub is_published: bool,
    pub locales: Vec<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BundleSectionReport {
    pub kind: ImportKind,
    #[serde(flatten)]
    pub report: ImportReport,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub kind: ContentKind,
    pub slug: String,
}

/// `GET /api/admin/dashboard`
pub async fn dashboard<S: ContentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let stats = state.store.content_stats().await?;
    let inventory = state.store.translation_inventory().await?;
    let coverage = translation_coverage(&state.registry, &inventory);

    let fallback = state.registry.fallback().code;
    let recent = |kind: TranslatableKind| -> Vec<ActivityEntry> {
        let mut entries: Vec<&TranslatableSummary> =
            inventory.iter().filter(|entry| entry.kind == kind).collect();
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        entries
            .into_iter()
            .take(RECENT_ACTIVITY_LIMIT)
            .map(|entry| ActivityEntry {
                id: entry.id,
                slug: entry.slug.clone(),
                is_published: entry.is_published,
                locales: entry.locales.clone(),
                updated_at: entry.updated_at,
                preview_url: (kind == TranslatableKind::Page).then(|| {
                    frontend_url(&state.config.frontend_base_url, &entry.slug, fallback)
                }),
            })
            .collect()
    };

    Ok(Json(DashboardResponse {
        stats,
        coverage,
        recent_activity: RecentActivity {
            pages: recent(TranslatableKind::Page),
            blog_posts: recent(TranslatableKind::BlogPost),
            destinations: recent(TranslatableKind::Destination),
        },
    }))
}

/// `POST /api/admin/import/:kind`
///
/// Body is a JSON array of items. Item failures are reported, not raised.
pub async fn import<S: ContentStore>(
    State(state): State<AppState<S>>,
    Path(kind): Path<String>,
    body: Bytes,
) -> Result<Json<ImportReport>, ApiError> {
    let kind: ImportKind = kind.parse()?;
    let importer = Importer::new(&state.store, &state.registry, state.config.max_import_bytes);
    let report = importer.import_json(kind, &body).await?;
    Ok(Json(report))
}

/// `POST /api/admin/import`
///
/// Body is a seed bundle: an object keyed by import kind.
pub async fn import_bundle<S: ContentStore>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<Vec<BundleSectionReport>>, ApiError> {
    let importer = Importer::new(&state.store, &state.registry, state.config.max_import_bytes);
    let reports = importer.import_bundle(&body).await?;
    Ok(Json(
        reports
            .into_iter()
            .map(|(kind, report)| BundleSectionReport { kind, report })
            .collect(),
    ))
}

/// `DELETE /api/admin/:kind/:slug`
///
/// Cascades to everything the entity owns.
pub async fn delete<S: ContentStore>(
    State(state): State<AppState<S>>,
    Path((kind, slug)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let kind: ContentKind = kind.parse()?;
    if !state.store.delete(kind, &slug).await? {
        return Err(ApiError::NotFound(format!("No {} with slug '{}'.", kind, slug)));
    }

    info!("Deleted {} '{}'", kind, slug);
    Ok(Json(DeleteResponse {
        deleted: true,
        kind,
        slug,
    }))
}
