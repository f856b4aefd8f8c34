use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::SeoFields;

/// A card on the homepage content grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomepageCategory {
    pub id: i64,
    pub slug: String,
    pub order: i32,
    pub seo: SeoFields,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomepageCategoryTranslation {
    pub id: i64,
    pub category_id: i64,
    pub locale: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub is_published: bool,
}

/// A category paired with its translation in one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct HomepageCard {
    pub category: HomepageCategory,
    pub translation: HomepageCategoryTranslation,
}
