//! Locale-independent content entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::content::SeoFields;
use crate::error::CmsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Home,
    Destinations,
    About,
    Contact,
    Blog,
    #[default]
    Custom,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Home => "home",
            PageType::Destinations => "destinations",
            PageType::About => "about",
            PageType::Contact => "contact",
            PageType::Blog => "blog",
            PageType::Custom => "custom",
        }
    }
}

impl FromStr for PageType {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(PageType::Home),
            "destinations" => Ok(PageType::Destinations),
            "about" => Ok(PageType::About),
            "contact" => Ok(PageType::Contact),
            "blog" => Ok(PageType::Blog),
            "custom" => Ok(PageType::Custom),
            other => Err(CmsError::validation(format!("Unknown page type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestinationCategory {
    Museum,
    Viewpoint,
    Neighborhood,
    Landmark,
    Park,
    Beach,
    Shopping,
    Restaurant,
    Nightlife,
    Cultural,
    Historical,
    #[default]
    Other,
}

impl DestinationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DestinationCategory::Museum => "museum",
            DestinationCategory::Viewpoint => "viewpoint",
            DestinationCategory::Neighborhood => "neighborhood",
            DestinationCategory::Landmark => "landmark",
            DestinationCategory::Park => "park",
            DestinationCategory::Beach => "beach",
            DestinationCategory::Shopping => "shopping",
            DestinationCategory::Restaurant => "restaurant",
            DestinationCategory::Nightlife => "nightlife",
            DestinationCategory::Cultural => "cultural",
            DestinationCategory::Historical => "historical",
            DestinationCategory::Other => "other",
        }
    }
}

impl FromStr for DestinationCategory {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "museum" => Ok(DestinationCategory::Museum),
            "viewpoint" => Ok(DestinationCategory::Viewpoint),
            "neighborhood" => Ok(DestinationCategory::Neighborhood),
            "landmark" => Ok(DestinationCategory::Landmark),
            "park" => Ok(DestinationCategory::Park),
            "beach" => Ok(DestinationCategory::Beach),
            "shopping" => Ok(DestinationCategory::Shopping),
            "restaurant" => Ok(DestinationCategory::Restaurant),
            "nightlife" => Ok(DestinationCategory::Nightlife),
            "cultural" => Ok(DestinationCategory::Cultural),
            "historical" => Ok(DestinationCategory::Historical),
            "other" => Ok(DestinationCategory::Other),
            other => Err(CmsError::validation(format!(
                "Unknown destination category '{other}'"
            ))),
        }
    }
}

/// A generic CMS page (about, contact, landing pages, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub id: i64,
    pub slug: String,
    pub page_type: PageType,
    pub is_published: bool,
    pub hero_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Country {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub hero_image: Option<String>,
    pub seo: SeoFields,
    pub is_published: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A city; its slug is unique within its country only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct City {
    pub id: i64,
    pub country_id: i64,
    pub slug: String,
    pub name: String,
    pub short_description: String,
    pub hero_image: Option<String>,
    pub seo: SeoFields,
    pub is_published: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A destination; its slug is unique within its city only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    pub id: i64,
    pub city_id: i64,
    pub slug: String,
    pub category: DestinationCategory,
    pub tags: String,
    pub seo: SeoFields,
    pub is_featured: bool,
    pub is_published: bool,
    pub hero_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Destination {
    /// Tags split on commas, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// Blog categories are locale-invariant: the name is shown as-is in every locale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogCategory {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub is_published: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub id: i64,
    pub category_id: i64,
    pub slug: String,
    pub hero_image: Option<String>,
    pub seo: SeoFields,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
