//! Per-locale translation records and their owned children.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::content::SeoFields;
use crate::error::CmsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Text,
    Image,
    TextImage,
    Cta,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Text => "text",
            SectionType::Image => "image",
            SectionType::TextImage => "text_image",
            SectionType::Cta => "cta",
        }
    }
}

impl FromStr for SectionType {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(SectionType::Text),
            "image" => Ok(SectionType::Image),
            "text_image" => Ok(SectionType::TextImage),
            "cta" => Ok(SectionType::Cta),
            other => Err(CmsError::validation(format!("Unknown section type '{other}'"))),
        }
    }
}

/// An ordered, typed block of translated content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: i64,
    pub section_type: SectionType,
    pub order: i32,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub cta_label: String,
    pub cta_url: String,
}

/// One image of a translation's hero carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroSlide {
    pub id: i64,
    pub image: String,
    pub caption: String,
    pub order: i32,
}

/// Locale-specific content of a Page, Destination or BlogPost.
///
/// Sections and hero slides are owned by exactly one translation and are
/// kept sorted by `(order, id)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub id: i64,
    pub locale: String,
    pub title: String,
    pub subtitle: String,
    pub short_description: String,
    pub body: String,
    pub hero_image: Option<String>,
    pub seo: SeoFields,
    pub sections: Vec<Section>,
    pub hero_slides: Vec<HeroSlide>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Translation {
    /// Sort owned children into display order.
    pub fn sort_children(&mut self) {
        self.sections.sort_by_key(|section| (section.order, section.id));
        self.hero_slides.sort_by_key(|slide| (slide.order, slide.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: i64, order: i32) -> Section {
        Section {
            id,
            section_type: SectionType::Text,
            order,
            title: String::new(),
            body: format!("section {id}"),
            image: None,
            cta_label: String::new(),
            cta_url: String::new(),
        }
    }

    #[test]
    fn test_section_type_parse() {
        assert_eq!("text_image".parse::<SectionType>().unwrap(), SectionType::TextImage);
        assert_eq!(SectionType::Cta.as_str(), "cta");
        assert!("video".parse::<SectionType>().is_err());
    }

    #[test]
    fn test_sort_children_uses_order_then_id() {
        let now = Utc::now();
        let mut translation = Translation {
            id: 1,
            locale: "en".to_string(),
            title: "About".to_string(),
            subtitle: String::new(),
            short_description: String::new(),
            body: String::new(),
            hero_image: None,
            seo: SeoFields::default(),
            sections: vec![section(7, 2), section(5, 1), section(3, 2)],
            hero_slides: vec![
                HeroSlide {
                    id: 2,
                    image: "b.jpg".to_string(),
                    caption: String::new(),
                    order: 1,
                },
                HeroSlide {
                    id: 1,
                    image: "a.jpg".to_string(),
                    caption: String::new(),
                    order: 1,
                },
            ],
            created_at: now,
            updated_at: now,
        };

        translation.sort_children();

        let ids: Vec<_> = translation.sections.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![5, 3, 7]);
        assert_eq!(translation.hero_slides[0].image, "a.jpg");
    }
}
