//! Locale-scoped site chrome: navigation menu and footer.
//!
//! These lists are never resolved through the fallback chain; a locale with
//! no items simply has an empty menu.

use serde::{Deserialize, Serialize};

use crate::error::{CmsError, CmsResult};

/// Where a navigation item points. Exactly one target per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum NavTarget {
    External(String),
    Page(String),
    Destination(String),
    BlogCategory(String),
}

impl NavTarget {
    /// Locale-aware href for this target; external URLs are returned unchanged.
    pub fn href(&self, locale: &str) -> String {
        match self {
            NavTarget::External(url) => url.clone(),
            NavTarget::Page(slug) => format!("/{locale}/{slug}/"),
            NavTarget::Destination(slug) => format!("/{locale}/destinations/{slug}/"),
            NavTarget::BlogCategory(slug) => format!("/{locale}/blog/category/{slug}/"),
        }
    }

    /// Stored discriminant of the target ("external", "page", ...).
    pub fn kind(&self) -> &'static str {
        match self {
            NavTarget::External(_) => "external",
            NavTarget::Page(_) => "page",
            NavTarget::Destination(_) => "destination",
            NavTarget::BlogCategory(_) => "blog_category",
        }
    }

    /// URL or slug the target points at.
    pub fn value(&self) -> &str {
        match self {
            NavTarget::External(value)
            | NavTarget::Page(value)
            | NavTarget::Destination(value)
            | NavTarget::BlogCategory(value) => value,
        }
    }

    /// Rebuild a target from its stored discriminant and value.
    pub fn from_parts(kind: &str, value: impl Into<String>) -> CmsResult<Self> {
        let value = value.into();
        match kind {
            "external" => Ok(NavTarget::External(value)),
            "page" => Ok(NavTarget::Page(value)),
            "destination" => Ok(NavTarget::Destination(value)),
            "blog_category" => Ok(NavTarget::BlogCategory(value)),
            other => Err(CmsError::validation(format!(
                "Unknown navigation target type '{other}'"
            ))),
        }
    }

    /// Human-readable description of the link, for admin listings.
    pub fn describe(&self) -> String {
        match self {
            NavTarget::External(url) => format!("External: {url}"),
            NavTarget::Page(slug) => format!("Page: {slug}"),
            NavTarget::Destination(slug) => format!("Destination: {slug}"),
            NavTarget::BlogCategory(slug) => format!("Category: {slug}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub id: i64,
    pub locale: String,
    pub label: String,
    pub target: NavTarget,
    pub order: i32,
    pub is_active: bool,
}

impl NavigationItem {
    pub fn href(&self) -> String {
        self.target.href(&self.locale)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterLink {
    pub id: i64,
    pub label: String,
    pub url: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterBlock {
    pub id: i64,
    pub locale: String,
    pub title: String,
    pub body: String,
    pub order: i32,
    pub links: Vec<FooterLink>,
}

impl FooterBlock {
    pub fn sort_links(&mut self) {
        self.links
            .sort_by(|a, b| (a.order, &a.label).cmp(&(b.order, &b.label)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href_external_unchanged() {
        let target = NavTarget::External("https://example.com/x".to_string());
        assert_eq!(target.href("fr"), "https://example.com/x");
    }

    #[test]
    fn test_href_internal_targets_are_locale_prefixed() {
        assert_eq!(NavTarget::Page("about".into()).href("nl"), "/nl/about/");
        assert_eq!(
            NavTarget::Destination("belem-tower".into()).href("pt"),
            "/pt/destinations/belem-tower/"
        );
        assert_eq!(
            NavTarget::BlogCategory("food".into()).href("es"),
            "/es/blog/category/food/"
        );
    }

    #[test]
    fn test_parts_round_trip() {
        let target = NavTarget::BlogCategory("food".into());
        let rebuilt = NavTarget::from_parts(target.kind(), target.value()).unwrap();
        assert_eq!(rebuilt, target);
        assert!(NavTarget::from_parts("anchor", "#top").is_err());
    }

    #[test]
    fn test_describe() {
        assert_eq!(NavTarget::Page("about".into()).describe(), "Page: about");
    }

    #[test]
    fn test_footer_links_sorted_by_order_then_label() {
        let link = |id, label: &str, order| FooterLink {
            id,
            label: label.to_string(),
            url: "/".to_string(),
            order,
        };
        let mut block = FooterBlock {
            id: 1,
            locale: "en".to_string(),
            title: "Company".to_string(),
            body: String::new(),
            order: 0,
            links: vec![link(1, "Press", 2), link(2, "Contact", 1), link(3, "About", 1)],
        };
        block.sort_links();
        let labels: Vec<_> = block.links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["About", "Contact", "Press"]);
    }
}
