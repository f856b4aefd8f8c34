use serde::{Deserialize, Serialize};

/// Search-engine and social-sharing metadata.
///
/// Carried by translations (locale-specific) and by several entities
/// (locale-independent defaults such as the JSON-LD type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoFields {
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub og_title: Option<String>,
    #[serde(default)]
    pub og_description: Option<String>,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default = "default_seo_enabled")]
    pub seo_enabled: bool,
    #[serde(default)]
    pub jsonld_type: String,
    #[serde(default)]
    pub jsonld_override: String,
}

fn default_seo_enabled() -> bool {
    true
}

impl Default for SeoFields {
    fn default() -> Self {
        Self {
            meta_title: String::new(),
            meta_description: String::new(),
            og_title: None,
            og_description: None,
            og_image: None,
            canonical_url: None,
            seo_enabled: true,
            jsonld_type: String::new(),
            jsonld_override: String::new(),
        }
    }
}

impl SeoFields {
    /// Defaults with a preset JSON-LD type (e.g. "Country", "Article").
    pub fn with_jsonld_type(jsonld_type: &str) -> Self {
        Self {
            jsonld_type: jsonld_type.to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_seo() {
        let seo = SeoFields::default();
        assert!(seo.seo_enabled);
        assert!(seo.meta_title.is_empty());
        assert!(seo.og_image.is_none());
    }

    #[test]
    fn test_deserialize_missing_fields_uses_defaults() {
        let seo: SeoFields = serde_json::from_str(r#"{"meta_title": "Lisbon"}"#).unwrap();
        assert_eq!(seo.meta_title, "Lisbon");
        assert!(seo.seo_enabled);
        assert_eq!(seo.jsonld_type, "");
    }

    #[test]
    fn test_with_jsonld_type() {
        let seo = SeoFields::with_jsonld_type("Article");
        assert_eq!(seo.jsonld_type, "Article");
        assert!(seo.seo_enabled);
    }
}
