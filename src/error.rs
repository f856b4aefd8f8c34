use thiserror::Error;

/// Domain error type for the content backend.
///
/// Expected absence (no translation for a locale, no match for a link) is
/// never represented here; resolvers return structured results for those.
/// Only genuinely exceptional conditions and rejected writes end up as a
/// `CmsError`.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Unsupported locale '{code}'. Supported: {supported}")]
    InvalidLocale { code: String, supported: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CmsResult<T> = std::result::Result<T, CmsError>;

impl CmsError {
    pub fn not_found(what: impl Into<String>) -> Self {
        CmsError::NotFound(what.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CmsError::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = CmsError::not_found("Page 'about'");
        assert_eq!(err.to_string(), "Page 'about' not found");
    }

    #[test]
    fn test_invalid_locale_lists_supported() {
        let err = CmsError::InvalidLocale {
            code: "xx".to_string(),
            supported: "en, fr".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported locale 'xx'. Supported: en, fr");
    }

    #[test]
    fn test_serialization_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CmsError = parse_err.into();
        assert!(matches!(err, CmsError::Serialization(_)));
    }
}
