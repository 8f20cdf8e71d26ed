//! Language allow-list shared by the query builders.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSupport {
    pub default: String,
    pub supported: Vec<String>,
}

impl LanguageSupport {
    /// Fails unless `default` is a two-letter code contained in `supported`.
    pub fn new<I, S>(default: impl Into<String>, supported: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let this = Self {
            default: default.into(),
            supported: supported.into_iter().map(Into::into).collect(),
        };
        this.validate()?;
        Ok(this)
    }

    /// Only `default` is accepted.
    pub fn single(default: impl Into<String>) -> Result<Self> {
        let default = default.into();
        Self::new(default.clone(), [default])
    }

    pub fn validate(&self) -> Result<()> {
        if self.default.chars().count() != 2 {
            return Err(Error::configuration_with_context(
                format!(
                    "default language requires exactly 2 characters (e.g. 'en'), was '{}'",
                    self.default
                ),
                ErrorContext::new().with_field_path("lang_default"),
            ));
        }
        if !self.is_supported(&self.default) {
            return Err(Error::configuration_with_context(
                format!("default language '{}' is not in the supported list", self.default),
                ErrorContext::new()
                    .with_field_path("supported_languages")
                    .with_details(self.supported.join(",")),
            ));
        }
        Ok(())
    }

    /// Case-sensitive: `"EN"` is not `"en"`.
    pub fn is_supported(&self, lang: &str) -> bool {
        self.supported.iter().any(|l| l == lang)
    }

    /// Returns the language to send, or a validation error for unsupported codes.
    pub fn resolve<'a>(&'a self, lang: Option<&'a str>) -> Result<&'a str> {
        let lang = lang.unwrap_or(self.default.as_str());
        if self.is_supported(lang) {
            Ok(lang)
        } else {
            Err(Error::validation_with_context(
                format!("language '{}' is not supported", lang),
                ErrorContext::new()
                    .with_field_path("lang")
                    .with_details(format!("supported: {}", self.supported.join(","))),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en_fr_es() -> LanguageSupport {
        LanguageSupport::new("en", ["en", "fr", "es"]).unwrap()
    }

    #[test]
    fn test_is_supported() {
        let langs = en_fr_es();
        assert!(langs.is_supported("en"));
        assert!(langs.is_supported("fr"));
        assert!(langs.is_supported("es"));
        assert!(!langs.is_supported("ne"));
        assert!(!langs.is_supported("de"));
        assert!(!langs.is_supported("se"));
        assert!(!langs.is_supported("EN"));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        assert_eq!(en_fr_es().resolve(None).unwrap(), "en");
        assert_eq!(en_fr_es().resolve(Some("fr")).unwrap(), "fr");
    }

    #[test]
    fn test_resolve_rejects_unsupported() {
        let err = en_fr_es().resolve(Some("de")).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_invalid_default_is_configuration_error() {
        assert!(matches!(
            LanguageSupport::new("eng", ["eng"]),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            LanguageSupport::new("de", ["en"]),
            Err(Error::Configuration { .. })
        ));
    }
}
