//! Component configuration.
//!
//! Loaded from YAML and overridable through `QANARY_*` environment variables.
//!
//! ```yaml
//! application_name: QAnswerQueryBuilderAndExecutor
//! cache:
//!   ttl_secs: 5
//! qanswer:
//!   endpoint: http://qanswer.example/api/gerbil
//!   lang_default: en
//!   supported_languages: [en, fr, de, it, es]
//!   knowledge_base_default: wikidata
//!   user_default: open
//!   threshold: 0.5
//! ```

use crate::cache::{CacheConfig, MemoryCache, ResponseCache};
use crate::client::CachedHttpClient;
use crate::lang::LanguageSupport;
use crate::qanswer::QAnswerSettings;
use crate::rubq::RuBQSettings;
use crate::transport::ReqwestExecutor;
use crate::triplestore::HttpTripleStore;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    #[serde(default = "default_application_name")]
    pub application_name: String,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triplestore: Option<TripleStoreSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qanswer: Option<QAnswerSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubq: Option<RuBQSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            enabled: true,
            max_entries: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSection {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleStoreSection {
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_endpoint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QAnswerSection {
    pub endpoint: String,
    #[serde(default = "default_lang")]
    pub lang_default: String,
    #[serde(default)]
    pub supported_languages: Vec<String>,
    #[serde(default = "default_knowledge_base")]
    pub knowledge_base_default: String,
    #[serde(default = "default_user")]
    pub user_default: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuBQSection {
    pub endpoint: String,
    #[serde(default = "default_lang")]
    pub lang_default: String,
    #[serde(default)]
    pub supported_languages: Vec<String>,
}

fn default_application_name() -> String {
    "qanary-component".to_string()
}
fn default_ttl_secs() -> u64 {
    5
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_true() -> bool {
    true
}
fn default_lang() -> String {
    "en".to_string()
}
fn default_knowledge_base() -> String {
    "wikidata".to_string()
}
fn default_user() -> String {
    "open".to_string()
}
fn default_threshold() -> f64 {
    0.5
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            application_name: default_application_name(),
            cache: CacheSection::default(),
            http: HttpSection::default(),
            triplestore: None,
            qanswer: None,
            rubq: None,
        }
    }
}

fn parse_url(value: &str, field: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| {
        Error::configuration_with_context(
            format!("invalid URL '{}': {}", value, e),
            ErrorContext::new().with_field_path(field),
        )
    })
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse::<T>().map_err(|_| {
        Error::configuration_with_context(
            format!("cannot parse '{}'", value),
            ErrorContext::new().with_field_path(name).with_source("env"),
        )
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Supported list falls back to just the default language.
fn languages(default: &str, supported: &[String]) -> Result<LanguageSupport> {
    if supported.is_empty() {
        LanguageSupport::single(default)
    } else {
        LanguageSupport::new(default, supported.iter().cloned())
    }
}

impl ComponentConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Applies `QANARY_*` variables from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from `lookup`. Sections are created when their endpoint is set.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("QANARY_APPLICATION_NAME") {
            self.application_name = v;
        }
        if let Some(v) = lookup("QANARY_CACHE_TTL_SECS") {
            self.cache.ttl_secs = parse_env("QANARY_CACHE_TTL_SECS", &v)?;
        }
        if let Some(v) = lookup("QANARY_CACHE_ENABLED") {
            self.cache.enabled = parse_env("QANARY_CACHE_ENABLED", &v)?;
        }
        if let Some(v) = lookup("QANARY_HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = parse_env("QANARY_HTTP_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("QANARY_TRIPLESTORE_ENDPOINT") {
            match self.triplestore.as_mut() {
                Some(ts) => ts.endpoint = v,
                None => {
                    self.triplestore = Some(TripleStoreSection {
                        endpoint: v,
                        update_endpoint: None,
                    })
                }
            }
        }

        if let Some(v) = lookup("QANARY_QANSWER_ENDPOINT") {
            match self.qanswer.as_mut() {
                Some(q) => q.endpoint = v,
                None => {
                    self.qanswer = Some(QAnswerSection {
                        endpoint: v,
                        lang_default: default_lang(),
                        supported_languages: Vec::new(),
                        knowledge_base_default: default_knowledge_base(),
                        user_default: default_user(),
                        threshold: default_threshold(),
                    })
                }
            }
        }
        if let Some(q) = self.qanswer.as_mut() {
            if let Some(v) = lookup("QANARY_QANSWER_LANG_DEFAULT") {
                q.lang_default = v;
            }
            if let Some(v) = lookup("QANARY_QANSWER_SUPPORTED_LANGUAGES") {
                q.supported_languages = split_list(&v);
            }
            if let Some(v) = lookup("QANARY_QANSWER_KNOWLEDGE_BASE_DEFAULT") {
                q.knowledge_base_default = v;
            }
            if let Some(v) = lookup("QANARY_QANSWER_USER_DEFAULT") {
                q.user_default = v;
            }
            if let Some(v) = lookup("QANARY_QANSWER_THRESHOLD") {
                q.threshold = parse_env("QANARY_QANSWER_THRESHOLD", &v)?;
            }
        }

        if let Some(v) = lookup("QANARY_RUBQ_ENDPOINT") {
            match self.rubq.as_mut() {
                Some(r) => r.endpoint = v,
                None => {
                    self.rubq = Some(RuBQSection {
                        endpoint: v,
                        lang_default: default_lang(),
                        supported_languages: Vec::new(),
                    })
                }
            }
        }
        if let Some(r) = self.rubq.as_mut() {
            if let Some(v) = lookup("QANARY_RUBQ_LANG_DEFAULT") {
                r.lang_default = v;
            }
            if let Some(v) = lookup("QANARY_RUBQ_SUPPORTED_LANGUAGES") {
                r.supported_languages = split_list(&v);
            }
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.application_name.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "application name cannot be empty",
                ErrorContext::new().with_field_path("application_name"),
            ));
        }
        if let Some(q) = &self.qanswer {
            if !(q.threshold >= 0.0) {
                return Err(Error::configuration_with_context(
                    format!("threshold has to be >= 0: {}", q.threshold),
                    ErrorContext::new().with_field_path("qanswer.threshold"),
                ));
            }
            self.qanswer_settings()?;
        }
        if self.rubq.is_some() {
            self.rubq_settings()?;
        }
        if let Some(ts) = &self.triplestore {
            parse_url(&ts.endpoint, "triplestore.endpoint")?;
            if let Some(u) = &ts.update_endpoint {
                parse_url(u, "triplestore.update_endpoint")?;
            }
        }
        Ok(())
    }

    pub fn qanswer_settings(&self) -> Result<QAnswerSettings> {
        let q = self
            .qanswer
            .as_ref()
            .ok_or_else(|| Error::configuration("qanswer section missing"))?;
        let settings = QAnswerSettings {
            endpoint: parse_url(&q.endpoint, "qanswer.endpoint")?,
            languages: languages(&q.lang_default, &q.supported_languages)?,
            knowledge_base_default: q.knowledge_base_default.clone(),
            user_default: q.user_default.clone(),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn rubq_settings(&self) -> Result<RuBQSettings> {
        let r = self
            .rubq
            .as_ref()
            .ok_or_else(|| Error::configuration("rubq section missing"))?;
        Ok(RuBQSettings {
            endpoint: parse_url(&r.endpoint, "rubq.endpoint")?,
            languages: languages(&r.lang_default, &r.supported_languages)?,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.qanswer.as_ref().map(|q| q.threshold).unwrap_or_else(default_threshold)
    }

    pub fn response_cache(&self) -> ResponseCache {
        let config = CacheConfig::new()
            .with_ttl(Duration::from_secs(self.cache.ttl_secs))
            .with_enabled(self.cache.enabled);
        let backend = match self.cache.max_entries {
            Some(n) => MemoryCache::new(n),
            None => MemoryCache::unbounded(),
        };
        ResponseCache::new(config, Box::new(backend))
    }

    /// Cached client with a fresh cache built from the `cache` section.
    pub fn cached_client(&self) -> Result<CachedHttpClient> {
        let executor = ReqwestExecutor::with_timeout(Duration::from_secs(self.http.timeout_secs))?;
        CachedHttpClient::builder()
            .executor(Arc::new(executor))
            .cache(Arc::new(self.response_cache()))
            .build()
    }

    /// Uncached store for annotation reads and writes.
    pub fn triple_store(&self) -> Result<HttpTripleStore> {
        let ts = self
            .triplestore
            .as_ref()
            .ok_or_else(|| Error::configuration("triplestore section missing"))?;
        let executor = ReqwestExecutor::with_timeout(Duration::from_secs(self.http.timeout_secs))?;
        let mut store = HttpTripleStore::new(parse_url(&ts.endpoint, "triplestore.endpoint")?, Arc::new(executor));
        if let Some(u) = &ts.update_endpoint {
            store = store.with_update_endpoint(parse_url(u, "triplestore.update_endpoint")?);
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const YAML: &str = "
application_name: QAnswerQueryBuilderAndExecutor
cache:
  ttl_secs: 30
qanswer:
  endpoint: http://qanswer.example/api/gerbil
  supported_languages: [en, fr, es]
  threshold: 0.7
rubq:
  endpoint: http://rubq.example/qa
";

    #[test]
    fn test_yaml_with_defaults() {
        let config = ComponentConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.cache.ttl_secs, 30);
        assert!(config.cache.enabled);
        assert_eq!(config.threshold(), 0.7);
        let q = config.qanswer_settings().unwrap();
        assert_eq!(q.languages.default, "en");
        assert!(q.languages.is_supported("fr"));
        assert_eq!(q.knowledge_base_default, "wikidata");
        assert_eq!(q.user_default, "open");
        let r = config.rubq_settings().unwrap();
        assert!(r.languages.is_supported("en"));
        assert!(!r.languages.is_supported("fr"));
    }

    #[test]
    fn test_overrides() {
        let mut config = ComponentConfig::from_yaml_str(YAML).unwrap();
        let env: HashMap<&str, &str> = [
            ("QANARY_CACHE_TTL_SECS", "2"),
            ("QANARY_QANSWER_LANG_DEFAULT", "fr"),
            ("QANARY_QANSWER_THRESHOLD", "0.25"),
            ("QANARY_RUBQ_SUPPORTED_LANGUAGES", "en, ru"),
            ("QANARY_TRIPLESTORE_ENDPOINT", "http://localhost:8890/sparql"),
        ]
        .into_iter()
        .collect();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.cache.ttl_secs, 2);
        assert_eq!(config.qanswer_settings().unwrap().languages.default, "fr");
        assert_eq!(config.threshold(), 0.25);
        assert!(config.rubq_settings().unwrap().languages.is_supported("ru"));
        assert_eq!(
            config.triplestore.as_ref().map(|t| t.endpoint.as_str()),
            Some("http://localhost:8890/sparql")
        );
    }

    #[test]
    fn test_endpoint_override_creates_section() {
        let mut config = ComponentConfig::default();
        config
            .apply_overrides(|k| (k == "QANARY_RUBQ_ENDPOINT").then(|| "http://rubq.example/qa".to_string()))
            .unwrap();
        assert!(config.rubq.is_some());
        assert!(config.qanswer.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ComponentConfig::from_yaml_str("qanswer:\n  endpoint: not a url\n"),
            Err(Error::Configuration { .. })
        ));
        assert!(ComponentConfig::from_yaml_str("qanswer:\n  endpoint: http://x/\n  threshold: -1\n").is_err());
        assert!(ComponentConfig::from_yaml_str("qanswer:\n  endpoint: http://x/\n  lang_default: eng\n").is_err());
        assert!(ComponentConfig::from_yaml_str("qanswer:\n  endpoint: http://x/\n  user_default: ' '\n").is_err());
        let mut config = ComponentConfig::default();
        assert!(config
            .apply_overrides(|k| (k == "QANARY_CACHE_TTL_SECS").then(|| "soon".to_string()))
            .is_err());
    }

    #[test]
    fn test_missing_section() {
        assert!(ComponentConfig::default().qanswer_settings().is_err());
        assert!(ComponentConfig::default().triple_store().is_err());
    }

    #[test]
    fn test_triple_store_from_section() {
        let config = ComponentConfig::from_yaml_str(
            "triplestore:\n  endpoint: http://localhost:8890/sparql\n  update_endpoint: http://localhost:8890/update\n",
        )
        .unwrap();
        assert!(config.triple_store().is_ok());
    }

    #[test]
    fn test_response_cache_uses_ttl() {
        let config = ComponentConfig::from_yaml_str(YAML).unwrap();
        assert_eq!(config.response_cache().ttl(), Duration::from_secs(30));
    }
}
