//! Per-domain settings lookup with its own cache.
//!
//! Each domain can configure a notification language through the external
//! config service. Lookups are cached with a dedicated TTL so a burst of
//! sends does not hammer the service, and a failed lookup falls back to the
//! default locale without failing the surrounding operation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::CacheStore;

/// Settings lookup errors.
#[derive(Error, Debug, Clone)]
pub enum SettingsError {
    /// The config service could not be reached.
    #[error("config service unavailable: {0}")]
    Unavailable(String),
    /// The config service failed the query.
    #[error("settings lookup failed: {0}")]
    Query(String),
}

/// Per-domain settings as returned by the config service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainSettings {
    /// Preferred notification language, if configured.
    pub language: Option<String>,
}

/// Narrow client contract for the config service.
#[async_trait]
pub trait ConfigClient: Send + Sync {
    /// Fetch settings for a domain.
    async fn get_domain_settings(
        &self,
        domain_id: &str,
    ) -> std::result::Result<DomainSettings, SettingsError>;
}

/// Cache key for a domain's settings.
fn settings_key(domain_id: &str) -> String {
    format!("notice:domain-settings:{domain_id}")
}

/// Locale lookup over the config service with a TTL cache in front.
///
/// Never fails: a lookup error logs a warning and yields the default
/// locale, so one misbehaving domain cannot abort aggregation for others.
pub struct LocaleSource<S, C> {
    config: Arc<S>,
    cache: Arc<C>,
    ttl: Duration,
    default_locale: String,
}

impl<S, C> LocaleSource<S, C>
where
    S: ConfigClient,
    C: CacheStore,
{
    /// Create a locale source.
    pub fn new(config: Arc<S>, cache: Arc<C>, ttl: Duration, default_locale: String) -> Self {
        Self {
            config,
            cache,
            ttl,
            default_locale,
        }
    }

    /// Resolve the notification locale for a domain.
    pub async fn domain_locale(&self, domain_id: &str) -> String {
        let key = settings_key(domain_id);

        if self.cache.is_available().await {
            match self.cache.get(&key).await {
                Ok(Some(cached)) => return cached,
                Ok(None) => {}
                Err(e) => debug!(domain_id, error = %e, "settings cache read failed"),
            }
        }

        let locale = match self.config.get_domain_settings(domain_id).await {
            Ok(settings) => settings
                .language
                .unwrap_or_else(|| self.default_locale.clone()),
            Err(e) => {
                warn!(domain_id, error = %e, "domain settings lookup failed, using default locale");
                return self.default_locale.clone();
            }
        };

        if self.cache.is_available().await {
            if let Err(e) = self.cache.set(&key, &locale, self.ttl).await {
                debug!(domain_id, error = %e, "settings cache write failed");
            }
        }

        locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeConfig {
        languages: HashMap<String, String>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeConfig {
        fn with(languages: &[(&str, &str)]) -> Self {
            Self {
                languages: languages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                languages: HashMap::new(),
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ConfigClient for FakeConfig {
        async fn get_domain_settings(
            &self,
            domain_id: &str,
        ) -> std::result::Result<DomainSettings, SettingsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SettingsError::Unavailable("down".to_string()));
            }
            Ok(DomainSettings {
                language: self.languages.get(domain_id).cloned(),
            })
        }
    }

    fn source(config: FakeConfig) -> LocaleSource<FakeConfig, MemoryCache> {
        LocaleSource::new(
            Arc::new(config),
            Arc::new(MemoryCache::new()),
            Duration::from_secs(300),
            "en".to_string(),
        )
    }

    #[tokio::test]
    async fn test_configured_language() {
        let source = source(FakeConfig::with(&[("d1", "ja")]));
        assert_eq!(source.domain_locale("d1").await, "ja");
    }

    #[tokio::test]
    async fn test_unconfigured_language_defaults() {
        let source = source(FakeConfig::with(&[]));
        assert_eq!(source.domain_locale("d1").await, "en");
    }

    #[tokio::test]
    async fn test_lookup_failure_defaults() {
        let source = source(FakeConfig::failing());
        assert_eq!(source.domain_locale("d1").await, "en");
    }

    #[tokio::test]
    async fn test_second_lookup_hits_cache() {
        let source = source(FakeConfig::with(&[("d1", "ko")]));
        assert_eq!(source.domain_locale("d1").await, "ko");
        assert_eq!(source.domain_locale("d1").await, "ko");
        assert_eq!(source.config.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_not_cached() {
        // A fallback result is not written to the cache, so the next
        // lookup retries the config service.
        let source = source(FakeConfig::failing());
        assert_eq!(source.domain_locale("d1").await, "en");
        assert_eq!(source.domain_locale("d1").await, "en");
        assert_eq!(source.config.calls.load(Ordering::SeqCst), 2);
    }
}
