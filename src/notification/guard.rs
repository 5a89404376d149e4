//! Send guard: idempotency gate for notification sends.
//!
//! One notification per (post, domain) pair per retry interval. The guard
//! key lives in the external cache with a TTL; once set it blocks every
//! send for that pair until it expires, regardless of what audience the
//! blocked send would have produced.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::CacheStore;

/// Idempotency gate backed by a time-expiring key-value store.
///
/// Fail-open: if the cache is unreachable the send proceeds. Losing
/// duplicate suppression for a window is preferred over blocking all
/// notification delivery on cache availability.
pub struct SendGuard<C> {
    cache: Arc<C>,
    retry_interval: Duration,
}

/// Guard key for a (post, domain) pair.
fn guard_key(post_id: &str, domain_id: &str) -> String {
    format!("notice:send-guard:{post_id}:{domain_id}")
}

impl<C> SendGuard<C>
where
    C: CacheStore,
{
    /// Create a guard over the given cache with the given retry interval.
    pub fn new(cache: Arc<C>, retry_interval: Duration) -> Self {
        Self {
            cache,
            retry_interval,
        }
    }

    /// The interval a blocked caller must wait before retrying.
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Try to acquire the send slot for a (post, domain) pair.
    ///
    /// Returns `false` if a send for the pair already happened within the
    /// retry interval. Returns `true` and records the attempt otherwise.
    /// The check and the set are separate cache round-trips; two truly
    /// concurrent requests can both pass the check before either sets the
    /// key.
    pub async fn try_acquire(&self, post_id: &str, domain_id: &str) -> bool {
        if !self.cache.is_available().await {
            warn!(post_id, domain_id, "send guard cache unavailable, proceeding without guard");
            return true;
        }

        let key = guard_key(post_id, domain_id);
        match self.cache.get(&key).await {
            Ok(Some(_)) => {
                debug!(post_id, domain_id, "send guard hit");
                false
            }
            Ok(None) => {
                if let Err(e) = self.cache.set(&key, "1", self.retry_interval).await {
                    warn!(post_id, domain_id, error = %e, "send guard set failed, proceeding");
                }
                true
            }
            Err(e) => {
                warn!(post_id, domain_id, error = %e, "send guard read failed, proceeding");
                true
            }
        }
    }
}
