//! Send orchestration: guard, gather, fan-out.

use std::sync::Arc;

use tracing::info;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::mailer::MailTransport;
use crate::post::Post;
use crate::settings::{ConfigClient, LocaleSource};
use crate::{BoardError, Result};

use super::audience::AudienceAggregator;
use super::dispatch::{DispatchReport, NotificationDispatcher};
use super::guard::SendGuard;
use super::scope::ScopeResolver;
use super::template::MessageTemplates;

/// Orchestrates a post notification send.
///
/// Collaborators are injected at construction; the service owns no state
/// beyond them and is safe to share behind an `Arc`.
pub struct NotificationService<D, S, C, M> {
    guard: SendGuard<C>,
    resolver: ScopeResolver<D>,
    aggregator: AudienceAggregator<D, S, C>,
    dispatcher: NotificationDispatcher<M>,
}

impl<D, S, C, M> NotificationService<D, S, C, M>
where
    D: DirectoryClient,
    S: ConfigClient,
    C: CacheStore,
    M: MailTransport,
{
    /// Wire up the pipeline from its collaborators and configuration.
    pub fn new(
        directory: Arc<D>,
        config_client: Arc<S>,
        cache: Arc<C>,
        mailer: Arc<M>,
        templates: MessageTemplates,
        config: &Config,
    ) -> Self {
        let locales = LocaleSource::new(
            Arc::clone(&config_client),
            Arc::clone(&cache),
            config.notification.settings_cache_ttl(),
            config.service.default_locale.clone(),
        );
        Self {
            guard: SendGuard::new(Arc::clone(&cache), config.notification.retry_interval()),
            resolver: ScopeResolver::new(Arc::clone(&directory)),
            aggregator: AudienceAggregator::new(
                directory,
                locales,
                config.notification.gather_concurrency,
            ),
            dispatcher: NotificationDispatcher::new(
                mailer,
                templates,
                config.service.name.clone(),
                config.notification.fanout_concurrency,
            ),
        }
    }

    /// Send the notification for a post to its resolved audience.
    ///
    /// The gather phase (scope resolution and audience aggregation) runs to
    /// completion before any message is handed to the transport; an error
    /// during gathering dispatches nothing. An empty audience is a
    /// successful no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AlreadySent`] if the guard window for this
    /// (post, domain) pair has not elapsed, or [`BoardError::Dependency`]
    /// if a directory query fails.
    pub async fn send(&self, post: &Post) -> Result<DispatchReport> {
        if !self.guard.try_acquire(&post.post_id, &post.domain_id).await {
            return Err(BoardError::AlreadySent {
                post_id: post.post_id.clone(),
                domain_id: post.domain_id.clone(),
                retry_after: self.guard.retry_interval(),
            });
        }

        // Gather phase. Must complete in full before any send happens.
        let targets = self.resolver.resolve(post).await?;
        let groups = self.aggregator.aggregate(&targets).await?;

        if groups.values().all(|g| g.is_empty()) {
            info!(post_id = %post.post_id, "no recipients resolved, nothing to send");
            return Ok(DispatchReport::default());
        }

        // Fan-out phase.
        Ok(self.dispatcher.dispatch(&groups, post).await)
    }
}
