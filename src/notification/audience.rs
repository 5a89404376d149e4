//! Audience aggregation: from resolved targets to locale-grouped recipients.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::cache::CacheStore;
use crate::directory::{
    DirectoryClient, DirectoryError, ResourceState, UserFilter, WorkspaceMemberFilter,
};
use crate::settings::{ConfigClient, LocaleSource};
use crate::Result;

use super::scope::ResolvedTarget;

/// Deduplicated recipient addresses grouped by locale.
///
/// Ordered maps and sets keep the merge deterministic regardless of the
/// completion order of the per-target sub-queries.
pub type AudienceGroups = BTreeMap<String, BTreeSet<String>>;

/// Builds the recipient audience for a set of resolved targets.
///
/// Recipients must be in enabled state with a verified email address. Each
/// target's locale comes from the per-domain settings lookup; a failed
/// lookup falls back to the default locale without affecting other targets.
pub struct AudienceAggregator<D, S, C> {
    directory: Arc<D>,
    locales: LocaleSource<S, C>,
    concurrency: usize,
}

impl<D, S, C> AudienceAggregator<D, S, C>
where
    D: DirectoryClient,
    S: ConfigClient,
    C: CacheStore,
{
    /// Create an aggregator.
    ///
    /// `concurrency` bounds the number of in-flight directory/config
    /// sub-queries during the gather phase.
    pub fn new(directory: Arc<D>, locales: LocaleSource<S, C>, concurrency: usize) -> Self {
        Self {
            directory,
            locales,
            concurrency: concurrency.max(1),
        }
    }

    /// Aggregate recipients for all targets into locale groups.
    ///
    /// An empty result (no targets, or no recipients anywhere) is a valid
    /// no-op audience, not an error.
    ///
    /// # Errors
    ///
    /// Returns a dependency error if any recipient lookup fails; the whole
    /// aggregation aborts rather than producing a partial audience.
    pub async fn aggregate(&self, targets: &[ResolvedTarget]) -> Result<AudienceGroups> {
        let fetched: Vec<(String, Vec<String>)> = stream::iter(targets)
            .map(|target| self.fetch_target(target))
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        let mut groups = AudienceGroups::new();
        for (locale, emails) in fetched {
            let group = groups.entry(locale).or_default();
            for email in emails {
                group.insert(email);
            }
        }

        debug!(
            locales = groups.len(),
            recipients = groups.values().map(BTreeSet::len).sum::<usize>(),
            "aggregated notification audience"
        );
        Ok(groups)
    }

    /// Fetch recipients and locale for one target.
    async fn fetch_target(
        &self,
        target: &ResolvedTarget,
    ) -> std::result::Result<(String, Vec<String>), DirectoryError> {
        let listing = match &target.workspace_id {
            Some(workspace_id) => {
                self.directory
                    .list_workspace_members(&WorkspaceMemberFilter {
                        workspace_id: workspace_id.clone(),
                        domain_id: target.domain_id.clone(),
                        state: ResourceState::Enabled,
                        email_verified: true,
                    })
                    .await?
            }
            None => {
                self.directory
                    .list_users(&UserFilter {
                        domain_id: target.domain_id.clone(),
                        state: ResourceState::Enabled,
                        email_verified: true,
                    })
                    .await?
            }
        };

        let emails = listing
            .results
            .into_iter()
            .filter(|u| u.state == ResourceState::Enabled && u.email_verified)
            .map(|u| u.email)
            .collect();

        let locale = self.locales.domain_locale(&target.domain_id).await;
        Ok((locale, emails))
    }
}
