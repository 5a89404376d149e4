//! Scope resolution: which domains and workspaces a post targets.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::directory::{DirectoryClient, DomainFilter, ResourceState, WorkspaceFilter};
use crate::post::{Post, PostScope};
use crate::Result;

/// One notification target produced by scope resolution.
///
/// Ephemeral; lives for a single send operation and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolvedTarget {
    /// Domain the target belongs to.
    pub domain_id: String,
    /// Workspace within the domain, for workspace-scoped posts.
    pub workspace_id: Option<String>,
}

impl ResolvedTarget {
    /// Domain-wide target.
    pub fn domain(domain_id: impl Into<String>) -> Self {
        Self {
            domain_id: domain_id.into(),
            workspace_id: None,
        }
    }

    /// Workspace target within a domain.
    pub fn workspace(domain_id: impl Into<String>, workspace_id: impl Into<String>) -> Self {
        Self {
            domain_id: domain_id.into(),
            workspace_id: Some(workspace_id.into()),
        }
    }
}

/// Turns a post's visibility scope into notification targets.
pub struct ScopeResolver<D> {
    directory: Arc<D>,
}

impl<D> ScopeResolver<D>
where
    D: DirectoryClient,
{
    /// Create a resolver over the given directory client.
    pub fn new(directory: Arc<D>) -> Self {
        Self { directory }
    }

    /// Resolve the post's scope to a deterministic, sorted target list.
    ///
    /// Only targets in enabled state are returned; workspace ids stored on
    /// the post that are no longer enabled are silently dropped.
    ///
    /// # Errors
    ///
    /// Returns a dependency error if a directory query fails. No partial
    /// result is ever returned.
    pub async fn resolve(&self, post: &Post) -> Result<Vec<ResolvedTarget>> {
        let targets = match post.scope {
            PostScope::System => self.resolve_system().await?,
            PostScope::Domain => vec![ResolvedTarget::domain(&post.domain_id)],
            PostScope::Workspace => self.resolve_workspaces(post).await?,
        };
        debug!(
            post_id = %post.post_id,
            scope = ?post.scope,
            target_count = targets.len(),
            "resolved notification targets"
        );
        Ok(targets)
    }

    async fn resolve_system(&self) -> Result<Vec<ResolvedTarget>> {
        let listing = self
            .directory
            .list_domains(&DomainFilter {
                state: ResourceState::Enabled,
            })
            .await?;

        let mut targets: Vec<ResolvedTarget> = listing
            .results
            .into_iter()
            .filter(|d| d.state == ResourceState::Enabled)
            .map(|d| ResolvedTarget::domain(d.domain_id))
            .collect();
        targets.sort();
        targets.dedup();
        Ok(targets)
    }

    async fn resolve_workspaces(&self, post: &Post) -> Result<Vec<ResolvedTarget>> {
        let listing = self
            .directory
            .list_workspaces(&WorkspaceFilter {
                domain_id: post.domain_id.clone(),
                state: ResourceState::Enabled,
            })
            .await?;

        let enabled: BTreeSet<String> = listing
            .results
            .into_iter()
            .filter(|w| w.state == ResourceState::Enabled)
            .map(|w| w.workspace_id)
            .collect();

        // Intersect with the workspace ids stored on the post; ids that are
        // gone or disabled are dropped without error.
        let requested: BTreeSet<&String> = post.workspaces.iter().collect();
        let targets = requested
            .into_iter()
            .filter(|id| enabled.contains(*id))
            .map(|id| ResolvedTarget::workspace(&post.domain_id, id))
            .collect();
        Ok(targets)
    }
}
