//! Client interface for the directory (identity) service.
//!
//! The directory service owns domains, workspaces and users. This crate
//! only queries it; implementations of [`DirectoryClient`] wrap whatever
//! transport the deployment uses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BoardError;

/// Directory query errors.
#[derive(Error, Debug, Clone)]
pub enum DirectoryError {
    /// The directory service could not be reached.
    #[error("directory service unavailable: {0}")]
    Unavailable(String),
    /// The directory service rejected or failed the query.
    #[error("directory query failed: {0}")]
    Query(String),
}

impl From<DirectoryError> for BoardError {
    fn from(e: DirectoryError) -> Self {
        BoardError::Dependency(e.to_string())
    }
}

/// Lifecycle state of a directory resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceState {
    /// Resource is active and should receive notifications.
    Enabled,
    /// Resource is deactivated and must be skipped.
    Disabled,
}

/// A page of directory results with the total count reported by the service.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    /// Returned records.
    pub results: Vec<T>,
    /// Total matching records on the service side.
    pub total_count: usize,
}

impl<T> Listing<T> {
    /// Build a listing whose total count equals the result length.
    pub fn new(results: Vec<T>) -> Self {
        let total_count = results.len();
        Self {
            results,
            total_count,
        }
    }
}

/// Domain record as reported by the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Domain identifier.
    pub domain_id: String,
    /// Lifecycle state.
    pub state: ResourceState,
}

/// Workspace record as reported by the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceRecord {
    /// Workspace identifier.
    pub workspace_id: String,
    /// Owning domain identifier.
    pub domain_id: String,
    /// Lifecycle state.
    pub state: ResourceState,
}

/// User record as reported by the directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// User identifier.
    pub user_id: String,
    /// Email address.
    pub email: String,
    /// Lifecycle state.
    pub state: ResourceState,
    /// Whether the email address has been verified.
    pub email_verified: bool,
}

/// Filter for domain listing.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    /// Required lifecycle state.
    pub state: ResourceState,
}

/// Filter for workspace listing.
#[derive(Debug, Clone)]
pub struct WorkspaceFilter {
    /// Owning domain.
    pub domain_id: String,
    /// Required lifecycle state.
    pub state: ResourceState,
}

/// Filter for domain-wide user listing.
#[derive(Debug, Clone)]
pub struct UserFilter {
    /// Owning domain.
    pub domain_id: String,
    /// Required lifecycle state.
    pub state: ResourceState,
    /// Required email verification state.
    pub email_verified: bool,
}

/// Filter for workspace member listing.
#[derive(Debug, Clone)]
pub struct WorkspaceMemberFilter {
    /// Workspace to list members of.
    pub workspace_id: String,
    /// Owning domain.
    pub domain_id: String,
    /// Required lifecycle state.
    pub state: ResourceState,
    /// Required email verification state.
    pub email_verified: bool,
}

/// Narrow client contract for directory queries.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// List domains matching the filter.
    async fn list_domains(
        &self,
        filter: &DomainFilter,
    ) -> std::result::Result<Listing<DomainRecord>, DirectoryError>;

    /// List workspaces matching the filter.
    async fn list_workspaces(
        &self,
        filter: &WorkspaceFilter,
    ) -> std::result::Result<Listing<WorkspaceRecord>, DirectoryError>;

    /// List users of a domain matching the filter.
    async fn list_users(
        &self,
        filter: &UserFilter,
    ) -> std::result::Result<Listing<UserRecord>, DirectoryError>;

    /// List members of a workspace matching the filter.
    async fn list_workspace_members(
        &self,
        filter: &WorkspaceMemberFilter,
    ) -> std::result::Result<Listing<UserRecord>, DirectoryError>;
}
