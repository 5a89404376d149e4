//! Shared mock collaborators for integration tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use bulletin::{
    ConfigClient, DirectoryClient, DirectoryError, DomainFilter, DomainRecord, DomainSettings,
    Listing, MailError, MailTransport, ResourceState, SettingsError, UserFilter, UserRecord,
    WorkspaceFilter, WorkspaceMemberFilter, WorkspaceRecord,
};

/// In-memory directory service fixture.
#[derive(Default)]
pub struct MockDirectory {
    pub domains: Vec<DomainRecord>,
    pub workspaces: Vec<WorkspaceRecord>,
    /// domain_id -> users
    pub users: HashMap<String, Vec<UserRecord>>,
    /// workspace_id -> members
    pub members: HashMap<String, Vec<UserRecord>>,
    pub fail: bool,
}

impl MockDirectory {
    pub fn with_domain(mut self, domain_id: &str, state: ResourceState) -> Self {
        self.domains.push(DomainRecord {
            domain_id: domain_id.to_string(),
            state,
        });
        self
    }

    pub fn with_workspace(mut self, workspace_id: &str, domain_id: &str) -> Self {
        self.workspaces.push(WorkspaceRecord {
            workspace_id: workspace_id.to_string(),
            domain_id: domain_id.to_string(),
            state: ResourceState::Enabled,
        });
        self
    }

    pub fn with_user(mut self, domain_id: &str, email: &str) -> Self {
        self.users
            .entry(domain_id.to_string())
            .or_default()
            .push(verified_user(email));
        self
    }

    pub fn with_member(mut self, workspace_id: &str, email: &str) -> Self {
        self.members
            .entry(workspace_id.to_string())
            .or_default()
            .push(verified_user(email));
        self
    }
}

pub fn verified_user(email: &str) -> UserRecord {
    UserRecord {
        user_id: email.to_string(),
        email: email.to_string(),
        state: ResourceState::Enabled,
        email_verified: true,
    }
}

#[async_trait]
impl DirectoryClient for MockDirectory {
    async fn list_domains(
        &self,
        filter: &DomainFilter,
    ) -> Result<Listing<DomainRecord>, DirectoryError> {
        if self.fail {
            return Err(DirectoryError::Unavailable("directory down".to_string()));
        }
        Ok(Listing::new(
            self.domains
                .iter()
                .filter(|d| d.state == filter.state)
                .cloned()
                .collect(),
        ))
    }

    async fn list_workspaces(
        &self,
        filter: &WorkspaceFilter,
    ) -> Result<Listing<WorkspaceRecord>, DirectoryError> {
        if self.fail {
            return Err(DirectoryError::Unavailable("directory down".to_string()));
        }
        Ok(Listing::new(
            self.workspaces
                .iter()
                .filter(|w| w.domain_id == filter.domain_id && w.state == filter.state)
                .cloned()
                .collect(),
        ))
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
    ) -> Result<Listing<UserRecord>, DirectoryError> {
        if self.fail {
            return Err(DirectoryError::Unavailable("directory down".to_string()));
        }
        Ok(Listing::new(
            self.users
                .get(&filter.domain_id)
                .cloned()
                .unwrap_or_default(),
        ))
    }

    async fn list_workspace_members(
        &self,
        filter: &WorkspaceMemberFilter,
    ) -> Result<Listing<UserRecord>, DirectoryError> {
        if self.fail {
            return Err(DirectoryError::Unavailable("directory down".to_string()));
        }
        Ok(Listing::new(
            self.members
                .get(&filter.workspace_id)
                .cloned()
                .unwrap_or_default(),
        ))
    }
}

/// In-memory config service fixture.
#[derive(Default)]
pub struct MockConfigService {
    /// domain_id -> language
    pub languages: HashMap<String, String>,
    /// Domains whose settings lookup fails.
    pub fail_for: HashSet<String>,
}

impl MockConfigService {
    pub fn with_language(mut self, domain_id: &str, language: &str) -> Self {
        self.languages
            .insert(domain_id.to_string(), language.to_string());
        self
    }

    pub fn failing_for(mut self, domain_id: &str) -> Self {
        self.fail_for.insert(domain_id.to_string());
        self
    }
}

#[async_trait]
impl ConfigClient for MockConfigService {
    async fn get_domain_settings(&self, domain_id: &str) -> Result<DomainSettings, SettingsError> {
        if self.fail_for.contains(domain_id) {
            return Err(SettingsError::Query("settings missing".to_string()));
        }
        Ok(DomainSettings {
            language: self.languages.get(domain_id).cloned(),
        })
    }
}

/// Mail transport fixture recording every accepted message.
#[derive(Default)]
pub struct MockMailer {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail_for: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MockMailer {
    pub fn failing_for(mut self, email: &str) -> Self {
        self.fail_for.insert(email.to_string());
        self
    }

    pub fn recipients(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|m| m.to.clone()).collect()
    }
}

#[async_trait]
impl MailTransport for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if self.fail_for.contains(to) {
            return Err(MailError::Delivery("rejected by server".to_string()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
