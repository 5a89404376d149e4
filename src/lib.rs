//! bulletin - notice board backend core.
//!
//! This crate implements the post distribution subsystem of a notice board
//! service: resolving which recipients should be notified for a post based
//! on its visibility scope, deduplicating and localizing that audience,
//! guarding against duplicate sends, and sanitizing untrusted rich-text
//! content before it is ever stored.
//!
//! Persistence, transport parsing and authorization are external concerns;
//! this crate talks to them through the narrow client traits in
//! [`directory`], [`settings`], [`cache`] and [`mailer`].

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod mailer;
pub mod notification;
pub mod post;
pub mod sanitize;
pub mod settings;

pub use cache::{CacheError, CacheStore, MemoryCache};
pub use config::{Config, LoggingConfig, NotificationConfig, ServiceConfig};
pub use directory::{
    DirectoryClient, DirectoryError, DomainFilter, DomainRecord, Listing, ResourceState,
    UserFilter, UserRecord, WorkspaceFilter, WorkspaceMemberFilter, WorkspaceRecord,
};
pub use error::{BoardError, Result};
pub use mailer::{MailError, MailTransport};
pub use notification::{
    AudienceAggregator, AudienceGroups, DeliveryFailure, DispatchReport, MessageTemplates,
    NotificationDispatcher, NotificationService, ResolvedTarget, ScopeResolver, SendGuard,
};
pub use post::{validate_options, Post, PostDraft, PostScope};
pub use sanitize::ContentSanitizer;
pub use settings::{ConfigClient, DomainSettings, LocaleSource, SettingsError};
