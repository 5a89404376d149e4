//! Post notification pipeline.
//!
//! A send runs as one logical two-phase operation: the guard admits the
//! request, the gather phase resolves scope targets and aggregates the
//! recipient audience, and only once gathering has fully completed does the
//! fan-out phase hand messages to the mail transport.

mod audience;
mod dispatch;
mod guard;
mod scope;
mod service;
mod template;

pub use audience::{AudienceAggregator, AudienceGroups};
pub use dispatch::{DeliveryFailure, DispatchReport, NotificationDispatcher};
pub use guard::SendGuard;
pub use scope::{ResolvedTarget, ScopeResolver};
pub use service::NotificationService;
pub use template::{MessageTemplates, RenderedMessage};
