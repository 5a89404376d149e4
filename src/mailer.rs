//! Outbound mail transport interface.
//!
//! The core composes messages and hands them off; the actual SMTP (or API)
//! transport lives outside this crate behind [`MailTransport`].

use async_trait::async_trait;
use thiserror::Error;

/// Mail transport errors.
#[derive(Error, Debug, Clone)]
pub enum MailError {
    /// The transport refused or failed to deliver the message.
    #[error("mail delivery failed: {0}")]
    Delivery(String),
    /// The transport could not be reached.
    #[error("mail transport unavailable: {0}")]
    Unavailable(String),
}

/// Narrow contract for handing a composed message to the mail transport.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send one message to one recipient.
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> std::result::Result<(), MailError>;
}
