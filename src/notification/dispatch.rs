//! Fan-out phase: render per-locale messages and hand them to the mail
//! transport, one independent send per recipient.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{error, info};

use crate::mailer::MailTransport;
use crate::post::Post;

use super::audience::AudienceGroups;
use super::template::MessageTemplates;

/// One recipient the transport failed to deliver to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Recipient address.
    pub email: String,
    /// Transport error description.
    pub reason: String,
}

/// Outcome of one dispatch operation.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    /// Recipients a send was attempted for.
    pub attempted: usize,
    /// Recipients the transport accepted the message for.
    pub delivered: usize,
    /// Per-recipient failures, for observability. Failures never fail the
    /// operation and are not retried here; a re-send goes through a new
    /// guarded request after the retry interval.
    pub failures: Vec<DeliveryFailure>,
}

impl DispatchReport {
    /// Number of failed deliveries.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether nothing was attempted (empty audience).
    pub fn is_noop(&self) -> bool {
        self.attempted == 0
    }
}

/// Renders localized messages and fans them out to recipients.
pub struct NotificationDispatcher<M> {
    mailer: Arc<M>,
    templates: MessageTemplates,
    service_name: String,
    concurrency: usize,
}

impl<M> NotificationDispatcher<M>
where
    M: MailTransport,
{
    /// Create a dispatcher.
    ///
    /// `concurrency` bounds the number of in-flight transport sends.
    pub fn new(
        mailer: Arc<M>,
        templates: MessageTemplates,
        service_name: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            mailer,
            templates,
            service_name: service_name.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Send the post notification to every recipient in every locale group.
    ///
    /// Each recipient's send is independent; a failure is logged and
    /// counted in the report but never aborts the remaining sends.
    pub async fn dispatch(&self, groups: &AudienceGroups, post: &Post) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (locale, recipients) in groups {
            if recipients.is_empty() {
                continue;
            }

            let message =
                self.templates
                    .render(locale, &self.service_name, &post.title, &post.contents);

            let outcomes: Vec<(String, Result<(), String>)> = stream::iter(recipients)
                .map(|email| {
                    let message = &message;
                    async move {
                        let result = self
                            .mailer
                            .send(email, &message.subject, &message.body)
                            .await
                            .map_err(|e| e.to_string());
                        (email.clone(), result)
                    }
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

            for (email, outcome) in outcomes {
                report.attempted += 1;
                match outcome {
                    Ok(()) => report.delivered += 1,
                    Err(reason) => {
                        error!(
                            post_id = %post.post_id,
                            email = %email,
                            error = %reason,
                            "failed to send notification email"
                        );
                        report.failures.push(DeliveryFailure { email, reason });
                    }
                }
            }
        }

        report.failures.sort_by(|a, b| a.email.cmp(&b.email));
        info!(
            post_id = %post.post_id,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed(),
            "notification dispatch finished"
        );
        report
    }
}
