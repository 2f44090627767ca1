//! Assignment notification sink. Delivery is an external concern; the
//! tracker only promises a best-effort, fire-and-forget hand-off.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::database::models::{Issue, User};
use crate::tracker::messages;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Tells `user` they were assigned `issue`. Callers treat failures as
    /// non-fatal; implementations must not block the update path for long.
    async fn notify_assignment(&self, user: &User, issue: &Issue) -> Result<()>;
}

/// Posts assignment events to a configured webhook, which fans out to
/// whatever channels the deployment wires up (mail, chat, ...).
pub struct WebhookNotifier {
    endpoint: Url,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(endpoint: Url) -> Self {
        WebhookNotifier {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_assignment(&self, user: &User, issue: &Issue) -> Result<()> {
        let payload = serde_json::json!({
            "event": "issue.assigned",
            "recipient": {
                "id": user.id,
                "name": user.name,
                "email": user.email,
            },
            "subject": messages::assignment_subject(issue),
            "body": messages::assignment_body(&user.name, issue),
            "issue": issue,
        });

        self.client
            .post(self.endpoint.as_str())
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Used when no webhook is configured.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify_assignment(&self, user: &User, issue: &Issue) -> Result<()> {
        debug!(
            "Notification sink disabled; dropping assignment of issue {} to {}",
            issue.id, user.id
        );
        Ok(())
    }
}
