use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;

use crate::domain::Notification;
use crate::errors::{WatchError, WatchResult};
use crate::notifiers::traits::Notifier;

/// Bodies longer than this are cut before posting
const MAX_BODY_CHARS: usize = 1000;

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    id: &'a str,
    title: &'a str,
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
}

/// POSTs each notification as JSON to a configured endpoint
pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout: Duration) -> WatchResult<Self> {
        url::Url::parse(url)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    fn payload(notification: &Notification) -> WebhookPayload<'_> {
        WebhookPayload {
            id: &notification.id,
            title: &notification.title,
            body: truncate_to_char_boundary(&notification.body, MAX_BODY_CHARS),
            link: notification.link.as_deref(),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    fn create(&self, notification: &Notification) -> WatchResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(notification))
            .send()?;

        if !response.status().is_success() {
            return Err(WatchError::Notification(format!(
                "webhook returned HTTP {}",
                response.status().as_u16()
            )));
        }
        Ok(())
    }
}

/// Truncate string to at most `max_chars` characters, respecting char boundaries
fn truncate_to_char_boundary(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
