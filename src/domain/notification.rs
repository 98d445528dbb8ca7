use serde::Serialize;

use super::{FetchedItem, Site};

const NOTIFICATION_PREFIX: &str = "wp_new_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
}

impl Notification {
    /// Build the notification for a new post on `site`
    /// Id format: "wp_new_{siteId}_{unixMillis}"
    pub fn new_post(site: &Site, item: &FetchedItem, timestamp_millis: i64) -> Self {
        let body = if !item.title.is_empty() {
            item.title.clone()
        } else if !item.link.is_empty() {
            item.link.clone()
        } else {
            "New post available".to_string()
        };

        Self {
            id: format!("{}{}_{}", NOTIFICATION_PREFIX, site.id, timestamp_millis),
            title: format!("New post: {}", site.display_name()),
            body,
            link: item.link_opt().map(str::to_string),
        }
    }

    /// Format: "{title}: {body} {link (if any)}"
    pub fn format(&self) -> String {
        let mut message = format!("{}: {}", self.title, self.body);

        if let Some(link) = &self.link {
            if *link != self.body {
                message.push(' ');
                message.push_str(link);
            }
        }

        message
    }
}
