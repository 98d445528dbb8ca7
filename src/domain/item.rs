use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The latest post reported by a site, from either the REST API or the feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub date: Option<String>,
}

impl FetchedItem {
    pub fn new(title: String, link: String) -> Self {
        Self {
            id: None,
            title,
            link,
            date: None,
        }
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id.filter(|id| !id.is_empty());
        self
    }

    pub fn with_date(mut self, date: Option<String>) -> Self {
        self.date = date;
        self
    }

    /// Link, or `None` when the source reported none
    pub fn link_opt(&self) -> Option<&str> {
        Some(self.link.as_str()).filter(|l| !l.is_empty())
    }
}

/// The item that most recently triggered a notification for a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastSeen {
    #[serde(rename = "postId", default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: String,
}

impl LastSeen {
    pub fn from_item(item: &FetchedItem) -> Self {
        Self {
            post_id: item.id.clone(),
            link: item.link_opt().map(str::to_string),
            title: item.title.clone(),
            date: item
                .date
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

/// Site id -> last notified item
pub type LastSeenMap = HashMap<String, LastSeen>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_id_drops_empty() {
        let item = FetchedItem::new("t".to_string(), "l".to_string()).with_id(Some(String::new()));
        assert_eq!(item.id, None);
    }

    #[test]
    fn test_last_seen_copies_item() {
        let item = FetchedItem::new("Hello".to_string(), "https://a.example/hello".to_string())
            .with_id(Some("11".to_string()))
            .with_date(Some("2024-01-01T00:00:00".to_string()));

        let last = LastSeen::from_item(&item);

        assert_eq!(last.post_id.as_deref(), Some("11"));
        assert_eq!(last.link.as_deref(), Some("https://a.example/hello"));
        assert_eq!(last.title, "Hello");
        assert_eq!(last.date, "2024-01-01T00:00:00");
    }

    #[test]
    fn test_last_seen_defaults_date_and_empty_link() {
        let item = FetchedItem::new("Hello".to_string(), String::new());
        let last = LastSeen::from_item(&item);

        assert_eq!(last.link, None);
        assert!(chrono::DateTime::parse_from_rfc3339(&last.date).is_ok());
    }

    #[test]
    fn test_last_seen_serializes_post_id_key() {
        let last = LastSeen {
            post_id: Some("10".to_string()),
            link: None,
            title: String::new(),
            date: String::new(),
        };
        let json = serde_json::to_value(&last).unwrap();
        assert_eq!(json["postId"], "10");
        assert!(json["link"].is_null());
    }
}
