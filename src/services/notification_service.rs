use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::{FetchedItem, Notification, Site};
use crate::errors::{WatchError, WatchResult};
use crate::notifiers::{LinkOpener, Notifier};

const CLICK_TTL: Duration = Duration::from_secs(60 * 60);
const CLICK_CAPACITY: usize = 256;

/// Notification id -> link, kept for a limited time
struct ClickRegistry {
    entries: HashMap<String, (String, Instant)>,
    ttl: Duration,
    capacity: usize,
}

impl ClickRegistry {
    fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity,
        }
    }

    fn insert(&mut self, id: String, link: String, now: Instant) {
        self.prune(now);
        if self.entries.len() >= self.capacity {
            // evict the oldest entry
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, (_, at))| *at)
                .map(|(id, _)| id.clone())
            {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(id, (link, now));
    }

    fn take(&mut self, id: &str, now: Instant) -> Option<String> {
        self.prune(now);
        self.entries.remove(id).map(|(link, _)| link)
    }

    fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, (_, at)| now.saturating_duration_since(*at) < ttl);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Fans notifications out to every sink and remembers their links so a
/// single click handler can open them later
pub struct NotificationService {
    notifiers: Vec<Box<dyn Notifier>>,
    opener: Box<dyn LinkOpener>,
    clicks: Mutex<ClickRegistry>,
}

impl NotificationService {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>, opener: Box<dyn LinkOpener>) -> Self {
        Self {
            notifiers,
            opener,
            clicks: Mutex::new(ClickRegistry::new(CLICK_TTL, CLICK_CAPACITY)),
        }
    }

    /// Announce a new post. Sink failures are logged and do not fail the call.
    pub fn notify_new_post(&self, site: &Site, item: &FetchedItem) -> Notification {
        let notification = Notification::new_post(site, item, Utc::now().timestamp_millis());

        if let Some(link) = &notification.link {
            match self.clicks.lock() {
                Ok(mut clicks) => clicks.insert(notification.id.clone(), link.clone(), Instant::now()),
                Err(_) => warn!("click registry lock poisoned; link will not be clickable"),
            }
        }

        for notifier in &self.notifiers {
            if let Err(e) = notifier.create(&notification) {
                warn!(notifier = notifier.name(), id = %notification.id, error = %e, "notification failed");
            }
        }

        notification
    }

    /// Open the link behind a clicked notification.
    /// Returns `false` when the id is unknown or expired.
    pub fn handle_click(&self, notification_id: &str) -> WatchResult<bool> {
        let link = self
            .clicks
            .lock()
            .map_err(|_| WatchError::Notification("click registry lock poisoned".to_string()))?
            .take(notification_id, Instant::now());

        match link {
            Some(link) => {
                self.opener.open(&link)?;
                Ok(true)
            }
            None => {
                debug!(id = %notification_id, "click on unknown notification");
                Ok(false)
            }
        }
    }
}
