use crate::domain::Notification;
use crate::errors::WatchResult;

/// A place notifications are delivered to
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn create(&self, notification: &Notification) -> WatchResult<()>;
}

/// Opens an item link when a notification or cached entry is clicked
#[cfg_attr(test, mockall::automock)]
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str) -> WatchResult<()>;
}
