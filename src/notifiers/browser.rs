use crate::errors::{WatchError, WatchResult};
use crate::notifiers::traits::LinkOpener;

/// Opens links in the user's default browser
#[derive(Debug, Default)]
pub struct BrowserOpener;

impl LinkOpener for BrowserOpener {
    fn open(&self, url: &str) -> WatchResult<()> {
        url::Url::parse(url)?;
        webbrowser::open(url).map_err(|e| WatchError::Notification(format!("cannot open {}: {}", url, e)))
    }
}
