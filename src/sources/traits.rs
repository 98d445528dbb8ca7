use crate::domain::FetchedItem;
use crate::errors::WatchResult;

/// Status and body of a completed GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Issue a plain GET; non-success statuses are returned, not raised
    fn get(&self, url: &str) -> WatchResult<HttpResponse>;
}

#[cfg_attr(test, mockall::automock)]
pub trait LatestPostSource: Send + Sync {
    /// Fetch the most recent post of the site at `site_url`.
    /// `Ok(None)` means the site has no posts.
    fn fetch_latest(&self, site_url: &str) -> WatchResult<Option<FetchedItem>>;
}
