use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::FetchedItem;
use crate::errors::{WatchError, WatchResult};
use crate::sources::rss_feed;
use crate::sources::traits::{HttpClient, LatestPostSource};

const POSTS_ENDPOINT: &str = "/wp-json/wp/v2/posts?per_page=1&_fields=id,title,link,date";
const FEED_ENDPOINT: &str = "/feed";

/// Latest-post lookup for WordPress sites: REST API first, RSS feed second
pub struct WordPressSource<H: HttpClient> {
    http: H,
}

impl<H: HttpClient> WordPressSource<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// REST lookup. `Ok(None)` means the API answered without a usable post.
    fn fetch_from_api(&self, base: &str) -> WatchResult<Option<FetchedItem>> {
        let url = format!("{}{}", base, POSTS_ENDPOINT);
        let response = self.http.get(&url)?;

        if !response.is_success() {
            debug!(url = %url, status = response.status, "REST API returned non-success status");
            return Ok(None);
        }

        let json: Value = serde_json::from_str(&response.body)?;
        Ok(json
            .as_array()
            .and_then(|posts| posts.first())
            .map(item_from_post))
    }

    fn fetch_from_feed(&self, base: &str) -> WatchResult<Option<FetchedItem>> {
        let url = format!("{}{}", base, FEED_ENDPOINT);
        let response = self.http.get(&url)?;

        if !response.is_success() {
            return Err(WatchError::FeedUnavailable {
                url,
                status: response.status,
            });
        }

        rss_feed::first_item(response.body.as_bytes())
    }
}

impl<H: HttpClient> LatestPostSource for WordPressSource<H> {
    fn fetch_latest(&self, site_url: &str) -> WatchResult<Option<FetchedItem>> {
        let base = normalize_base(site_url);

        match self.fetch_from_api(base) {
            Ok(Some(item)) => return Ok(Some(item)),
            Ok(None) => debug!(site = %base, "no post from REST API, trying feed"),
            Err(e) => warn!(site = %base, error = %e, "REST API failed, trying feed"),
        }

        self.fetch_from_feed(base).inspect_err(|e| {
            warn!(site = %base, error = %e, "feed failed");
        })
    }
}

/// Strip trailing slashes so endpoint paths can be appended
pub fn normalize_base(site_url: &str) -> &str {
    site_url.trim_end_matches('/')
}

/// Map one element of the posts endpoint
fn item_from_post(post: &Value) -> FetchedItem {
    let id = match post.get("id") {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };

    // Title comes wrapped as {"rendered": "..."} unless _fields flattened it
    let title = match post.get("title") {
        Some(Value::Object(wrapper)) => wrapper
            .get("rendered")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    };

    let link = post
        .get("link")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let date = post
        .get("date")
        .and_then(Value::as_str)
        .map(str::to_string);

    FetchedItem::new(title, link).with_id(id).with_date(date)
}
