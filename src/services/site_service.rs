use url::Url;

use crate::domain::Site;
use crate::errors::{WatchError, WatchResult};
use crate::storage::{KeyValueStore, StateStore};

pub struct SiteService<S: KeyValueStore> {
    state: StateStore<S>,
}

impl<S: KeyValueStore> SiteService<S> {
    pub fn new(state: StateStore<S>) -> Self {
        Self { state }
    }

    /// Add a new site by URL
    /// Only http(s) addresses are accepted; the same URL cannot be added twice
    pub fn add(&self, url: &str, name: Option<String>) -> WatchResult<Site> {
        let url = validate_url(url)?;

        let mut sites = self.state.sites()?;
        if sites.iter().any(|s| same_site(&s.url, &url)) {
            return Err(WatchError::SiteAlreadyExists(url));
        }

        let site = Site::new(url, name);
        sites.push(site.clone());
        self.state.save_sites(&sites)?;

        Ok(site)
    }

    /// Remove a site by ID, together with its last-seen record and cache
    pub fn remove(&self, id: &str) -> WatchResult<Site> {
        let mut sites = self.state.sites()?;
        let index = sites
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| WatchError::SiteNotFound(id.to_string()))?;

        let removed = sites.remove(index);
        self.state.save_sites(&sites)?;
        self.state.forget_site(&removed.id)?;

        Ok(removed)
    }

    /// List all sites in insertion order
    pub fn list(&self) -> WatchResult<Vec<Site>> {
        self.state.sites()
    }

    /// Check if a site URL already exists
    pub fn exists(&self, url: &str) -> WatchResult<bool> {
        Ok(self.state.sites()?.iter().any(|s| same_site(&s.url, url)))
    }
}

fn validate_url(raw: &str) -> WatchResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WatchError::InvalidUrl("URL is empty".to_string()));
    }

    let parsed = Url::parse(trimmed)?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(WatchError::InvalidUrl(format!(
                "unsupported scheme '{}' in {}",
                other, trimmed
            )))
        }
    }
    if parsed.host_str().is_none() {
        return Err(WatchError::InvalidUrl(format!("missing host in {}", trimmed)));
    }

    Ok(trimmed.to_string())
}

/// URLs that differ only by trailing slashes point at the same site
fn same_site(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
