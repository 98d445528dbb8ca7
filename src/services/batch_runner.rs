use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use crate::domain::{CheckResult, FetchedItem, LastSeen, LastSeenMap, Site};
use crate::errors::{WatchError, WatchResult};
use crate::services::notification_service::NotificationService;
use crate::sources::LatestPostSource;
use crate::storage::{KeyValueStore, StateStore};
use crate::tracking::{is_new, update_cache};

/// Releases the in-progress marker when the batch ends, however it ends
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BatchRunner<P: LatestPostSource, S: KeyValueStore> {
    source: P,
    state: StateStore<S>,
    notifications: NotificationService,
    running: AtomicBool,
}

impl<P: LatestPostSource, S: KeyValueStore> BatchRunner<P, S> {
    pub fn new(source: P, state: StateStore<S>, notifications: NotificationService) -> Self {
        Self {
            source,
            state,
            notifications,
            running: AtomicBool::new(false),
        }
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.notifications
    }

    /// Check every configured site once.
    /// Sites removed while the batch was running stay removed.
    pub fn run(&self) -> WatchResult<Vec<CheckResult>> {
        let _guard = self.begin()?;
        let (sites, last_seen) = self.state.batch_state()?;
        let (results, mut last_seen) = self.check_all(&sites, last_seen);

        let current = self.state.sites()?;
        for site in sites.iter().filter(|s| !current.iter().any(|c| c.id == s.id)) {
            debug!(site = %site.url, "site removed during batch");
            last_seen.remove(&site.id);
            self.state.remove_cache(&site.id)?;
        }

        self.finish(sites.len(), &results, &last_seen)?;
        Ok(results)
    }

    /// Check `sites` in order against `last_seen`, then persist the updated
    /// map in a single write. Sites whose source reports no post produce no
    /// result entry; a failing site is recorded and the batch moves on.
    pub fn run_batch(
        &self,
        sites: &[Site],
        last_seen: LastSeenMap,
    ) -> WatchResult<(Vec<CheckResult>, LastSeenMap)> {
        let _guard = self.begin()?;
        let (results, last_seen) = self.check_all(sites, last_seen);
        self.finish(sites.len(), &results, &last_seen)?;
        Ok((results, last_seen))
    }

    fn check_all(
        &self,
        sites: &[Site],
        mut last_seen: LastSeenMap,
    ) -> (Vec<CheckResult>, LastSeenMap) {
        let mut results = Vec::new();

        for site in sites {
            match self.check_site(site, &mut last_seen) {
                Ok(Some((latest, new))) => {
                    results.push(CheckResult::success(&site.url, latest, new));
                }
                Ok(None) => {
                    debug!(site = %site.url, "site has no posts");
                }
                Err(e) => {
                    warn!(site = %site.url, error = %e, "error checking site");
                    results.push(CheckResult::failure(&site.url, e.to_string()));
                }
            }
        }

        (results, last_seen)
    }

    fn finish(
        &self,
        site_count: usize,
        results: &[CheckResult],
        last_seen: &LastSeenMap,
    ) -> WatchResult<()> {
        self.state.save_last_seen(last_seen)?;

        info!(
            sites = site_count,
            failed = results.iter().filter(|r| !r.ok).count(),
            new = results.iter().filter(|r| r.is_new).count(),
            "batch complete"
        );
        Ok(())
    }

    fn begin(&self) -> WatchResult<RunGuard<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| WatchError::BatchInProgress)?;
        Ok(RunGuard(&self.running))
    }

    fn check_site(
        &self,
        site: &Site,
        last_seen: &mut LastSeenMap,
    ) -> WatchResult<Option<(FetchedItem, bool)>> {
        let Some(latest) = self.source.fetch_latest(&site.url)? else {
            return Ok(None);
        };

        let new = is_new(&latest, last_seen.get(&site.id));
        if new {
            self.notifications.notify_new_post(site, &latest);
            last_seen.insert(site.id.clone(), LastSeen::from_item(&latest));
        }

        // The cache tracks recent fetches, not only new posts
        let cached = self.state.cache(&site.id)?;
        self.state
            .save_cache(&site.id, &update_cache(&cached, latest.clone()))?;

        Ok(Some((latest, new)))
    }
}
