use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::errors::WatchResult;
use crate::storage::{KeyValueStore, StateStore};

/// Name of the periodic check trigger
pub const ALARM_NAME: &str = "wp_check_alarm";

const MINUTE: Duration = Duration::from_secs(60);

/// Periodic trigger for batch runs, re-armed whenever the interval changes
pub struct Scheduler {
    interval_minutes: u32,
    unit: Duration,
    ticker: Option<Interval>,
}

impl Scheduler {
    pub fn new(interval_minutes: u32) -> Self {
        Self::with_unit(interval_minutes, MINUTE)
    }

    /// `unit` is the length of one "minute"; shortened in tests
    fn with_unit(interval_minutes: u32, unit: Duration) -> Self {
        Self {
            interval_minutes: interval_minutes.max(1),
            unit,
            ticker: None,
        }
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn period(&self) -> Duration {
        self.unit * self.interval_minutes
    }

    pub fn set_interval(&mut self, minutes: u32) {
        self.interval_minutes = minutes.max(1);
        self.reschedule();
    }

    /// Drop the current trigger and arm a new one; the first tick comes one
    /// full period from now. Must run inside a tokio runtime.
    pub fn reschedule(&mut self) {
        let period = self.period();
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.ticker = Some(ticker);

        info!(alarm = ALARM_NAME, minutes = self.interval_minutes, "trigger armed");
    }

    /// Wait for the next trigger, arming one first if needed
    pub async fn tick(&mut self) {
        if self.ticker.is_none() {
            self.reschedule();
        }
        if let Some(ticker) = self.ticker.as_mut() {
            ticker.tick().await;
        }
    }
}

pub struct SchedulerHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    pub async fn stop(self) -> WatchResult<()> {
        let _ = self.cancel_tx.send(());
        self.join.await?;
        Ok(())
    }
}

/// Run `trigger` on the blocking pool at every tick of `scheduler`, following
/// interval updates published on `interval_rx`.
pub fn spawn_scheduler<F>(
    mut scheduler: Scheduler,
    mut interval_rx: watch::Receiver<u32>,
    trigger: F,
) -> SchedulerHandle
where
    F: Fn() + Send + Sync + 'static,
{
    let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
    let trigger = Arc::new(trigger);

    let join = tokio::spawn(async move {
        scheduler.reschedule();
        let mut settings_open = true;

        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("scheduler shutdown requested");
                    break;
                }
                changed = interval_rx.changed(), if settings_open => {
                    if changed.is_err() {
                        debug!("interval publisher closed; keeping current interval");
                        settings_open = false;
                        continue;
                    }
                    let minutes = *interval_rx.borrow_and_update();
                    if minutes != scheduler.interval_minutes() {
                        scheduler.set_interval(minutes);
                    }
                }
                _ = scheduler.tick() => {
                    debug!(alarm = ALARM_NAME, "trigger fired");
                    let trigger = Arc::clone(&trigger);
                    if let Err(e) = tokio::task::spawn_blocking(move || trigger()).await {
                        warn!(error = %e, "scheduled check panicked");
                    }
                }
            }
        }
    });

    SchedulerHandle { cancel_tx, join }
}

/// Re-read the stored interval every `poll` and publish changes.
/// Stops once every receiver is gone.
pub fn spawn_settings_watcher<S>(
    state: StateStore<S>,
    poll: Duration,
    interval_tx: watch::Sender<u32>,
) -> JoinHandle<()>
where
    S: KeyValueStore + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !interval_tx.is_closed() {
            ticker.tick().await;

            let state = state.clone();
            let minutes = match tokio::task::spawn_blocking(move || state.interval_minutes()).await {
                Ok(Ok(minutes)) => minutes,
                Ok(Err(e)) => {
                    warn!(error = %e, "failed to read interval setting");
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "interval read task failed");
                    continue;
                }
            };

            interval_tx.send_if_modified(|current| {
                if *current == minutes {
                    return false;
                }
                info!(from = *current, to = minutes, "interval changed");
                *current = minutes;
                true
            });
        }
    })
}
