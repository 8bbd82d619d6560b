//! The polling cycle: fetch, merge, build, publish.
//!
//! One [`Poller`] runs as a single task. It owns the arrival store outright
//! and awaits each cycle before taking the next timer tick, so cycles can
//! never overlap. Ticks missed while a slow cycle was running are skipped
//! rather than replayed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::snapshot::{Snapshot, SnapshotBuilder, SnapshotPublisher};
use crate::store::{ArrivalStore, MergeSummary};
use crate::transiter::{StopFeed, StopRecord, TransiterError, fetch_cycle, station_stop_times};

/// Default time between cycles.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Default deadline for a whole fetch walk.
const DEFAULT_CYCLE_TIMEOUT: Duration = Duration::from_secs(25);

/// Default number of cycles an unseen line is kept.
const DEFAULT_EXPIRY_CYCLES: u64 = 20;

/// Configuration for the polling loop.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    /// Time between cycle starts.
    pub interval: Duration,

    /// Deadline for fetching every page of one cycle.
    pub cycle_timeout: Duration,

    /// Cycles a (platform, line) may go unreported before its arrival is
    /// dropped. `None` keeps the last known arrival forever.
    pub expiry_cycles: Option<u64>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            cycle_timeout: DEFAULT_CYCLE_TIMEOUT,
            expiry_cycles: Some(DEFAULT_EXPIRY_CYCLES),
        }
    }
}

/// Why a cycle published nothing.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// A page request failed; pagination stopped there.
    #[error("feed error after {pages} page(s): {source}")]
    Feed {
        pages: usize,
        #[source]
        source: TransiterError,
    },

    /// The fetch walk ran past the cycle deadline.
    #[error("cycle timed out after {0:?}")]
    Timeout(Duration),
}

/// Outcome of a published cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub snapshot: Arc<Snapshot>,
    pub merge: MergeSummary,
    pub expired: usize,
}

/// Drives fetch → merge → build → publish.
pub struct Poller<F> {
    feed: F,
    store: ArrivalStore,
    builder: SnapshotBuilder,
    publisher: SnapshotPublisher,
    config: PollerConfig,
}

impl<F: StopFeed> Poller<F> {
    /// Create a poller publishing through `publisher`.
    pub fn new(feed: F, publisher: SnapshotPublisher, config: PollerConfig) -> Self {
        let builder = SnapshotBuilder::starting_at(publisher.current().run_count);
        Self {
            feed,
            store: ArrivalStore::new(),
            builder,
            publisher,
            config,
        }
    }

    #[cfg(test)]
    fn store(&self) -> &ArrivalStore {
        &self.store
    }

    #[cfg(test)]
    fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }

    /// Run cycles on the configured interval, forever.
    ///
    /// The first cycle starts immediately. Failed cycles are logged and
    /// leave the previous snapshot visible.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            interval_secs = self.config.interval.as_secs(),
            "starting arrivals poller"
        );

        loop {
            interval.tick().await;
            // Failures are already logged inside run_cycle.
            let _ = self.run_cycle().await;
        }
    }

    /// Run one complete cycle now.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, CycleError> {
        let started = Instant::now();

        let stops = match self.fetch().await {
            Ok(stops) => stops,
            Err(err) => {
                warn!(
                    error = %err,
                    run_count = self.builder.run_count(),
                    "cycle aborted; keeping previous snapshot"
                );
                return Err(err);
            }
        };

        // Every comparison in this cycle uses the same reference time.
        let report = self.process(&stops, Utc::now());

        let elapsed = started.elapsed();
        info!(
            stations = report.snapshot.len(),
            run_count = report.snapshot.run_count,
            elapsed_ms = elapsed.as_millis() as u64,
            "published snapshot"
        );
        Ok(report)
    }

    async fn fetch(&self) -> Result<Vec<StopRecord>, CycleError> {
        let timeout = self.config.cycle_timeout;
        let cycle = tokio::time::timeout(timeout, fetch_cycle(&self.feed))
            .await
            .map_err(|_| CycleError::Timeout(timeout))?;

        let pages = cycle.pages;
        cycle
            .into_result()
            .map_err(|source| CycleError::Feed { pages, source })
    }

    /// Merge, build and publish from already-fetched stops at reference
    /// time `now`.
    pub fn process(&mut self, stops: &[StopRecord], now: DateTime<Utc>) -> CycleReport {
        let stop_times = station_stop_times(stops);
        let merge = self.store.merge(&stop_times, now.timestamp());

        let expired = match self.config.expiry_cycles {
            Some(max_idle) => self.store.expire_unseen(max_idle),
            None => 0,
        };

        debug!(
            stop_times = stop_times.len(),
            changed = merge.changed(),
            created = merge.created,
            reset = merge.reset,
            earlier = merge.earlier,
            refined = merge.refined,
            ignored = merge.ignored,
            discarded = merge.discarded,
            expired,
            tracked = self.store.len(),
            "merged stop times"
        );

        let snapshot = self.builder.build(stops, &self.store, now);
        let snapshot = self.publisher.publish(snapshot);

        CycleReport {
            snapshot,
            merge,
            expired,
        }
    }
}
