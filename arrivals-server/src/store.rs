//! Cross-cycle arrival state.
//!
//! The store maps platform id → line id → [`Arrival`]. It is owned by the
//! polling worker, mutated only by [`ArrivalStore::merge`], and lent by
//! shared reference to the snapshot builder within the same cycle.
//!
//! For each upcoming stop time the merge applies these rules, in order:
//!
//! 1. No arrival tracked for (platform, line): start tracking it.
//! 2. The tracked arrival is stale (at or before `now`): replace it outright,
//!    resetting the moving average.
//! 3. The new time is strictly earlier than the tracked one, whatever the
//!    trip: switch to the new trip and blend the wait into the average.
//! 4. Same trip, not earlier: refine the prediction and blend.
//! 5. Otherwise (a later, different trip): ignore.
//!
//! Rule 3 blends once per earlier sighting, so a trip whose estimate keeps
//! moving forward contributes to the average several times. This skew is
//! known and left as is.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{Arrival, EpochSecs, RawStopTime};

/// What a single stop time did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Arrival time was zero or not after `now`.
    Discarded,
    /// First arrival for this (platform, line).
    Created,
    /// Tracked arrival was stale and has been replaced.
    Reset,
    /// An earlier train took over.
    Earlier,
    /// Same trip, updated prediction.
    Refined,
    /// A later, different trip; nothing changed.
    Ignored,
}

/// Per-cycle tally of merge outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub discarded: usize,
    pub created: usize,
    pub reset: usize,
    pub earlier: usize,
    pub refined: usize,
    pub ignored: usize,
}

impl MergeSummary {
    fn record(&mut self, outcome: MergeOutcome) {
        let slot = match outcome {
            MergeOutcome::Discarded => &mut self.discarded,
            MergeOutcome::Created => &mut self.created,
            MergeOutcome::Reset => &mut self.reset,
            MergeOutcome::Earlier => &mut self.earlier,
            MergeOutcome::Refined => &mut self.refined,
            MergeOutcome::Ignored => &mut self.ignored,
        };
        *slot += 1;
    }

    /// Number of stop times that changed the store.
    pub fn changed(&self) -> usize {
        self.created + self.reset + self.earlier + self.refined
    }
}

#[derive(Debug, Clone)]
struct Tracked {
    arrival: Arrival,
    /// Merge generation in which this (platform, line) last appeared.
    last_seen: u64,
}

/// Persistent per-(platform, line) arrival state.
#[derive(Debug, Default)]
pub struct ArrivalStore {
    platforms: HashMap<String, HashMap<String, Tracked>>,
    /// Number of merges applied so far.
    generation: u64,
}

impl ArrivalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one cycle's stop times against a single reference time.
    pub fn merge<'a, I>(&mut self, stop_times: I, now: EpochSecs) -> MergeSummary
    where
        I: IntoIterator<Item = &'a RawStopTime>,
    {
        self.generation += 1;
        let mut summary = MergeSummary::default();
        for stop_time in stop_times {
            summary.record(self.merge_one(stop_time, now));
        }
        summary
    }

    fn merge_one(&mut self, stop_time: &RawStopTime, now: EpochSecs) -> MergeOutcome {
        let generation = self.generation;
        let lines = self
            .platforms
            .entry(stop_time.platform_id.clone())
            .or_default();

        // Any mention of the line counts as a sighting, even a discarded one.
        if let Some(tracked) = lines.get_mut(&stop_time.line_id) {
            tracked.last_seen = generation;
        }

        if !stop_time.is_upcoming(now) {
            return MergeOutcome::Discarded;
        }

        let tracked = match lines.entry(stop_time.line_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Tracked {
                    arrival: Arrival::observe(stop_time, now),
                    last_seen: generation,
                });
                return MergeOutcome::Created;
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };
        let arrival = &mut tracked.arrival;

        if arrival.is_stale(now) {
            *arrival = Arrival::observe(stop_time, now);
            MergeOutcome::Reset
        } else if stop_time.arrival_time < arrival.current_arrival_time() {
            arrival.advance(Some(stop_time.trip_id.as_str()), stop_time.arrival_time, now);
            MergeOutcome::Earlier
        } else if arrival.trip_id() == stop_time.trip_id {
            arrival.advance(None, stop_time.arrival_time, now);
            MergeOutcome::Refined
        } else {
            MergeOutcome::Ignored
        }
    }

    /// Drop arrivals whose line has not appeared in the feed for more than
    /// `max_idle` merges. Returns how many were removed.
    pub fn expire_unseen(&mut self, max_idle: u64) -> usize {
        let generation = self.generation;
        let mut removed = 0;
        self.platforms.retain(|_, lines| {
            let before = lines.len();
            lines.retain(|_, tracked| generation - tracked.last_seen <= max_idle);
            removed += before - lines.len();
            !lines.is_empty()
        });
        removed
    }

    /// Current arrival for one (platform, line).
    pub fn get(&self, platform_id: &str, line_id: &str) -> Option<&Arrival> {
        self.platforms
            .get(platform_id)?
            .get(line_id)
            .map(|tracked| &tracked.arrival)
    }

    /// Line id → arrival for a platform; empty if nothing is tracked there.
    pub fn platform_arrivals(&self, platform_id: &str) -> BTreeMap<String, Arrival> {
        self.platforms
            .get(platform_id)
            .map(|lines| {
                lines
                    .iter()
                    .map(|(line, tracked)| (line.clone(), tracked.arrival.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of tracked (platform, line) pairs.
    pub fn len(&self) -> usize {
        self.platforms.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
