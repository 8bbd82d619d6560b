//! Published arrival snapshots.
//!
//! Each completed cycle builds a fresh [`Snapshot`] off to the side and then
//! publishes it by replacing a single `Arc`. Readers pin whichever snapshot
//! was current when they loaded it; a later publish never touches it.

mod build;
mod publish;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::Station;

pub use build::SnapshotBuilder;
pub use publish::{SnapshotPublisher, SnapshotReader};

/// An immutable view of every station with its current arrivals.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Station id → station.
    pub stations: BTreeMap<String, Station>,
    /// When the snapshot was built.
    pub timestamp: DateTime<Utc>,
    /// Number of cycles published so far, this one included.
    pub run_count: u64,
}

impl Snapshot {
    /// The snapshot served before the first cycle completes.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            stations: BTreeMap::new(),
            timestamp,
            run_count: 0,
        }
    }

    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
