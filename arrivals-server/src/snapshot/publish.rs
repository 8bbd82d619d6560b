//! Single-writer, many-reader handoff of the current snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::Snapshot;

/// Write side: replaces the visible snapshot.
///
/// Only the polling worker holds one.
#[derive(Debug)]
pub struct SnapshotPublisher {
    current: Arc<ArcSwap<Snapshot>>,
}

/// Read side: cheap to clone, never blocks the publisher.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    current: Arc<ArcSwap<Snapshot>>,
}

impl SnapshotPublisher {
    /// Start with `initial` as the visible snapshot.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// A reader onto this publisher's snapshots.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            current: Arc::clone(&self.current),
        }
    }

    /// Make `snapshot` the visible one in a single step.
    ///
    /// The previous snapshot is dropped once the last reader holding it lets
    /// go.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        debug_assert!(snapshot.run_count >= self.current.load().run_count);
        let snapshot = Arc::new(snapshot);
        self.current.store(Arc::clone(&snapshot));
        snapshot
    }

    /// The currently visible snapshot.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }
}

impl SnapshotReader {
    /// The latest published snapshot.
    ///
    /// The returned value is immutable and stays valid after later publishes.
    pub fn get_snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Run count of the latest published snapshot.
    pub fn run_count(&self) -> u64 {
        self.current.load().run_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Station, StopKind};
    use chrono::{DateTime, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn snapshot(run_count: u64, station_ids: &[&str]) -> Snapshot {
        let mut s = Snapshot::empty(at(1_700_000_000 + run_count as i64));
        s.run_count = run_count;
        for id in station_ids {
            s.stations.insert(
                id.to_string(),
                Station {
                    id: id.to_string(),
                    name: id.to_string(),
                    latitude: 0.0,
                    longitude: 0.0,
                    kind: StopKind::Station,
                    platforms: Vec::new(),
                },
            );
        }
        s
    }

    #[test]
    fn readers_see_initial_snapshot() {
        let publisher = SnapshotPublisher::new(Snapshot::empty(at(0)));
        let reader = publisher.reader();
        assert_eq!(reader.run_count(), 0);
        assert!(reader.get_snapshot().is_empty());
    }

    #[test]
    fn publish_replaces_whole_snapshot() {
        let publisher = SnapshotPublisher::new(snapshot(0, &[]));
        let reader = publisher.reader();

        publisher.publish(snapshot(1, &["101", "103"]));
        let first = reader.get_snapshot();

        publisher.publish(snapshot(2, &["104"]));
        let second = reader.get_snapshot();

        // A pinned snapshot is unaffected by later publishes.
        assert_eq!(first.run_count, 1);
        assert_eq!(first.stations.keys().collect::<Vec<_>>(), ["101", "103"]);
        assert_eq!(second.run_count, 2);
        assert_eq!(second.stations.keys().collect::<Vec<_>>(), ["104"]);
        assert_eq!(publisher.current().run_count, 2);
    }

    #[test]
    fn concurrent_readers_never_see_mixed_snapshots() {
        let publisher = SnapshotPublisher::new(snapshot(0, &[]));
        let reader = publisher.reader();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let reader = reader.clone();
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        let s = reader.get_snapshot();
                        // Even runs publish "a", odd runs "b": never both.
                        let has_a = s.stations.contains_key("a");
                        let has_b = s.stations.contains_key("b");
                        assert!(!(has_a && has_b));
                        if s.run_count > 0 {
                            assert_eq!(has_a, s.run_count % 2 == 0);
                        }
                    }
                })
            })
            .collect();

        for run in 1..=500u64 {
            let id = if run % 2 == 0 { "a" } else { "b" };
            publisher.publish(snapshot(run, &[id]));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
