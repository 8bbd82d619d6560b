//! Assembling a snapshot from one cycle's stops and the arrival store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::{Platform, Station, StopKind};
use crate::store::ArrivalStore;
use crate::transiter::{StopRecord, stations};

use super::Snapshot;

/// Builds successive snapshots and numbers them.
///
/// Holds no arrival state itself; every platform's arrivals are read from
/// the store at build time.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    run_count: u64,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `run_count` already-published snapshots.
    pub fn starting_at(run_count: u64) -> Self {
        Self { run_count }
    }

    /// Number of snapshots built so far.
    pub fn run_count(&self) -> u64 {
        self.run_count
    }

    /// Build the next snapshot.
    ///
    /// Only `STATION` records are published; each child platform gets the
    /// store's current line → arrival mapping, or an empty one.
    pub fn build(
        &mut self,
        stops: &[StopRecord],
        store: &ArrivalStore,
        timestamp: DateTime<Utc>,
    ) -> Snapshot {
        let stations: BTreeMap<String, Station> = stations(stops)
            .map(|record| (record.id.clone(), build_station(record, store)))
            .collect();

        self.run_count += 1;
        Snapshot {
            stations,
            timestamp,
            run_count: self.run_count,
        }
    }
}

fn build_station(record: &StopRecord, store: &ArrivalStore) -> Station {
    let platforms = record
        .child_stops
        .iter()
        .map(|child| Platform {
            id: child.id.clone(),
            name: child.name.clone(),
            line_arrivals: store.platform_arrivals(&child.id),
        })
        .collect();

    Station {
        id: record.id.clone(),
        name: record.name.clone(),
        latitude: record.latitude,
        longitude: record.longitude,
        kind: StopKind::Station,
        platforms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawStopTime;
    use crate::transiter::{StopRef, StopType};

    const NOW: i64 = 1_700_000_000;

    fn child(id: &str) -> StopRef {
        StopRef {
            id: id.to_string(),
            name: "Pelham Bay Park".to_string(),
        }
    }

    fn station_record(id: &str, children: &[&str]) -> StopRecord {
        StopRecord {
            id: id.to_string(),
            name: "Pelham Bay Park".to_string(),
            latitude: 40.852462,
            longitude: -73.828121,
            stop_type: StopType::Station,
            child_stops: children.iter().map(|c| child(c)).collect(),
            stop_times: Vec::new(),
        }
    }

    fn timestamp() -> DateTime<Utc> {
        DateTime::from_timestamp(NOW, 0).unwrap()
    }

    #[test]
    fn attaches_store_arrivals_to_platforms() {
        let mut store = ArrivalStore::new();
        store.merge(
            &[RawStopTime {
                trip_id: "t1".into(),
                line_id: "6".into(),
                color: "00933C".into(),
                platform_id: "601S".into(),
                destination: "Brooklyn Bridge-City Hall".into(),
                arrival_time: NOW + 240,
            }],
            NOW,
        );

        let mut builder = SnapshotBuilder::new();
        let snapshot = builder.build(&[station_record("601", &["601N", "601S"])], &store, timestamp());

        let station = snapshot.station("601").unwrap();
        assert_eq!(station.kind, StopKind::Station);
        assert_eq!(station.platforms.len(), 2);
        assert!(station.platforms[0].line_arrivals.is_empty());

        let arrival = &station.platforms[1].line_arrivals["6"];
        assert_eq!(arrival.trip_id(), "t1");
        assert_eq!(arrival.current_arrival_time(), NOW + 240);
        assert_eq!(station.arrival_count(), 1);
    }

    #[test]
    fn skips_non_station_records() {
        let mut platform = station_record("601N", &[]);
        platform.stop_type = StopType::Platform;
        let mut entrance = station_record("E1", &[]);
        entrance.stop_type = StopType::Other;

        let stops = [station_record("601", &["601N"]), platform, entrance];
        let snapshot = SnapshotBuilder::new().build(&stops, &ArrivalStore::new(), timestamp());

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.station("601N").is_none());
    }

    #[test]
    fn run_count_increments_per_build() {
        let store = ArrivalStore::new();
        let mut builder = SnapshotBuilder::starting_at(4);

        let first = builder.build(&[], &store, timestamp());
        let second = builder.build(&[], &store, timestamp());

        assert_eq!(first.run_count, 5);
        assert_eq!(second.run_count, 6);
        assert_eq!(builder.run_count(), 6);
        assert!(second.is_empty());
    }

    #[test]
    fn later_merges_do_not_alter_built_snapshot() {
        let mut store = ArrivalStore::new();
        let stop_time = RawStopTime {
            trip_id: "t1".into(),
            line_id: "6".into(),
            color: String::new(),
            platform_id: "601N".into(),
            destination: String::new(),
            arrival_time: NOW + 600,
        };
        store.merge([&stop_time], NOW);

        let snapshot =
            SnapshotBuilder::new().build(&[station_record("601", &["601N"])], &store, timestamp());

        let earlier = RawStopTime {
            trip_id: "t0".into(),
            arrival_time: NOW + 60,
            ..stop_time
        };
        store.merge([&earlier], NOW);

        let published = &snapshot.station("601").unwrap().platforms[0].line_arrivals["6"];
        assert_eq!(published.trip_id(), "t1");
        assert_eq!(store.get("601N", "6").unwrap().trip_id(), "t0");
    }
}
