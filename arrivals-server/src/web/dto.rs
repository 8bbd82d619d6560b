//! Data transfer objects for web responses.
//!
//! Field names follow the JSON the map and list frontends consume.

use std::collections::BTreeMap;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::domain::{Arrival, Platform, Station};
use crate::snapshot::Snapshot;

/// Response for `GET /arrivals`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalsResponse {
    /// Station id → station
    pub stops: BTreeMap<String, StationView>,

    /// When the snapshot was built (ISO-8601, UTC)
    pub timestamp: String,

    /// Number of cycles published so far
    pub run_count: u64,
}

/// A station with its platforms.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub stop_type: &'static str,
    pub child_stops: Vec<PlatformView>,
}

/// A platform with the next arrival per line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformView {
    pub id: String,
    pub name: String,
    /// Line id → arrival
    pub line_arrivals: BTreeMap<String, ArrivalView>,
}

/// The tracked next arrival for one line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalView {
    pub trip_id: String,
    pub line_id: String,
    pub color: String,
    pub destination: String,
    /// Epoch seconds
    pub current_arrival_time: i64,
    /// Epoch seconds, 0 if never set
    pub previous_arrival_time: i64,
    /// Smoothed wait in minutes
    pub moving_average: f64,
}

impl From<&Snapshot> for ArrivalsResponse {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            stops: snapshot
                .stations
                .iter()
                .map(|(id, station)| (id.clone(), StationView::from(station)))
                .collect(),
            timestamp: snapshot
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            run_count: snapshot.run_count,
        }
    }
}

impl From<&Station> for StationView {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id.clone(),
            name: station.name.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            stop_type: station.kind.as_str(),
            child_stops: station.platforms.iter().map(PlatformView::from).collect(),
        }
    }
}

impl From<&Platform> for PlatformView {
    fn from(platform: &Platform) -> Self {
        Self {
            id: platform.id.clone(),
            name: platform.name.clone(),
            line_arrivals: platform
                .line_arrivals
                .iter()
                .map(|(line, arrival)| (line.clone(), ArrivalView::from(arrival)))
                .collect(),
        }
    }
}

impl From<&Arrival> for ArrivalView {
    fn from(arrival: &Arrival) -> Self {
        Self {
            trip_id: arrival.trip_id().to_string(),
            line_id: arrival.line_id().to_string(),
            color: arrival.color().to_string(),
            destination: arrival.destination().to_string(),
            current_arrival_time: arrival.current_arrival_time(),
            previous_arrival_time: arrival.previous_arrival_time(),
            moving_average: arrival.moving_average_wait_mins(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RawStopTime, StopKind};
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn serializes_in_frontend_shape() {
        let now = 1_700_000_000;
        let arrival = Arrival::observe(
            &RawStopTime {
                trip_id: "t1".into(),
                line_id: "6".into(),
                color: "00933C".into(),
                platform_id: "601N".into(),
                destination: "Pelham Bay Park".into(),
                arrival_time: now + 90,
            },
            now,
        );
        let mut snapshot = Snapshot::empty(DateTime::from_timestamp(now, 0).unwrap());
        snapshot.run_count = 7;
        snapshot.stations.insert(
            "601".into(),
            Station {
                id: "601".into(),
                name: "Pelham Bay Park".into(),
                latitude: 40.5,
                longitude: -73.5,
                kind: StopKind::Station,
                platforms: vec![Platform {
                    id: "601N".into(),
                    name: "Pelham Bay Park".into(),
                    line_arrivals: BTreeMap::from([("6".to_string(), arrival)]),
                }],
            },
        );

        let value = serde_json::to_value(ArrivalsResponse::from(&snapshot)).unwrap();

        assert_eq!(
            value,
            json!({
                "stops": {
                    "601": {
                        "id": "601",
                        "name": "Pelham Bay Park",
                        "latitude": 40.5,
                        "longitude": -73.5,
                        "type": "STATION",
                        "childStops": [{
                            "id": "601N",
                            "name": "Pelham Bay Park",
                            "lineArrivals": {
                                "6": {
                                    "tripId": "t1",
                                    "lineId": "6",
                                    "color": "00933C",
                                    "destination": "Pelham Bay Park",
                                    "currentArrivalTime": now + 90,
                                    "previousArrivalTime": 0,
                                    "movingAverage": 1.5
                                }
                            }
                        }]
                    }
                },
                "timestamp": "2023-11-14T22:13:20.000Z",
                "runCount": 7
            })
        );
    }
}
