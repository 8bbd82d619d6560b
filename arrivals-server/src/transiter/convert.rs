//! Conversion from Transiter DTOs to domain types.

use crate::domain::RawStopTime;

use super::types::{StopRecord, StopTimeRecord, StopType};

/// Iterate over the parent stations in a cycle's stop records.
///
/// Platform records repeat their parent's stop times, so only stations are
/// used for both merging and publishing.
pub fn stations(stops: &[StopRecord]) -> impl Iterator<Item = &StopRecord> {
    stops.iter().filter(|s| s.stop_type == StopType::Station)
}

/// Flatten the stop times of every station into domain records.
///
/// Stop times without a trip, route or platform are skipped.
pub fn station_stop_times(stops: &[StopRecord]) -> Vec<RawStopTime> {
    stations(stops)
        .flat_map(|station| station.stop_times.iter())
        .filter_map(convert_stop_time)
        .collect()
}

/// Convert one stop time, or `None` if it lacks the fields needed to key it.
pub fn convert_stop_time(record: &StopTimeRecord) -> Option<RawStopTime> {
    let trip = record.trip.as_ref()?;
    let route = trip.route.as_ref()?;
    let platform = record.stop.as_ref()?;

    if trip.id.is_empty() || route.id.is_empty() || platform.id.is_empty() {
        return None;
    }

    Some(RawStopTime {
        trip_id: trip.id.clone(),
        line_id: route.id.clone(),
        color: route.color.clone(),
        platform_id: platform.id.clone(),
        destination: record
            .destination
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_default(),
        arrival_time: record.arrival.as_ref().map_or(0, |a| a.time),
    })
}
