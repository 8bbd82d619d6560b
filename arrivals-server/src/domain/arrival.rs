//! Per-line "next arrival" tracking at a platform.
//!
//! An [`Arrival`] is the long-lived record for one (platform, line) pair.
//! It is created the first time a line is seen at a platform and then
//! updated in place by the arrival store as later feed cycles refine or
//! supersede the tracked train.

use super::time::{EpochSecs, smooth, wait_minutes};

/// One upstream-reported stop time, flattened out of the feed.
///
/// Lives for a single polling cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStopTime {
    /// Upstream trip identifier.
    pub trip_id: String,
    /// Line (route) identifier, e.g. "6".
    pub line_id: String,
    /// Line colour as a hex string without the leading `#`.
    pub color: String,
    /// Platform the trip calls at, e.g. "601N".
    pub platform_id: String,
    /// Human-readable destination name.
    pub destination: String,
    /// Predicted arrival, epoch seconds. Zero when the feed has no estimate.
    pub arrival_time: EpochSecs,
}

impl RawStopTime {
    /// Whether this record may update state at reference time `now`.
    ///
    /// Arrivals at or before `now`, and the zero sentinel, are never used.
    pub fn is_upcoming(&self, now: EpochSecs) -> bool {
        self.arrival_time != 0 && self.arrival_time > now
    }
}

/// The tracked next arrival for one line at one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrival {
    trip_id: String,
    line_id: String,
    color: String,
    destination: String,
    current_arrival_time: EpochSecs,
    previous_arrival_time: EpochSecs,
    moving_average_wait_mins: f64,
}

impl Arrival {
    /// Start tracking from a freshly observed stop time.
    ///
    /// The moving average starts at the observed wait rather than being
    /// blended with anything.
    pub fn observe(stop_time: &RawStopTime, now: EpochSecs) -> Self {
        Self {
            trip_id: stop_time.trip_id.clone(),
            line_id: stop_time.line_id.clone(),
            color: stop_time.color.clone(),
            destination: stop_time.destination.clone(),
            current_arrival_time: stop_time.arrival_time,
            previous_arrival_time: 0,
            moving_average_wait_mins: wait_minutes(stop_time.arrival_time, now),
        }
    }

    /// Trip currently being tracked.
    pub fn trip_id(&self) -> &str {
        &self.trip_id
    }

    /// Line this arrival belongs to. Never changes after creation.
    pub fn line_id(&self) -> &str {
        &self.line_id
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Latest predicted arrival, epoch seconds.
    pub fn current_arrival_time(&self) -> EpochSecs {
        self.current_arrival_time
    }

    /// Prediction that `current_arrival_time` replaced, or 0 if none.
    pub fn previous_arrival_time(&self) -> EpochSecs {
        self.previous_arrival_time
    }

    /// Exponentially smoothed wait, in minutes.
    pub fn moving_average_wait_mins(&self) -> f64 {
        self.moving_average_wait_mins
    }

    /// Whether the tracked train has already passed as of `now`.
    pub fn is_stale(&self, now: EpochSecs) -> bool {
        self.current_arrival_time <= now
    }

    /// Move to a new predicted time, shifting the old one into
    /// `previous_arrival_time` and blending the new wait into the average.
    ///
    /// `trip_id` replaces the tracked trip when given.
    pub(crate) fn advance(
        &mut self,
        trip_id: Option<&str>,
        arrival_time: EpochSecs,
        now: EpochSecs,
    ) {
        if let Some(trip_id) = trip_id {
            self.trip_id = trip_id.to_string();
        }
        self.previous_arrival_time = self.current_arrival_time;
        self.current_arrival_time = arrival_time;
        self.moving_average_wait_mins =
            smooth(self.moving_average_wait_mins, wait_minutes(arrival_time, now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_time(trip: &str, arrival_time: EpochSecs) -> RawStopTime {
        RawStopTime {
            trip_id: trip.to_string(),
            line_id: "6".to_string(),
            color: "00933C".to_string(),
            platform_id: "601N".to_string(),
            destination: "Pelham Bay Park".to_string(),
            arrival_time,
        }
    }

    #[test]
    fn upcoming_excludes_zero_and_past() {
        let now = 1_700_000_000;
        assert!(!stop_time("a", 0).is_upcoming(now));
        assert!(!stop_time("a", now).is_upcoming(now));
        assert!(!stop_time("a", now - 1).is_upcoming(now));
        assert!(stop_time("a", now + 1).is_upcoming(now));
    }

    #[test]
    fn observe_starts_from_raw_wait() {
        let now = 1_700_000_000;
        let arrival = Arrival::observe(&stop_time("trip-1", now + 300), now);

        assert_eq!(arrival.trip_id(), "trip-1");
        assert_eq!(arrival.line_id(), "6");
        assert_eq!(arrival.color(), "00933C");
        assert_eq!(arrival.destination(), "Pelham Bay Park");
        assert_eq!(arrival.current_arrival_time(), now + 300);
        assert_eq!(arrival.previous_arrival_time(), 0);
        assert_eq!(arrival.moving_average_wait_mins(), 5.0);
    }

    #[test]
    fn advance_shifts_times_and_blends() {
        let now = 1_700_000_000;
        let mut arrival = Arrival::observe(&stop_time("trip-1", now + 600), now);

        arrival.advance(Some("trip-2"), now + 120, now);

        assert_eq!(arrival.trip_id(), "trip-2");
        assert_eq!(arrival.previous_arrival_time(), now + 600);
        assert_eq!(arrival.current_arrival_time(), now + 120);
        // 0.25 * 2 + 0.75 * 10
        assert!((arrival.moving_average_wait_mins() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn advance_without_trip_keeps_trip() {
        let now = 1_700_000_000;
        let mut arrival = Arrival::observe(&stop_time("trip-1", now + 300), now);
        arrival.advance(None, now + 360, now);
        assert_eq!(arrival.trip_id(), "trip-1");
        assert_eq!(arrival.previous_arrival_time(), now + 300);
    }

    #[test]
    fn staleness_is_inclusive() {
        let now = 1_700_000_000;
        let arrival = Arrival::observe(&stop_time("trip-1", now + 60), now);
        assert!(!arrival.is_stale(now + 59));
        assert!(arrival.is_stale(now + 60));
        assert!(arrival.is_stale(now + 61));
    }
}
