//! Domain types for subway arrival tracking.
//!
//! These types are independent of the upstream feed's wire format; the
//! `transiter` module converts into them.

mod arrival;
mod stop;
mod time;

pub use arrival::{Arrival, RawStopTime};
pub use stop::{Platform, Station, StopKind};
pub use time::{EpochSecs, SMOOTHING_ALPHA, smooth, wait_minutes};
