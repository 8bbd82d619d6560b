//! Transiter stops feed client.
//!
//! Transiter (https://github.com/jamespfennell/transiter) republishes the
//! MTA's realtime feeds as a paginated JSON API. Each page of
//! `/systems/{id}/stops` holds up to 100 stops; stations carry their
//! platforms' upcoming stop times inline.
//!
//! A cycle walks every page via the `nextId` cursor. The walk is sequential
//! because each cursor comes from the previous response.

mod client;
mod convert;
mod error;
mod feed;
mod mock;
mod types;

pub use client::{TransiterClient, TransiterConfig};
pub use convert::{convert_stop_time, station_stop_times, stations};
pub use error::TransiterError;
pub use feed::{FeedCycle, StopFeed, fetch_cycle};
pub use mock::MockStopFeed;
pub use types::{
    EstimatedTime, RouteRecord, StopRecord, StopRef, StopTimeRecord, StopType, StopsPage,
    TripRecord,
};
