//! Stations and their platforms, as published in a snapshot.
//!
//! A station is the rider-facing stop (e.g. "Pelham Bay Park", id `601`).
//! Beneath it are directional platforms (`601N`, `601S`), which are the unit
//! at which arrivals are tracked per line.

use std::collections::BTreeMap;
use std::fmt;

use super::arrival::Arrival;

/// Upstream stop type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopKind {
    Station,
    Platform,
}

impl StopKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopKind::Station => "STATION",
            StopKind::Platform => "PLATFORM",
        }
    }
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directional boarding point with the current arrival for each line.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub id: String,
    pub name: String,
    /// Line id → tracked arrival.
    pub line_arrivals: BTreeMap<String, Arrival>,
}

/// A station with its platforms, rebuilt every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub kind: StopKind,
    pub platforms: Vec<Platform>,
}

impl Station {
    /// Total number of tracked line arrivals across all platforms.
    pub fn arrival_count(&self) -> usize {
        self.platforms.iter().map(|p| p.line_arrivals.len()).sum()
    }
}
