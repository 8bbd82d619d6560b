//! Transiter stops API response DTOs.
//!
//! These types map the `GET /systems/{id}/stops` JSON response. Unknown
//! fields are ignored and most fields default when absent or null, so a
//! partially populated record never fails the whole page.

use serde::{Deserialize, Deserializer};

/// One page of the stops listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StopsPage {
    #[serde(deserialize_with = "null_default")]
    pub stops: Vec<StopRecord>,

    /// Cursor for the next page; absent or null on the last page.
    pub next_id: Option<String>,
}

impl StopsPage {
    /// The cursor to continue from, treating an empty string as the end.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Stop type as reported by Transiter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopType {
    Station,
    Platform,
    /// Entrances, boarding areas, generic nodes and anything newer.
    #[default]
    #[serde(other)]
    Other,
}

/// A stop: either a parent station or one of its platforms.
///
/// A station such as `101` lists its platforms `101N` and `101S` as
/// children and carries the stop times of both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StopRecord {
    #[serde(deserialize_with = "null_default")]
    pub id: String,

    #[serde(deserialize_with = "null_default")]
    pub name: String,

    #[serde(deserialize_with = "null_default")]
    pub latitude: f64,

    #[serde(deserialize_with = "null_default")]
    pub longitude: f64,

    #[serde(rename = "type", deserialize_with = "null_default")]
    pub stop_type: StopType,

    #[serde(deserialize_with = "null_default")]
    pub child_stops: Vec<StopRef>,

    #[serde(deserialize_with = "null_default")]
    pub stop_times: Vec<StopTimeRecord>,
}

/// Reference to another stop by id and name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StopRef {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
}

/// A trip's predicted call at one of the station's platforms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StopTimeRecord {
    pub trip: Option<TripRecord>,

    /// The platform the trip calls at.
    pub stop: Option<StopRef>,

    pub destination: Option<StopRef>,

    pub arrival: Option<EstimatedTime>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TripRecord {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    pub route: Option<RouteRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RouteRecord {
    #[serde(deserialize_with = "null_default")]
    pub id: String,
    /// Hex colour without a leading `#`.
    #[serde(deserialize_with = "null_default")]
    pub color: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EstimatedTime {
    /// Epoch seconds; 0 when unknown.
    #[serde(deserialize_with = "epoch_secs")]
    pub time: i64,
}

/// Decodes a present `null` as the type's default.
///
/// Container-level `#[serde(default)]` only covers absent fields.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accepts epoch seconds as a number or a numeric string.
///
/// Transiter encodes 64-bit integers as JSON strings. Unparseable or null
/// values become 0, which the arrival store discards.
fn epoch_secs<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        Some(Repr::Int(n)) => n,
        Some(Repr::Float(f)) => f as i64,
        Some(Repr::Text(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    })
}
