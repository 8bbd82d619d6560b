//! Application state for the web layer.

use crate::snapshot::SnapshotReader;

/// Shared application state.
///
/// Handlers only ever read published snapshots; the arrival store is not
/// reachable from here.
#[derive(Clone)]
pub struct AppState {
    /// Read side of the snapshot handoff
    pub snapshots: SnapshotReader,
}

impl AppState {
    /// Create a new app state.
    pub fn new(snapshots: SnapshotReader) -> Self {
        Self { snapshots }
    }
}
