//! Web layer for the arrivals server.
//!
//! Serves the latest published snapshot. There are no write endpoints.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
