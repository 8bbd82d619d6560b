//! Subway arrivals server.
//!
//! Polls a Transiter stops feed, tracks the next arrival for every line at
//! every platform across polling cycles, and serves the latest snapshot
//! over HTTP.

pub mod config;
pub mod domain;
pub mod poller;
pub mod snapshot;
pub mod store;
pub mod transiter;
pub mod web;
