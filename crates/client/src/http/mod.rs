//! Pooled HTTP transport
//!
//! Shared `reqwest`-backed client with bounded total and per-route
//! connections and fixed connect/read timeouts.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
