//! Configuration structures
//!
//! Recognized options for the target service and the pooled HTTP client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub pool: PoolConfig,
}

/// Target service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the member CRUD API (e.g. `http://localhost:9090`)
    pub base_url: String,
}

/// Connection pool limits and timeouts
///
/// All values are fixed at client construction and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum connections shared across all destinations
    #[serde(default = "default_max_total_connections")]
    pub max_total_connections: usize,
    /// Maximum concurrent connections to a single host+port
    #[serde(default = "default_max_connections_per_route")]
    pub max_connections_per_route: usize,
    /// Time allowed to establish a connection, in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Time allowed to read a response, in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_total_connections: default_max_total_connections(),
            max_connections_per_route: default_max_connections_per_route(),
            connect_timeout_ms: default_connect_timeout_ms(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

impl PoolConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

fn default_max_total_connections() -> usize {
    500
}

fn default_max_connections_per_route() -> usize {
    500
}

fn default_connect_timeout_ms() -> u64 {
    2000
}

fn default_read_timeout_ms() -> u64 {
    5000
}
